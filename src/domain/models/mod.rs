mod credentials;
mod message;
mod persona;
mod provider;
mod session;
mod transcript;

pub use credentials::*;
pub use message::*;
pub use persona::*;
pub use provider::*;
pub use session::*;
pub use transcript::*;
