mod http_chat_completion;
mod mock_chat_completion;

pub use http_chat_completion::*;
pub use mock_chat_completion::*;
