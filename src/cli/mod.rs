mod repl;

use clap::Subcommand;

pub use repl::*;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,

    /// Send a single prompt and print the reply
    Ask {
        prompt: String,

        /// API key for the selected provider, used for this prompt only
        #[arg(short, long)]
        key: Option<String>,
    },

    /// List the registered model providers
    Providers,

    /// List the available assistant personas
    Personas,
}
