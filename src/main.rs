use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use personachat::cli::{format_personas, format_providers, run_repl, Commands};
use personachat::{Container, ContainerConfig, Persona, Provider, TurnOutcome};

#[derive(Parser)]
#[command(name = "personachat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model provider to start with
    #[arg(short, long, global = true, default_value = "OpenAI")]
    provider: Provider,

    /// Assistant persona to start with
    #[arg(long, global = true, default_value = "general")]
    persona: Persona,

    /// Give up on a provider request after this many seconds (default: wait forever)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Send requests to this base URL instead of the provider's own host
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Answer locally without calling any provider
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("personachat={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let container = Container::new(ContainerConfig {
        mock: cli.mock,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        endpoint: cli.endpoint.clone(),
        provider: cli.provider,
        persona: cli.persona,
    })?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let use_case = container.submit_turn_use_case();
            let mut session = container.new_session();
            let input = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let show_spinner = stdout.is_terminal();

            run_repl(&use_case, &mut session, input, &mut stdout, show_spinner).await?;
            debug!(
                "Session {} ended after {} turns",
                session.id(),
                session.transcript().turn_count()
            );
        }

        Commands::Ask { prompt, key } => {
            let use_case = container.submit_turn_use_case();
            let mut session = container.new_session();
            if let Some(key) = key {
                session.save_credential(session.provider(), key);
            }
            let outcome = use_case.execute(&mut session, &prompt).await;
            println!("{}", ask_reply(outcome)?);
        }

        Commands::Providers => {
            let session = container.new_session();
            println!("{}", format_providers(&session));
        }

        Commands::Personas => {
            println!("{}", format_personas(Some(cli.persona)));
        }
    }

    Ok(())
}

fn ask_reply(outcome: TurnOutcome) -> Result<String> {
    match outcome {
        TurnOutcome::Replied { content } => Ok(content),
        TurnOutcome::Ignored => bail!("Prompt is empty"),
        TurnOutcome::MissingCredential { provider } => {
            bail!("No API key for {}; pass it with --key", provider)
        }
        TurnOutcome::Failed { error } => bail!("{}", error),
    }
}
