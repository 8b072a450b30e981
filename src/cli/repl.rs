use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::application::{SubmitTurnUseCase, TurnOutcome};
use crate::domain::{ChatSession, DomainError, Message, Persona, Provider, Role};

pub const HELP: &str = "\
Commands:
  /provider <name>   switch model provider (OpenAI, DeepSeek)
  /key <secret>      save the API key for the current provider
  /persona <name>    switch persona (general, creative, programming, data)
  /providers         list providers
  /personas          list personas
  /history           show the conversation so far
  /clear             start a new conversation
  /help              show this help
  /quit              leave the chat
Start a line with // to send a prompt that begins with /.
Anything else is sent as a prompt.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Prompt(String),
    SelectProvider(Provider),
    SaveKey(String),
    SelectPersona(Persona),
    ListProviders,
    ListPersonas,
    History,
    Clear,
    Help,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(escaped) = line.trim_start().strip_prefix("//") {
            return Ok(ReplCommand::Prompt(format!("/{}", escaped)));
        }
        let Some(command) = line.trim_start().strip_prefix('/') else {
            return Ok(ReplCommand::Prompt(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name.to_lowercase().as_str() {
            "provider" | "model" => Ok(ReplCommand::SelectProvider(required(name, arg)?.parse()?)),
            "key" => Ok(ReplCommand::SaveKey(arg.to_string())),
            "persona" => Ok(ReplCommand::SelectPersona(required(name, arg)?.parse()?)),
            "providers" => Ok(ReplCommand::ListProviders),
            "personas" => Ok(ReplCommand::ListPersonas),
            "history" => Ok(ReplCommand::History),
            "clear" => Ok(ReplCommand::Clear),
            "help" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            other => Err(DomainError::invalid_input(format!(
                "unknown command '/{}' (try /help)",
                other
            ))),
        }
    }
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str, DomainError> {
    if arg.is_empty() {
        Err(DomainError::invalid_input(format!("usage: /{} <name>", name)))
    } else {
        Ok(arg)
    }
}

pub fn format_message(message: &Message) -> String {
    let label = match message.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
        Role::System => "system",
    };
    format!("{}> {}", label, message.content())
}

pub fn format_providers(session: &ChatSession) -> String {
    Provider::ALL
        .iter()
        .map(|p| {
            let d = p.descriptor();
            let marker = if *p == session.provider() { "*" } else { " " };
            let key = if session.credentials().is_usable(*p) {
                "key saved"
            } else {
                "no key"
            };
            format!(
                "{} {:<9} {} [{}] {} ({})",
                marker, d.identifier, d.display_name, d.model_name, d.endpoint, key
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_personas(current: Option<Persona>) -> String {
    Persona::ALL
        .iter()
        .map(|p| {
            let marker = if Some(*p) == current { "*" } else { " " };
            format!("{} {:<12} {}", marker, p.as_str(), p.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Write what a turn produced: the reply, the error, or the missing-key
/// warning. Errors are displayed only; the use case keeps them out of the
/// transcript.
pub fn render_outcome<W: Write>(outcome: &TurnOutcome, out: &mut W) -> std::io::Result<()> {
    match outcome {
        TurnOutcome::Ignored => Ok(()),
        TurnOutcome::Replied { content } => {
            writeln!(out, "{}", format_message(&Message::assistant(content.as_str())))
        }
        TurnOutcome::MissingCredential { .. } => writeln!(
            out,
            "Warning: {} (use /key <secret>)",
            outcome.error_text().unwrap_or_default()
        ),
        TurnOutcome::Failed { error } => writeln!(out, "Error: {}", error),
    }
}

/// Interactive loop: read lines from `input` until EOF or `/quit`.
///
/// Each prompt is awaited to completion before the next line is read, so a
/// session never has more than one turn in flight.
pub async fn run_repl<R, W>(
    use_case: &SubmitTurnUseCase,
    session: &mut ChatSession,
    input: R,
    out: &mut W,
    show_spinner: bool,
) -> Result<(), DomainError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        out,
        "Chatting with {} as the {}. Type /help for commands.",
        session.provider(),
        session.persona().label().to_lowercase()
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match command {
            ReplCommand::Prompt(prompt) => {
                let spinner = (show_spinner && !prompt.is_empty()).then(thinking_spinner);
                let outcome = use_case.execute(session, &prompt).await;
                if let Some(spinner) = spinner {
                    spinner.finish_and_clear();
                }
                render_outcome(&outcome, out)?;
            }
            ReplCommand::SelectProvider(provider) => {
                session.select_provider(provider);
                let status = if session.has_usable_credential() {
                    "key saved"
                } else {
                    "no key saved yet, use /key <secret>"
                };
                writeln!(out, "Using {} ({})", provider, status)?;
            }
            ReplCommand::SaveKey(secret) => {
                let provider = session.provider();
                session.save_credential(provider, secret);
                if session.has_usable_credential() {
                    writeln!(out, "{} API key saved!", provider)?;
                } else {
                    writeln!(out, "{} API key cleared.", provider)?;
                }
            }
            ReplCommand::SelectPersona(persona) => {
                session.select_persona(persona);
                writeln!(out, "Persona set to {}", persona.label())?;
            }
            ReplCommand::ListProviders => writeln!(out, "{}", format_providers(session))?,
            ReplCommand::ListPersonas => {
                writeln!(out, "{}", format_personas(Some(session.persona())))?
            }
            ReplCommand::History => {
                if session.transcript().is_empty() {
                    writeln!(out, "No messages yet.")?;
                }
                for message in session.transcript() {
                    writeln!(out, "{}", format_message(message))?;
                }
            }
            ReplCommand::Clear => {
                session.clear_transcript();
                writeln!(out, "Conversation cleared.")?;
            }
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Quit => break,
        }
    }

    Ok(())
}
