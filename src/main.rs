//! Terminal harness for the medication widget.
//!
//! Reads one command per line from stdin, feeds it to the page and prints
//! the page snapshot as JSON after every change.

use medcheck_lib::api::HttpMedicationApi;
use medcheck_lib::config::WidgetConfig;
use medcheck_lib::driver::Driver;
use medcheck_lib::models::{FontSize, MedicationId};
use medcheck_lib::page::{Page, UiEvent};
use medcheck_lib::widget::Key;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const USAGE: &str = "commands: type <text> | up | down | enter | submit-key | esc | tab | \
    pick <n> | click | remove <id> | search <query> | toggle <id> | check | submit | \
    reset | font <small|normal|large|x-large> | contrast | quit";

#[derive(Debug, PartialEq, thiserror::Error)]
enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for {command}: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

#[derive(Debug, PartialEq)]
enum Command {
    Event(UiEvent),
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (name, arg) = match line.trim_start().split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (line.trim(), ""),
    };

    let event = match name {
        "" => return Ok(None),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        // Typed text keeps its inner spacing; an empty `type` clears the input.
        "type" => UiEvent::Input(arg.to_string()),
        "up" => UiEvent::Key(Key::ArrowUp),
        "down" => UiEvent::Key(Key::ArrowDown),
        "enter" => UiEvent::Key(Key::Enter),
        "submit-key" => UiEvent::Key(Key::ModifiedEnter),
        "esc" => UiEvent::Key(Key::Escape),
        "tab" => UiEvent::Key(Key::Tab),
        "click" => UiEvent::ClickOutside,
        "pick" => {
            let index = require(arg, "pick")?
                .parse()
                .map_err(|_| CommandError::InvalidArgument {
                    command: "pick",
                    value: arg.to_string(),
                })?;
            UiEvent::ClickSuggestion(index)
        }
        "remove" => UiEvent::RemoveTag(MedicationId::new(require(arg, "remove")?)),
        "search" => UiEvent::SubmitSearch(require(arg, "search")?.to_string()),
        "toggle" => UiEvent::ToggleSearchResult(MedicationId::new(require(arg, "toggle")?)),
        "check" => UiEvent::CheckInteractions,
        "submit" => UiEvent::SubmitForm,
        "reset" => UiEvent::Reset,
        "font" => {
            let size: FontSize =
                require(arg, "font")?
                    .parse()
                    .map_err(|_| CommandError::InvalidArgument {
                        command: "font",
                        value: arg.to_string(),
                    })?;
            UiEvent::SetFontSize(size)
        }
        "contrast" => UiEvent::ToggleContrast,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(Command::Event(event)))
}

fn require<'a>(arg: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}

async fn read_commands(tx: mpsc::Sender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        match parse_command(&line) {
            Ok(Some(Command::Event(event))) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(e) => eprintln!("{e}\n{USAGE}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    medcheck_lib::init_tracing();

    let config = WidgetConfig::from_env();
    tracing::info!(base_url = %config.base_url, timeout = ?config.request_timeout, "Configuration loaded");
    let api = HttpMedicationApi::from_config(&config)?;

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(read_commands(tx));

    let page = Driver::new(Page::new(config), api)
        .on_render(|page| match serde_json::to_string_pretty(&page.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize snapshot"),
        })
        .run(rx)
        .await;

    if let Some(submission) = page.submitted() {
        tracing::info!(field = %submission.field, value = %submission.value, "Last submission");
    }
    Ok(())
}
