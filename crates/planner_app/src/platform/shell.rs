use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use planner_core::{AppViewModel, Category, Msg};
use planner_logging::planner_debug;

use super::app::Session;
use super::ui::render;

const POLL_INTERVAL: Duration = Duration::from_millis(75);
const PASTE_TERMINATOR: &str = ".";

const HELP: &str = "\
Commands:
  category <email|transcription|note>  pick the document category
  content <text>                       set the document text (one line)
  paste                                set the document text, end with a line containing only '.'
  ingest                               index the current document
  date <YYYY-MM-DD>                    set the plan date
  guidance <text>                      set plan guidance (empty to clear)
  plan                                 generate a plan
  status                               refresh the document count
  show                                 print everything
  help                                 this text
  quit                                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Category(Category),
    Content(String),
    Paste,
    Ingest,
    Date(NaiveDate),
    Guidance(String),
    Plan,
    Status,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "category" => rest
            .parse()
            .map(ShellCommand::Category)
            .map_err(|err| err.to_string()),
        "content" => Ok(ShellCommand::Content(rest.to_string())),
        "paste" => Ok(ShellCommand::Paste),
        "ingest" => Ok(ShellCommand::Ingest),
        "date" => NaiveDate::parse_from_str(rest, "%Y-%m-%d")
            .map(ShellCommand::Date)
            .map_err(|err| format!("invalid date '{rest}': {err}")),
        "guidance" => Ok(ShellCommand::Guidance(rest.to_string())),
        "plan" => Ok(ShellCommand::Plan),
        "status" => Ok(ShellCommand::Status),
        "show" => Ok(ShellCommand::Show),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Messages to dispatch, plus text to print.
    Continue { msgs: Vec<Msg>, output: Vec<String> },
    Show,
    Quit,
}

/// Line-oriented input handling, independent of the terminal.
#[derive(Debug, Default)]
pub struct ShellInput {
    paste: Option<Vec<String>>,
}

impl ShellInput {
    pub fn is_pasting(&self) -> bool {
        self.paste.is_some()
    }

    pub fn handle_line(&mut self, line: &str, now_millis: i64) -> LineOutcome {
        if let Some(buffer) = self.paste.as_mut() {
            if line.trim_end() == PASTE_TERMINATOR {
                let content = buffer.join("\n");
                self.paste = None;
                return LineOutcome::Continue {
                    output: vec![format!("({} chars captured)", content.chars().count())],
                    msgs: vec![Msg::IngestContentChanged(content)],
                };
            }
            buffer.push(line.to_string());
            return LineOutcome::Continue {
                msgs: Vec::new(),
                output: Vec::new(),
            };
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                let output = if message.is_empty() {
                    Vec::new()
                } else {
                    vec![message]
                };
                return LineOutcome::Continue {
                    msgs: Vec::new(),
                    output,
                };
            }
        };

        let msgs = match command {
            ShellCommand::Category(category) => vec![Msg::IngestCategoryChanged(category)],
            ShellCommand::Content(text) => vec![Msg::IngestContentChanged(text)],
            ShellCommand::Paste => {
                self.paste = Some(Vec::new());
                return LineOutcome::Continue {
                    msgs: Vec::new(),
                    output: vec![format!(
                        "Paste the document; finish with a line containing only '{PASTE_TERMINATOR}'"
                    )],
                };
            }
            ShellCommand::Ingest => vec![Msg::IngestSubmitted { now_millis }],
            ShellCommand::Date(date) => vec![Msg::PlanDateChanged(date)],
            ShellCommand::Guidance(text) => vec![Msg::PlanGuidanceChanged(text)],
            ShellCommand::Plan => vec![Msg::PlanSubmitted],
            ShellCommand::Status => vec![Msg::RefreshStatus],
            ShellCommand::Show => return LineOutcome::Show,
            ShellCommand::Help => {
                return LineOutcome::Continue {
                    msgs: Vec::new(),
                    output: HELP.lines().map(ToOwned::to_owned).collect(),
                }
            }
            ShellCommand::Quit => return LineOutcome::Quit,
        };
        LineOutcome::Continue {
            msgs,
            output: Vec::new(),
        }
    }
}

/// Runs the interactive session until `quit` or end of input.
///
/// Requests still outstanding when the input ends are awaited and their
/// outcome printed before returning.
pub fn run_shell<R>(
    mut session: Session,
    reader: R,
    out: &mut impl Write,
    clock: impl Fn() -> i64,
) -> io::Result<()>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut input = ShellInput::default();
    let mut shown: Option<AppViewModel> = None;

    writeln!(out, "Type 'help' for commands.")?;
    session.dispatch(Msg::Mounted);
    print_changes(out, &mut shown, &session)?;
    prompt(out, &input)?;

    loop {
        if session.pump() {
            print_changes(out, &mut shown, &session)?;
            prompt(out, &input)?;
        }

        let line = match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match input.handle_line(&line, clock()) {
            LineOutcome::Quit => break,
            LineOutcome::Show => {
                let view = session.view();
                for text in render::render(&view) {
                    writeln!(out, "{text}")?;
                }
                shown = Some(view);
            }
            LineOutcome::Continue { msgs, output } => {
                for text in output {
                    writeln!(out, "{text}")?;
                }
                let mut changed = false;
                for msg in msgs {
                    changed |= session.dispatch(msg);
                }
                if changed {
                    print_changes(out, &mut shown, &session)?;
                }
            }
        }
        prompt(out, &input)?;
    }

    writeln!(out)?;
    if session.is_busy() {
        planner_debug!("Input closed with requests outstanding, waiting for them");
        writeln!(out, "Waiting for pending requests...")?;
        session.settle();
        print_changes(out, &mut shown, &session)?;
    }
    out.flush()
}

fn print_changes(
    out: &mut impl Write,
    shown: &mut Option<AppViewModel>,
    session: &Session,
) -> io::Result<()> {
    let view = session.view();
    for text in render::render_changes(shown.as_ref(), &view) {
        writeln!(out, "{text}")?;
    }
    *shown = Some(view);
    Ok(())
}

fn prompt(out: &mut impl Write, input: &ShellInput) -> io::Result<()> {
    if !input.is_pasting() {
        write!(out, "planner> ")?;
    }
    out.flush()
}
