//! Interactive command parsing
//!
//! Maps one line of terminal input onto a session event or a CLI action.

use route_picker::{Error, Event, Point, Result};

pub const HELP: &str = "Commands:
  click LAT LNG        primary click (reports the coordinates)
  rclick LAT LNG       context click (select a point to confirm)
  start | end | new    confirm the pending click as start, end or new route end
  dismiss              drop the pending click
  reset start|end|all  clear an endpoint or the whole selection
  show                 print loaded routes and their draw order
  status               print endpoints, pending click and loading state
  help                 show this text
  quit                 leave";

/// One parsed line of interactive input
#[derive(Debug)]
pub enum Command {
    Session(Event),
    Show,
    Status,
    Help,
    Quit,
}

/// Parse a command line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match (verb.as_str(), args.as_slice()) {
        ("click", rest) => Command::Session(Event::PrimaryClick(parse_point(rest)?)),
        ("rclick", rest) => Command::Session(Event::ContextClick(parse_point(rest)?)),
        ("start", []) => Command::Session(Event::ConfirmStart),
        ("end", []) => Command::Session(Event::ConfirmEnd),
        ("new", []) => Command::Session(Event::ConfirmNewRoute),
        ("dismiss", []) => Command::Session(Event::DismissPending),
        ("reset", [target]) => match target.to_ascii_lowercase().as_str() {
            "start" => Command::Session(Event::ResetStart),
            "end" => Command::Session(Event::ResetEnd),
            "all" => Command::Session(Event::ResetAll),
            other => {
                return Err(Error::InvalidInput(format!(
                    "reset expects start, end or all, got '{other}'"
                )))
            }
        },
        ("show", []) => Command::Show,
        ("status", []) => Command::Status,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (verb, _) => {
            return Err(Error::InvalidInput(format!(
                "unknown command '{line}' (verb '{verb}'), type 'help'"
            )))
        }
    };

    Ok(Some(command))
}

/// Accepts `LAT LNG` or `LAT,LNG`
fn parse_point(args: &[&str]) -> Result<Point> {
    match args {
        [pair] => pair.parse(),
        [lat, lng] => format!("{lat},{lng}").parse(),
        _ => Err(Error::InvalidInput(
            "expected coordinates as 'LAT LNG' or 'LAT,LNG'".to_string(),
        )),
    }
}
