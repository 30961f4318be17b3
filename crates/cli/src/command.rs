//! Parsing of the REPL's line commands.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exchange a Letterboxd authorization code for a session.
    Login(String),
    Logout,
    Lists,
    /// Drop cached lists and refetch the summaries.
    Refresh,
    /// Choose a list by its zero-based menu index.
    Select(usize),
    Sort,
    Modes,
    Mode(String),
    /// Make the entry with this id the first one shown.
    Start(String),
    /// Report the slot an entry will land in.
    Where(String),
    Reverse,
    Original,
    Show,
    Save,
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a list number")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
Commands:
  login <code>     sign in with a Letterboxd authorization code
  logout           sign out and forget the saved token
  lists            show your lists
  refresh          refetch your lists, ignoring cached copies
  select <n>       choose list number n
  sort             fetch the chosen list and sort it
  modes            show the available sort modes
  mode <key>       switch to another sort mode
  start <entryId>  make that film the first one
  where <entryId>  show where a film will end up
  reverse          reverse the order
  original         toggle between the sorted and the original order
  show             print the current order
  save             write the order to Letterboxd
  cancel           put the list down
  help             show this text
  quit             exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// List numbers are typed one-based, as they are printed.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match name.to_ascii_lowercase().as_str() {
        "login" => Command::Login(required(arg, "login", "an authorization code")?),
        "logout" => Command::Logout,
        "lists" | "ls" => Command::Lists,
        "refresh" => Command::Refresh,
        "select" => {
            let raw = required(arg, "select", "a list number")?;
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Select(n - 1),
                _ => return Err(CommandError::InvalidNumber(raw)),
            }
        }
        "sort" => Command::Sort,
        "modes" => Command::Modes,
        "mode" => Command::Mode(required(arg, "mode", "a sort mode key")?),
        "start" => Command::Start(required(arg, "start", "an entry id")?),
        "where" => Command::Where(required(arg, "where", "an entry id")?),
        "reverse" => Command::Reverse,
        "original" => Command::Original,
        "show" => Command::Show,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required(arg: Option<&str>, command: &'static str, argument: &'static str) -> Result<String, CommandError> {
    arg.map(str::to_string)
        .ok_or(CommandError::MissingArgument { command, argument })
}
