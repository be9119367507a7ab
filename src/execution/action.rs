//! Operator input parsing
//!
//! A line typed at the prompt is parsed once into an [`Input`]; the stepper
//! never compares raw strings.

/// One stepper action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Execute the current command, then advance
    Run,
    /// Advance without executing
    Skip,
    /// Move to the previous command
    Back,
    /// Move to the first command
    Rewind,
    /// Move to the last command
    FastForward,
    /// Move to an index (clamped)
    Goto(usize),
    /// Print every command
    List,
    /// Print the current command
    Status,
    /// Start an interactive shell; `None` uses `$SHELL`
    Shell(Option<String>),
    /// Change the working directory
    Cd(String),
    Help,
    Env,
    Pwd,
    Quit,
}

impl Action {
    /// Whether this action moves the run forward or ends it
    pub fn progresses(&self) -> bool {
        matches!(self, Action::Run | Action::Skip | Action::Quit)
    }
}

/// A parsed line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    /// `<count><action>`, e.g. `3n`
    Repeat { count: usize, action: Action },
    /// A known action used incorrectly
    Usage(String),
    /// Nothing recognizable
    Unknown(String),
}

/// Shells that can be started by name
pub const NAMED_SHELLS: &[&str] = &["bash", "zsh", "fish", "dash", "ksh"];

/// Prompt shown before each command
pub const PROMPT_CHOICES: &str = "[y]es [n]o [b]ack [l]ist [sh]ell [h]elp [q]uit";

pub const HELP: &str = "\
y, yes, r, run        run the current command and advance
n, no, s, skip, next  skip the current command
b, back, p, prev      go back one command
rw, rewind, first     go to the first command
ff, last              go to the last command
g N, goto N           go to command N
l, ls, list           list all commands
st, status, .         show the current command
sh, shell             start an interactive shell ($SHELL)
bash, zsh, ...        start a named shell
cd DIR                change directory
env, environ          print the environment
pwd                   print the working directory
h, help, ?            show this help
q, quit, exit         stop this build
<N><action>           repeat an action N times, e.g. 3n";

/// Parse a line of operator input, substituting `default_answer` when it is blank
pub fn parse(line: &str, default_answer: &str) -> Input {
    let line = match line.trim() {
        "" => default_answer.trim(),
        trimmed => trimmed,
    };

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && digits < line.len() {
        let count = match line[..digits].parse::<usize>() {
            Ok(count) => count,
            Err(_) => return Input::Usage(format!("repeat count too large: {}", &line[..digits])),
        };
        return match parse_action(line[digits..].trim_start()) {
            Input::Action(action) => Input::Repeat { count, action },
            other => other,
        };
    }

    parse_action(line)
}

/// Whether `answer` can drive a run without an operator: it must run, skip
/// or quit, otherwise the stepper would never stop
pub fn is_unattended_answer(answer: &str) -> bool {
    match parse(answer, "") {
        Input::Action(action) => action.progresses(),
        Input::Repeat { count, action } => count > 0 && action.progresses(),
        Input::Usage(_) | Input::Unknown(_) => false,
    }
}

fn parse_action(line: &str) -> Input {
    let (word, argument) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let word = word.to_ascii_lowercase();

    let action = match word.as_str() {
        "y" | "yes" | "r" | "run" => Action::Run,
        "n" | "no" | "s" | "skip" | "next" => Action::Skip,
        "b" | "back" | "p" | "prev" => Action::Back,
        "rw" | "rewind" | "first" => Action::Rewind,
        "ff" | "fast-forward" | "last" => Action::FastForward,
        "g" | "goto" => return parse_goto(argument),
        "l" | "ls" | "list" => Action::List,
        "st" | "status" | "." => Action::Status,
        "sh" | "shell" => Action::Shell(None),
        name if NAMED_SHELLS.contains(&name) => Action::Shell(Some(name.to_string())),
        "cd" if argument.is_empty() => {
            return Input::Usage("cd requires a directory".to_string())
        }
        "cd" => Action::Cd(argument.to_string()),
        "h" | "help" | "?" => Action::Help,
        "env" | "environ" => Action::Env,
        "pwd" => Action::Pwd,
        "q" | "quit" | "exit" => Action::Quit,
        _ => return Input::Unknown(line.to_string()),
    };

    Input::Action(action)
}

fn parse_goto(argument: &str) -> Input {
    if argument.is_empty() {
        return Input::Usage("goto requires an index".to_string());
    }
    match argument.parse::<i64>() {
        Ok(index) if index < 0 => {
            Input::Usage(format!("goto index must not be negative: {}", index))
        }
        Ok(index) => Input::Action(Action::Goto(usize::try_from(index).unwrap_or(usize::MAX))),
        Err(_) => Input::Usage(format!("goto index is not a number: {}", argument)),
    }
}
