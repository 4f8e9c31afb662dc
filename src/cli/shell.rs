use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::config::CONFIG_KEYS;
use crate::ledger::{UndoPolicy, Variant};

/// Set to any value to read commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "WORKLOG_CLI_SCRIPT";

const CONFIG_ACTIONS: &[&str] = &["show", "set"];
const HEADER_FLAGS: &[&str] = &["--clear"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<WorklogHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(WorklogHelper::new(context.command_names())));

    output_info(format!(
        "Recording `{}` entries. Type `help` to list commands.",
        context.session.ledger().variant()
    ));

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                if leave_requested(context)? == LoopControl::Exit {
                    break;
                }
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();

        if run_step(context, trimmed)? == LoopControl::Exit {
            break;
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running {
            break;
        }
        if run_step(context, &line?)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Ctrl-C and Ctrl-D ask before discarding entries, the same as `exit`.
fn leave_requested(context: &ShellContext) -> Result<LoopControl, CliError> {
    if context.confirm_exit()? {
        Ok(LoopControl::Exit)
    } else {
        Ok(LoopControl::Continue)
    }
}

/// Runs one line. Command failures are reported and never end the session.
fn run_step(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    if line.trim_start().starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read the line: {err}."));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// What the word under the cursor completes to.
#[derive(Debug, PartialEq)]
enum Slot<'a> {
    Words(&'a [&'static str]),
    Path,
    Nothing,
}

/// Tab completion for command names, `help` topics, `config` keys and
/// values, and file paths for the document commands.
struct WorklogHelper {
    commands: Vec<&'static str>,
    variants: Vec<&'static str>,
    policies: Vec<&'static str>,
    files: FilenameCompleter,
}

impl WorklogHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        Self {
            commands,
            variants: Variant::ALL.iter().map(Variant::key).collect(),
            policies: UndoPolicy::ALL.iter().map(UndoPolicy::key).collect(),
            files: FilenameCompleter::new(),
        }
    }

    /// `words` are the complete words before the cursor.
    fn slot(&self, words: &[&str]) -> Slot<'_> {
        match words {
            [] | ["help"] => Slot::Words(&self.commands),
            ["config"] => Slot::Words(CONFIG_ACTIONS),
            ["config", "set"] => Slot::Words(CONFIG_KEYS),
            ["config", "set", "variant"] => Slot::Words(&self.variants),
            ["config", "set", "undo_policy"] => Slot::Words(&self.policies),
            ["config", "set", "export_dir"] | ["export"] | ["convert"] | ["convert", _] => {
                Slot::Path
            }
            ["header"] => Slot::Words(HEADER_FLAGS),
            _ => Slot::Nothing,
        }
    }
}

fn matching(choices: &[&'static str], needle: &str) -> Vec<Pair> {
    let needle = needle.to_ascii_lowercase();
    choices
        .iter()
        .filter(|choice| choice.starts_with(&needle))
        .map(|choice| Pair {
            display: choice.to_string(),
            replacement: choice.to_string(),
        })
        .collect()
}

impl Helper for WorklogHelper {}

impl Completer for WorklogHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let words: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        match self.slot(&words) {
            Slot::Words(choices) => Ok((start, matching(choices, &prefix[start..]))),
            Slot::Path => self.files.complete(line, pos, ctx),
            Slot::Nothing => Ok((start, Vec::new())),
        }
    }
}

impl Hinter for WorklogHelper {
    type Hint = String;
}

impl Highlighter for WorklogHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for WorklogHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}
