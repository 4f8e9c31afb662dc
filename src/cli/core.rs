//! Core CLI loop state, dispatch, and shell context helpers.

use std::{
    io,
    path::{Path, PathBuf},
};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    cli::{
        commands,
        io as cli_io,
        registry::{CommandEntry, CommandRegistry},
    },
    config::{Config, ConfigManager},
    errors::{ConfigError, LedgerError, WorklogError},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) session: Session,
    pub(crate) theme: ColorfulTheme,
    config: Config,
    config_manager: ConfigManager,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new())
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load().map_err(WorklogError::from)?;
        tracing::debug!(path = %config_manager.path().display(), "configuration loaded");

        Ok(ShellContext {
            mode,
            registry,
            session: Session::new(&config),
            theme: ColorfulTheme::default(),
            config,
            config_manager,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn config_path(&self) -> &Path {
        self.config_manager.path()
    }

    /// Applies one setting to the session first, then persists it. A value the
    /// session rejects leaves both the file and the session unchanged.
    pub(crate) fn update_config(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set(key, value)?;
        self.session.apply_config(&updated)?;
        self.config = updated;
        self.persist_config()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Relative document paths resolve against the configured export directory.
    pub(crate) fn resolve_document_path(&self, input: &str) -> PathBuf {
        let path = PathBuf::from(input);
        match &self.config.export_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }

    pub(crate) fn prompt(&self) -> String {
        let ledger = self.session.ledger();
        format!("worklog[{} {}]> ", ledger.variant().key(), ledger.len())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Entries live only in memory, so leaving with records asks first.
    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script || !self.session.has_unsaved_records() {
            return Ok(true);
        }
        cli_io::confirm_action(
            &self.theme,
            &format!(
                "Discard {} unsaved entr{} and exit?",
                self.session.ledger().len(),
                if self.session.ledger().len() == 1 { "y" } else { "ies" }
            ),
            false,
        )
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(
                err @ (WorklogError::Format(_) | WorklogError::Ledger(LedgerError::TotalOverflow)),
            ) => {
                self.print_error(&err.to_string());
                self.print_hint("Nothing was added. Correct the value and try again.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] WorklogError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WorklogError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: &Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf());
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}
