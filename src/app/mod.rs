//! Command-line entry point: resolves configuration, runs a session and turns
//! its outcome into process output.

pub mod cli;

use crate::config::{load_config_document, load_settings, resolve_aws_config_path};
use crate::session::keys::{parse_scripted_keys, SCRIPT_KEYS_ENV};
use crate::session::{Session, SessionOutcome};
use crate::shared::logging::EventLog;
use crate::tui::{run_session_scripted, run_session_tui};
use cli::{help_text, parse_cli_args, version_text};
use crossterm::event::KeyEvent;
use std::io::{self, IsTerminal};

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let options = parse_cli_args(&args)?;
    if options.help {
        return Ok(help_text());
    }
    if options.version {
        return Ok(version_text());
    }

    let settings = load_settings().map_err(|err| err.to_string())?;
    let config_path = resolve_aws_config_path(
        options.config_path.as_deref(),
        settings.aws_config_path.as_deref(),
    )
    .map_err(|err| err.to_string())?;
    let document = load_config_document(&config_path)
        .map_err(|err| format!("failed to load AWS config file: {err}"))?;
    let log = match settings.resolve_log_path().map_err(|err| err.to_string())? {
        Some(path) => EventLog::to_file(path),
        None => EventLog::disabled(),
    };

    let mut session = Session::new(&config_path, document, log).with_info_lines(settings.show_info);
    let outcome = if let Some(scripted_keys) = load_scripted_keys()? {
        run_session_scripted(&mut session, scripted_keys)?
    } else if is_interactive_terminal() {
        run_session_tui(&mut session, settings.watch_config)?
    } else {
        return Err(format!(
            "aws-profile-switcher needs an interactive terminal (or {SCRIPT_KEYS_ENV} for scripted use)"
        ));
    };
    describe_outcome(outcome)
}

fn is_interactive_terminal() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn load_scripted_keys() -> Result<Option<Vec<KeyEvent>>, String> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_keys(&raw).map(Some)
}

pub fn describe_outcome(outcome: SessionOutcome) -> Result<String, String> {
    match outcome {
        SessionOutcome::Cancelled => Ok("cancelled, no changes written".to_string()),
        SessionOutcome::NothingSelected => {
            Ok("no profile selected, no changes written".to_string())
        }
        SessionOutcome::Promoted {
            profile,
            keys_copied,
        } => Ok(format!(
            "profile [default] now uses [profile {profile}] ({keys_copied} keys copied)"
        )),
        SessionOutcome::PromotionFailed { profile, error } => {
            Err(format!("failed to switch to profile `{profile}`: {error}"))
        }
        SessionOutcome::Aborted { reason } => Err(format!("session aborted: {reason}")),
    }
}
