pub mod auth;
pub mod config;
pub mod doctor;
pub mod images;
pub mod lookups;
pub mod owners;
pub mod products;
pub mod render;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use catalog_admin_core::config::ApiConfig;
use catalog_admin_core::errors::AdminError;
use catalog_admin_core::session::{SessionContext, SessionStore};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

/// What every command needs besides its service and arguments.
#[derive(Clone, Copy, Debug)]
pub struct CommandEnv<'a> {
    pub api: &'a ApiConfig,
    pub reset_delay: Duration,
    pub mode: OutputMode,
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn done(command: &str, mode: OutputMode, message: impl Into<String>) -> Self {
        match mode {
            OutputMode::Human => Self { exit_code: 0, output: message.into() },
            OutputMode::Json => Self::success(command, message),
        }
    }

    /// Human mode prints `human`; JSON mode wraps `data` in the usual payload.
    pub fn report<T: Serialize>(
        command: &str,
        mode: OutputMode,
        message: impl Into<String>,
        human: impl FnOnce() -> String,
        data: &T,
    ) -> Self {
        match mode {
            OutputMode::Human => Self { exit_code: 0, output: human() },
            OutputMode::Json => {
                let payload = CommandOutcome {
                    command: command.to_string(),
                    status: "ok".to_string(),
                    error_class: None,
                    message: message.into(),
                    data: serde_json::to_value(data).ok(),
                };
                Self { exit_code: 0, output: serialize_payload(payload) }
            }
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &AdminError) -> Self {
        let message = match error {
            AdminError::Form(errors) => {
                let fields: Vec<String> =
                    errors.fields().iter().map(ToString::to_string).collect();
                format!("{} {}", error.user_message(), fields.join("; "))
            }
            other => format!("{} ({other})", other.user_message()),
        };
        Self::failure(command, error.error_class(), message, error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Catalog commands only run for a signed-in owner.
pub fn require_session<T: SessionStore>(
    command: &str,
    session: &SessionContext<T>,
) -> Result<(), CommandResult> {
    session
        .require_signed_in()
        .map(|_| ())
        .map_err(|error| CommandResult::from_error(command, &AdminError::Session(error)))
}

/// Asks the operator a yes/no question before a destructive call.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
