use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::flows::DeleteFlowError;
use crate::forms::FormErrors;
use crate::session::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Transport,
    Timeout,
    Status(u16),
    NotFound,
    Unauthorized,
    Decode,
    InvalidRequest,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport failure"),
            Self::Timeout => f.write_str("request timed out"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::NotFound => f.write_str("not found"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::Decode => f.write_str("response decode failure"),
            Self::InvalidRequest => f.write_str("invalid request"),
        }
    }
}

/// Failure of a single Product Service call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub detail: String,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Transport, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, detail)
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Decode, detail)
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(code: u16, detail: impl Into<String>) -> Self {
        let kind = match code {
            401 | 403 => ServiceErrorKind::Unauthorized,
            404 => ServiceErrorKind::NotFound,
            400 | 422 => ServiceErrorKind::InvalidRequest,
            other => ServiceErrorKind::Status(other),
        };
        Self::new(kind, detail)
    }
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Form(#[from] FormErrors),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Delete(#[from] DeleteFlowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AdminError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Service(error) => match error.kind {
                ServiceErrorKind::Transport | ServiceErrorKind::Timeout => "service_unavailable",
                ServiceErrorKind::NotFound => "not_found",
                ServiceErrorKind::Unauthorized => "unauthorized",
                ServiceErrorKind::InvalidRequest => "rejected",
                ServiceErrorKind::Status(_) | ServiceErrorKind::Decode => "service_error",
            },
            Self::Form(_) => "validation",
            Self::Session(SessionError::NotSignedIn) => "not_signed_in",
            Self::Session(_) => "session",
            Self::Delete(_) => "delete_flow",
            Self::Config(_) => "config_validation",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Service(error) => match error.kind {
                ServiceErrorKind::Transport | ServiceErrorKind::Timeout => {
                    "The product service is unreachable. Please retry shortly."
                }
                ServiceErrorKind::NotFound => "The requested record no longer exists.",
                ServiceErrorKind::Unauthorized => "Email or password is incorrect.",
                ServiceErrorKind::InvalidRequest => "The product service rejected the request.",
                ServiceErrorKind::Status(_) | ServiceErrorKind::Decode => {
                    "The product service returned an unexpected response."
                }
            },
            Self::Form(_) => "Some fields are missing or invalid. Check inputs and try again.",
            Self::Session(SessionError::NotSignedIn) => "Sign in first with `catalog-admin login`.",
            Self::Session(_) => "The local session could not be read or written.",
            Self::Delete(_) => "There is no pending delete to act on.",
            Self::Config(_) => "Configuration is invalid.",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Session(_) => 3,
            Self::Service(_) => 4,
            Self::Form(_) => 5,
            Self::Delete(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{AdminError, ServiceError, ServiceErrorKind};
    use crate::session::SessionError;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(ServiceError::from_status(404, "gone").kind, ServiceErrorKind::NotFound);
        assert_eq!(ServiceError::from_status(401, "nope").kind, ServiceErrorKind::Unauthorized);
        assert_eq!(ServiceError::from_status(400, "bad").kind, ServiceErrorKind::InvalidRequest);
        assert_eq!(ServiceError::from_status(503, "down").kind, ServiceErrorKind::Status(503));
    }

    #[test]
    fn transport_failure_maps_to_service_unavailable() {
        let error = AdminError::from(ServiceError::transport("connection refused"));

        assert_eq!(error.error_class(), "service_unavailable");
        assert_eq!(
            error.user_message(),
            "The product service is unreachable. Please retry shortly."
        );
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn missing_session_has_actionable_message() {
        let error = AdminError::from(SessionError::NotSignedIn);

        assert_eq!(error.error_class(), "not_signed_in");
        assert!(error.user_message().contains("login"));
    }

    #[test]
    fn display_carries_kind_and_detail() {
        let error = ServiceError::from_status(500, "record not found");
        assert_eq!(error.to_string(), "unexpected status 500: record not found");
    }
}
