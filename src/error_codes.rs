//! Stable error codes shared by the generators and the CLI.

use std::fmt;

use anyhow::Error;
use serde::Serialize;
use serde_json::Value;

/// Process exit status for uncoded failures.
pub const INTERNAL_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodedErrorKind {
    InvalidInput,
    Usage,
}

impl CodedErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::InvalidInput | Self::Usage => 2,
        }
    }
}

/// An error with a machine-readable code. Carried inside `anyhow::Error` and
/// recovered with [`find_coded_error`].
#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub kind: CodedErrorKind,
}

impl CodedError {
    fn new(kind: CodedErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind,
        }
    }

    /// A value the generators refuse to turn into a config.
    pub fn invalid_input(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CodedErrorKind::InvalidInput, code, message)
    }

    /// Bad flag values, malformed settings and unreadable CLI inputs.
    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CodedErrorKind::Usage, code, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::failure(self.code, self.message.clone(), self.details.clone())
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

/// `{"ok": false, "error": {...}}` as printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

impl ErrorEnvelope {
    fn failure(code: &str, message: String, details: Option<Value>) -> Self {
        Self {
            ok: false,
            error: ErrorEnvelopeBody {
                code: code.to_owned(),
                message,
                details,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

/// Envelope for any error; uncoded errors are reported as `INTERNAL`.
pub fn envelope_for(error: &Error) -> ErrorEnvelope {
    match find_coded_error(error) {
        Some(coded) => coded.envelope(),
        None => ErrorEnvelope::failure("INTERNAL", format!("{error:#}"), None),
    }
}

pub fn exit_code_for(error: &Error) -> i32 {
    find_coded_error(error).map_or(INTERNAL_EXIT_CODE, |coded| coded.kind.exit_code())
}
