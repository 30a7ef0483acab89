//! Standard error type for share contracts.
//!
//! Every failure surfaced by this crate is a [`ShareError`] carrying a
//! machine-readable [`ErrorCode`]. Errors fall into three phases:
//!
//! 1. **Construction**: `INVALID_ARGUMENT`, returned synchronously when a
//!    required field is missing or malformed.
//! 2. **Validation**: `MISSING_SOURCE`, `CAPTION_POLICY_VIOLATION`,
//!    `UNSUPPORTED_SOURCE`. The caller must not submit the content.
//! 3. **Codec**: `DECODE_ERROR`, `ENCODE_ERROR`, `VERSION_MISMATCH`.
//!    A failed decode never yields a partially populated value.
//!
//! None of these are retried automatically.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every fallible share operation.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct ShareError {
    /// Error code (machine-readable)
    pub code: ErrorCode,

    /// Human-readable message, suitable for surfacing to the caller
    pub message: String,

    /// Additional context (field names, offending values)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl ShareError {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let context = self.context.get_or_insert_with(HashMap::new);
        if let Ok(v) = serde_json::to_value(value) {
            context.insert(key.into(), v);
        }
        self
    }

    /// Look up a context value by key
    pub fn context_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.context.as_ref().and_then(|c| c.get(key))
    }

    /// Which phase produced this error.
    pub fn phase(&self) -> ErrorPhase {
        self.code.phase()
    }

    // ═══════════════════════════════════════════════════════════
    // Common error constructors
    // ═══════════════════════════════════════════════════════════

    /// Required argument missing or malformed
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Invalid value for {}: {}", name, message.into()),
        )
        .with_context("argument", name)
    }

    /// Photo has no image, image URL or asset
    pub fn missing_source() -> Self {
        Self::new(
            ErrorCode::MissingSource,
            "Must have an asset, image, or imageURL value",
        )
        .with_context("argument", "photo")
    }

    /// Caption present where platform policy forbids pre-filled text
    pub fn caption_policy_violation() -> Self {
        Self::new(
            ErrorCode::CaptionPolicyViolation,
            "Caption must be authored by the user; pre-filled captions are forbidden by Platform Policy 2.3",
        )
        .with_context("argument", "caption")
    }

    /// Source variant not accepted by the requested bridge
    pub fn unsupported_source(name: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedSource, message).with_context("argument", name)
    }

    /// Payload could not be decoded
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeError, message)
    }

    /// Payload could not be encoded
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EncodeError, message)
    }

    /// Payload written by an incompatible format version
    pub fn version_mismatch(found: &semver::Version, supported: &semver::Version) -> Self {
        Self::new(
            ErrorCode::VersionMismatch,
            format!(
                "Payload version {} cannot be read by format version {}",
                found, supported
            ),
        )
        .with_context("found", found.to_string())
        .with_context("supported", supported.to_string())
    }
}

/// Error codes for share operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ═══════════════════════════════════════════════════════
    // CONSTRUCTION
    // ═══════════════════════════════════════════════════════
    /// Caller-supplied required field missing or malformed
    InvalidArgument,

    // ═══════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════
    /// No source variant populated
    MissingSource,

    /// Caption not asserted as user-authored while policy requires it
    CaptionPolicyViolation,

    /// Source variant rejected by the bridge options
    UnsupportedSource,

    // ═══════════════════════════════════════════════════════
    // CODEC
    // ═══════════════════════════════════════════════════════
    /// Tampered, truncated or malformed payload
    DecodeError,

    /// Value could not be written
    EncodeError,

    /// Payload format version is newer than this reader
    VersionMismatch,
}

impl ErrorCode {
    /// Phase of the share pipeline this code belongs to
    pub fn phase(&self) -> ErrorPhase {
        match self {
            Self::InvalidArgument => ErrorPhase::Construction,
            Self::MissingSource | Self::CaptionPolicyViolation | Self::UnsupportedSource => {
                ErrorPhase::Validation
            }
            Self::DecodeError | Self::EncodeError | Self::VersionMismatch => ErrorPhase::Codec,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MissingSource => "MISSING_SOURCE",
            Self::CaptionPolicyViolation => "CAPTION_POLICY_VIOLATION",
            Self::UnsupportedSource => "UNSUPPORTED_SOURCE",
            Self::DecodeError => "DECODE_ERROR",
            Self::EncodeError => "ENCODE_ERROR",
            Self::VersionMismatch => "VERSION_MISMATCH",
        };
        write!(f, "{}", s)
    }
}

/// Pipeline phase an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPhase {
    Construction,
    Validation,
    Codec,
}

impl From<serde_json::Error> for ShareError {
    fn from(e: serde_json::Error) -> Self {
        ShareError::decode(format!("JSON error: {}", e))
            .with_context("line", e.line())
            .with_context("column", e.column())
    }
}

impl From<base64::DecodeError> for ShareError {
    fn from(e: base64::DecodeError) -> Self {
        ShareError::decode(format!("Base64 error: {}", e))
    }
}

/// Result type alias for share operations
pub type ShareResult<T> = Result<T, ShareError>;
