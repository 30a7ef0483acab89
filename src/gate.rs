//! Validation gate in front of the host sharing platform.
//!
//! The host pipeline calls [`ValidationGate::admit`] right before submitting
//! content. An `Err` means "do not submit". Every decision is reported
//! through the [`EventLogging`] capability when one is attached.

use crate::codec::PayloadFormat;
use crate::config::ShareConfig;
use crate::errors::ShareResult;
use crate::events::EventLogging;
use crate::types::Metadata;
use crate::validation::{SharingValidation, ValidationOptions};
use tracing::warn;

/// Event logged for every gate decision.
pub const SHARE_VALIDATION_EVENT: &str = "share_validation";

/// Checks content before it is handed to the host platform.
pub struct ValidationGate<'a> {
    options: ValidationOptions,
    logger: Option<&'a dyn EventLogging>,
}

impl<'a> ValidationGate<'a> {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            options,
            logger: None,
        }
    }

    /// Gate using the caption policy from the config.
    pub fn from_config(config: &ShareConfig) -> Self {
        Self::new(config.validation_options())
    }

    /// Report decisions through the given logger.
    pub fn with_logger(mut self, logger: &'a dyn EventLogging) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate content for submission.
    pub fn admit<T>(&self, content: &T) -> ShareResult<()>
    where
        T: SharingValidation + PayloadFormat,
    {
        let result = content.validate(&self.options);

        let mut params = Metadata::new();
        params.insert("content_type".into(), T::FORMAT_ID.into());
        match &result {
            Ok(()) => {
                params.insert("outcome".into(), "approved".into());
            }
            Err(e) => {
                warn!(content_type = T::FORMAT_ID, error = %e, "share blocked by validation");
                params.insert("outcome".into(), "rejected".into());
                params.insert("error_code".into(), e.code.to_string().into());
            }
        }

        if let Some(logger) = self.logger {
            logger.log_event(SHARE_VALIDATION_EVENT, Some(&params), None, None);
        }

        result
    }
}

impl Default for ValidationGate<'_> {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}
