//! Sharing validation.
//!
//! Content is validated right before it is handed to the host platform.
//! Any error means "do not submit": the caller surfaces the error to the
//! user (fix the caption, pick another photo) or drops the share.
//!
//! Validation is a pure function of the value and the [`ValidationOptions`].
//! It never loads assets, downloads URLs or touches the disk.

use crate::errors::ShareResult;
use serde::{Deserialize, Serialize};

/// Who wrote the caption attached to a share.
///
/// The model only stores the caption text. Whether it was typed by the user
/// is known to the calling UI alone, so the caller asserts it here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionOrigin {
    /// Typed by the end user.
    #[default]
    User,

    /// Filled in by the application.
    Prefilled,
}

/// Constraints imposed by the bridge the content is sent through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeOptions {
    /// Photos must be sent as web (non-`file:`) image URLs.
    #[serde(default)]
    pub web_image_url_required: bool,

    /// Image URLs must point at local files.
    #[serde(default)]
    pub local_image_url_required: bool,
}

impl BridgeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn web_image_url(mut self) -> Self {
        self.web_image_url_required = true;
        self
    }

    pub fn local_image_url(mut self) -> Self {
        self.local_image_url_required = true;
        self
    }
}

/// Options supplied by the caller when validating content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Accept captions the application filled in.
    #[serde(default)]
    pub allow_prefilled_captions: bool,

    /// Caller's assertion about who wrote the caption.
    #[serde(default)]
    pub caption_origin: CaptionOrigin,

    /// Bridge constraints.
    #[serde(default)]
    pub bridge: BridgeOptions,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_prefilled_captions(mut self, allow: bool) -> Self {
        self.allow_prefilled_captions = allow;
        self
    }

    pub fn caption_origin(mut self, origin: CaptionOrigin) -> Self {
        self.caption_origin = origin;
        self
    }

    pub fn bridge(mut self, bridge: BridgeOptions) -> Self {
        self.bridge = bridge;
        self
    }

    /// True when a present caption would break platform policy.
    pub fn rejects_caption(&self) -> bool {
        !self.allow_prefilled_captions && self.caption_origin != CaptionOrigin::User
    }
}

/// Implemented by every value that can be submitted for sharing.
pub trait SharingValidation {
    /// Check the value against platform policy and the bridge constraints.
    fn validate(&self, options: &ValidationOptions) -> ShareResult<()>;

    /// Convenience wrapper for callers that only need a yes/no.
    fn is_valid(&self, options: &ValidationOptions) -> bool {
        self.validate(options).is_ok()
    }
}
