//! Secure payload codec for share values.
//!
//! Values cross process boundaries (inter-app handoff, persisted drafts) as
//! JSON wrapped in a small envelope:
//!
//! ```json
//! { "format": "share_photo", "version": "1.0.0", "body": { ... } }
//! ```
//!
//! Decoding fails closed. Oversized input, a foreign `format`, a newer major
//! `version`, unknown fields, unknown source tags or a malformed body all
//! return `DECODE_ERROR` (or `VERSION_MISMATCH`) and never a partially built
//! value.

use crate::config::ShareConfig;
use crate::content::SharePhotoContent;
use crate::errors::{ShareError, ShareResult};
use crate::photo::SharePhoto;
use semver::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A value with a stable, versioned wire format.
pub trait PayloadFormat: Serialize + DeserializeOwned {
    /// Identifier written to the envelope's `format` field.
    const FORMAT_ID: &'static str;

    /// Version written by this build.
    fn format_version() -> Version;
}

impl PayloadFormat for SharePhoto {
    const FORMAT_ID: &'static str = "share_photo";

    fn format_version() -> Version {
        Version::new(1, 0, 0)
    }
}

impl PayloadFormat for SharePhotoContent {
    const FORMAT_ID: &'static str = "share_photo_content";

    fn format_version() -> Version {
        Version::new(1, 0, 0)
    }
}

/// Version compatibility rules.
#[derive(Debug, Clone)]
pub struct VersionCompatibility;

impl VersionCompatibility {
    /// Newer readers can always read older payloads of the same lineage.
    pub fn can_read(reader_version: &Version, payload_version: &Version) -> bool {
        reader_version.major >= payload_version.major
    }

    /// Same major version.
    pub fn is_compatible(v1: &Version, v2: &Version) -> bool {
        v1.major == v2.major
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    format: &'a str,
    version: Version,
    body: &'a T,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvelopeIn {
    format: String,
    version: Version,
    body: serde_json::Value,
}

/// Encoder/decoder for [`PayloadFormat`] values.
#[derive(Debug, Clone)]
pub struct ShareCodec {
    max_payload_bytes: usize,
}

impl ShareCodec {
    pub fn new(config: &ShareConfig) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Encode a value into its enveloped JSON bytes.
    pub fn encode<T: PayloadFormat>(&self, value: &T) -> ShareResult<Vec<u8>> {
        let envelope = EnvelopeOut {
            format: T::FORMAT_ID,
            version: T::format_version(),
            body: value,
        };
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|e| ShareError::encode(format!("JSON error: {}", e)))?;
        trace!(format = T::FORMAT_ID, len = bytes.len(), "encoded share payload");
        Ok(bytes)
    }

    /// Decode enveloped JSON bytes back into a value.
    pub fn decode<T: PayloadFormat>(&self, bytes: &[u8]) -> ShareResult<T> {
        self.decode_inner(bytes).inspect_err(|e| {
            debug!(format = T::FORMAT_ID, error = %e, "rejected share payload");
        })
    }

    fn decode_inner<T: PayloadFormat>(&self, bytes: &[u8]) -> ShareResult<T> {
        if bytes.len() > self.max_payload_bytes {
            return Err(ShareError::decode("payload exceeds the configured size limit")
                .with_context("len", bytes.len())
                .with_context("limit", self.max_payload_bytes));
        }

        let envelope: EnvelopeIn = serde_json::from_slice(bytes)?;
        if envelope.format != T::FORMAT_ID {
            return Err(ShareError::decode("payload format does not match")
                .with_context("expected", T::FORMAT_ID)
                .with_context("found", envelope.format));
        }

        let supported = T::format_version();
        if !VersionCompatibility::can_read(&supported, &envelope.version) {
            return Err(ShareError::version_mismatch(&envelope.version, &supported));
        }

        let value = serde_json::from_value(envelope.body)?;
        trace!(format = T::FORMAT_ID, len = bytes.len(), "decoded share payload");
        Ok(value)
    }
}

impl Default for ShareCodec {
    fn default() -> Self {
        Self::new(&ShareConfig::default())
    }
}
