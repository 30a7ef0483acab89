//! Shared value types used by share media.

use crate::errors::{ShareError, ShareResult};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Header the host graph API expects in front of base64 image uploads.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// In-memory image attached to a share.
///
/// The encoded image bytes are held behind an `Arc`, so cloning a bitmap
/// (and any photo holding it) never copies pixels. A blake3 digest is taken
/// once at construction and is what equality and hashing compare; two
/// bitmaps sharing one buffer short-circuit on pointer identity.
#[derive(Clone)]
pub struct Bitmap {
    bytes: Arc<[u8]>,
    digest: [u8; 32],
}

impl Bitmap {
    /// Wrap encoded image bytes. Fails when there are no bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> ShareResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ShareError::invalid_argument(
                "image",
                "image data must not be empty",
            ));
        }
        let digest = *blake3::hash(&bytes).as_bytes();
        Ok(Self { bytes, digest })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty bitmaps are rejected by [`Bitmap::new`].
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded blake3 digest of the image bytes.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// True when both bitmaps point at the same underlying buffer.
    pub fn shares_buffer(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Base64 body without any header.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:image/png;base64,...` form used for graph uploads.
    pub fn to_data_uri(&self) -> String {
        format!("{}{}", PNG_DATA_URI_PREFIX, self.to_base64())
    }

    /// Decode a base64 body and check it against an expected hex digest.
    pub fn from_base64(encoded: &str, expected_digest: &str) -> ShareResult<Self> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        let bitmap = Self::new(bytes).map_err(|_| ShareError::decode("image data is empty"))?;
        if !bitmap.digest_hex().eq_ignore_ascii_case(expected_digest) {
            return Err(ShareError::decode("image digest does not match image data")
                .with_context("expected", expected_digest)
                .with_context("actual", bitmap.digest_hex()));
        }
        Ok(bitmap)
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.shares_buffer(other) || self.digest == other.digest
    }
}

impl Eq for Bitmap {}

impl std::hash::Hash for Bitmap {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digest.hash(state);
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("len", &self.bytes.len())
            .field("digest", &&self.digest_hex()[..16])
            .finish()
    }
}

/// Opaque reference into the device media library.
///
/// Resolving the reference to image data is the job of the asset library,
/// not of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Create an asset reference. Blank identifiers are rejected.
    pub fn new(id: impl Into<String>) -> ShareResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ShareError::invalid_argument(
                "photoAsset",
                "asset identifier must not be empty",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = ShareError;

    fn try_from(id: String) -> ShareResult<Self> {
        Self::new(id)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an absolute image location (`https:`, `http:`, `file:`, ...).
pub fn parse_image_url(raw: &str) -> ShareResult<url::Url> {
    if raw.trim().is_empty() {
        return Err(ShareError::invalid_argument(
            "imageURL",
            "URL must not be empty",
        ));
    }
    url::Url::parse(raw).map_err(|e| {
        ShareError::invalid_argument("imageURL", format!("not a well-formed URL ({})", e))
            .with_context("value", raw)
    })
}

/// Generic parameter map for logged events.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Unique identifier (UUID-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueId(pub Uuid);

impl UniqueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for UniqueId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UniqueId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
