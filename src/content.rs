//! Photo share content: the container that owns the photos of one share.

use crate::errors::{ShareError, ShareResult};
use crate::photo::SharePhoto;
use crate::types::UniqueId;
use crate::validation::{SharingValidation, ValidationOptions};
use serde::{Deserialize, Serialize};
use url::Url;

/// Fewest photos a photo share may carry.
pub const MIN_PHOTOS: usize = 1;

/// Most photos a photo share may carry.
pub const MAX_PHOTOS: usize = 6;

/// Hashtag attached to a share, e.g. `#sunset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hashtag(String);

impl Hashtag {
    /// A hashtag is `#` followed by one or more word characters.
    pub fn new(tag: impl Into<String>) -> ShareResult<Self> {
        let tag = tag.into();
        let valid = tag
            .strip_prefix('#')
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_alphanumeric() || c == '_'))
            .unwrap_or(false);
        if !valid {
            return Err(
                ShareError::invalid_argument("hashtag", "must be '#' followed by word characters")
                    .with_context("value", &tag),
            );
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hashtag {
    type Error = ShareError;

    fn try_from(tag: String) -> ShareResult<Self> {
        Self::new(tag)
    }
}

impl From<Hashtag> for String {
    fn from(tag: Hashtag) -> Self {
        tag.0
    }
}

impl std::fmt::Display for Hashtag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A model for photo content to be shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharePhotoContent {
    /// Photos to share (1 to 6).
    pub photos: Vec<SharePhoto>,

    /// URL for the content being shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<Url>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<Hashtag>,

    /// Place to tag in the share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// People to tag in the share.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_ids: Vec<String>,

    /// Identifier the host echoes back in the share result.
    pub share_uuid: UniqueId,
}

impl SharePhotoContent {
    /// Create content with a fresh share uuid.
    pub fn new(photos: Vec<SharePhoto>) -> Self {
        Self {
            photos,
            content_url: None,
            hashtag: None,
            place_id: None,
            peer_ids: vec![],
            share_uuid: UniqueId::new(),
        }
    }

    /// Add a photo.
    pub fn photo(mut self, photo: SharePhoto) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn content_url(mut self, url: Url) -> Self {
        self.content_url = Some(url);
        self
    }

    pub fn hashtag(mut self, hashtag: Hashtag) -> Self {
        self.hashtag = Some(hashtag);
        self
    }

    pub fn place(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    pub fn peer(mut self, peer_id: impl Into<String>) -> Self {
        self.peer_ids.push(peer_id.into());
        self
    }
}

impl SharingValidation for SharePhotoContent {
    fn validate(&self, options: &ValidationOptions) -> ShareResult<()> {
        let count = self.photos.len();
        if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&count) {
            return Err(ShareError::invalid_argument(
                "photos",
                format!(
                    "must contain between {} and {} photos, found {}",
                    MIN_PHOTOS, MAX_PHOTOS, count
                ),
            )
            .with_context("count", count));
        }

        for (index, photo) in self.photos.iter().enumerate() {
            photo
                .validate(options)
                .map_err(|e| e.with_context("photo_index", index))?;
        }

        Ok(())
    }
}
