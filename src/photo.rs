//! A photo for sharing.
//!
//! A [`SharePhoto`] carries at most one [`PhotoSource`]: an in-memory
//! [`Bitmap`], an image URL, or a media library [`AssetId`]. Assigning a new
//! source replaces the old one in a single move, so two sources can never be
//! populated at once.
//!
//! The caption, if any, must come from the user: pre-filled content is
//! forbidden by Platform Policy 2.3. The photo cannot tell who wrote it; the
//! caller asserts authorship through
//! [`ValidationOptions::caption_origin`](crate::validation::ValidationOptions).
//!
//! `Clone` shares the bitmap buffer and copies everything else, so editing a
//! clone's caption never touches the original.

use crate::errors::{ShareError, ShareResult};
use crate::types::{parse_image_url, AssetId, Bitmap};
use crate::validation::{SharingValidation, ValidationOptions};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use url::Url;

/// The concrete media behind a photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhotoSource {
    /// Image resident in memory.
    Image(Bitmap),

    /// Network location or file on disk.
    ImageUrl(Url),

    /// Photo in the device media library.
    Asset(AssetId),
}

impl PhotoSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Image(_) => SourceKind::Image,
            Self::ImageUrl(_) => SourceKind::Url,
            Self::Asset(_) => SourceKind::Asset,
        }
    }
}

impl From<Bitmap> for PhotoSource {
    fn from(bitmap: Bitmap) -> Self {
        Self::Image(bitmap)
    }
}

impl From<Url> for PhotoSource {
    fn from(url: Url) -> Self {
        Self::ImageUrl(url)
    }
}

impl From<AssetId> for PhotoSource {
    fn from(asset: AssetId) -> Self {
        Self::Asset(asset)
    }
}

/// Wire tag of a source variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Image,
    Url,
    Asset,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Url => "url",
            Self::Asset => "asset",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A photo for sharing.
///
/// `SharePhoto::default()` has no source; it exists so callers can fill the
/// source in later, and it fails validation until they do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PhotoRecord", into = "PhotoRecord")]
pub struct SharePhoto {
    source: Option<PhotoSource>,
    user_generated: bool,
    caption: Option<String>,
}

impl SharePhoto {
    /// Photo backed by an image in memory.
    pub fn from_image(image: Bitmap, user_generated: bool) -> Self {
        Self::with_source(PhotoSource::Image(image), user_generated)
    }

    /// Photo backed by an image URL.
    ///
    /// Intended for open graph stories. To share a photo from the web on its
    /// own, download it and use [`SharePhoto::from_image`] instead.
    pub fn from_image_url(image_url: &str, user_generated: bool) -> ShareResult<Self> {
        let url = parse_image_url(image_url).inspect_err(|e| {
            debug!(error = %e, "rejected image URL for share photo");
        })?;
        Ok(Self::with_source(PhotoSource::ImageUrl(url), user_generated))
    }

    /// Photo backed by a media library asset.
    pub fn from_asset(asset_id: impl Into<String>, user_generated: bool) -> ShareResult<Self> {
        let asset = AssetId::new(asset_id).inspect_err(|e| {
            debug!(error = %e, "rejected asset reference for share photo");
        })?;
        Ok(Self::with_source(PhotoSource::Asset(asset), user_generated))
    }

    fn with_source(source: PhotoSource, user_generated: bool) -> Self {
        Self {
            source: Some(source),
            user_generated,
            caption: None,
        }
    }

    /// Builder-style caption setter.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.set_caption(caption);
        self
    }

    // ═══════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════

    pub fn source(&self) -> Option<&PhotoSource> {
        self.source.as_ref()
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(PhotoSource::kind)
    }

    /// Image data, if the photo is resident in memory.
    pub fn image(&self) -> Option<&Bitmap> {
        match &self.source {
            Some(PhotoSource::Image(bitmap)) => Some(bitmap),
            _ => None,
        }
    }

    /// Network location or location of the photo on disk.
    pub fn image_url(&self) -> Option<&Url> {
        match &self.source {
            Some(PhotoSource::ImageUrl(url)) => Some(url),
            _ => None,
        }
    }

    /// Reference into the media library.
    pub fn asset(&self) -> Option<&AssetId> {
        match &self.source {
            Some(PhotoSource::Asset(asset)) => Some(asset),
            _ => None,
        }
    }

    /// Whether the photo was generated by the user rather than the app.
    pub fn is_user_generated(&self) -> bool {
        self.user_generated
    }

    /// The user generated caption, if any.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    // ═══════════════════════════════════════════════════════
    // Mutation
    // ═══════════════════════════════════════════════════════

    /// Replace the source. Whatever was populated before is dropped.
    pub fn set_source(&mut self, source: impl Into<PhotoSource>) {
        self.source = Some(source.into());
    }

    pub fn set_image(&mut self, image: Bitmap) {
        self.set_source(image);
    }

    pub fn set_image_url(&mut self, image_url: Url) {
        self.set_source(image_url);
    }

    pub fn set_asset(&mut self, asset: AssetId) {
        self.set_source(asset);
    }

    /// Remove the source, returning it.
    pub fn clear_source(&mut self) -> Option<PhotoSource> {
        self.source.take()
    }

    pub fn set_user_generated(&mut self, user_generated: bool) {
        self.user_generated = user_generated;
    }

    /// Set the caption. Blank captions are stored as absent.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        let caption = caption.into();
        self.caption = if caption.trim().is_empty() {
            None
        } else {
            Some(caption)
        };
    }

    pub fn clear_caption(&mut self) {
        self.caption = None;
    }
}

impl SharingValidation for SharePhoto {
    fn validate(&self, options: &ValidationOptions) -> ShareResult<()> {
        let source = self.source.as_ref().ok_or_else(ShareError::missing_source)?;

        if self.caption.is_some() && options.rejects_caption() {
            return Err(ShareError::caption_policy_violation()
                .with_context("caption_origin", options.caption_origin));
        }

        let bridge = &options.bridge;
        if bridge.web_image_url_required {
            match source {
                PhotoSource::ImageUrl(url) if url.scheme() != "file" => {}
                PhotoSource::ImageUrl(url) => {
                    return Err(ShareError::unsupported_source(
                        "imageURL",
                        "Cannot refer to a local file resource",
                    )
                    .with_context("value", url.as_str()));
                }
                other => {
                    return Err(ShareError::unsupported_source(
                        "photo",
                        "Must have an imageURL value when web image URLs are required",
                    )
                    .with_context("source", other.kind()));
                }
            }
        }

        if bridge.local_image_url_required {
            if let PhotoSource::ImageUrl(url) = source {
                if url.scheme() != "file" {
                    return Err(ShareError::unsupported_source(
                        "imageURL",
                        "Must refer to a local file resource",
                    )
                    .with_context("value", url.as_str()));
                }
            }
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire representation
// ═══════════════════════════════════════════════════════════════════

/// Serialized form of a photo. Absent fields are omitted, never empty.
///
/// An omitted optional field decodes to `None`; an explicit `null` is
/// rejected.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhotoRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    source: Option<SourceRecord>,

    user_generated: bool,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    caption: Option<String>,
}

// Only runs when the field is in the payload, so `null` hits `T` and fails.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum SourceRecord {
    Image { data: String, digest: String },
    Url { value: String },
    Asset { value: String },
}

impl From<SharePhoto> for PhotoRecord {
    fn from(photo: SharePhoto) -> Self {
        let source = photo.source.map(|source| match source {
            PhotoSource::Image(bitmap) => SourceRecord::Image {
                data: bitmap.to_base64(),
                digest: bitmap.digest_hex(),
            },
            PhotoSource::ImageUrl(url) => SourceRecord::Url {
                value: url.into(),
            },
            PhotoSource::Asset(asset) => SourceRecord::Asset {
                value: asset.into(),
            },
        });
        Self {
            source,
            user_generated: photo.user_generated,
            caption: photo.caption,
        }
    }
}

impl TryFrom<PhotoRecord> for SharePhoto {
    type Error = ShareError;

    fn try_from(record: PhotoRecord) -> ShareResult<Self> {
        let source = match record.source {
            None => None,
            Some(SourceRecord::Image { data, digest }) => {
                Some(PhotoSource::Image(Bitmap::from_base64(&data, &digest)?))
            }
            Some(SourceRecord::Url { value }) => {
                let url = Url::parse(&value).map_err(|e| {
                    ShareError::decode(format!("url source is not a valid location: {}", e))
                })?;
                Some(PhotoSource::ImageUrl(url))
            }
            Some(SourceRecord::Asset { value }) => {
                let asset = AssetId::new(value)
                    .map_err(|_| ShareError::decode("asset source has an empty identifier"))?;
                Some(PhotoSource::Asset(asset))
            }
        };

        if matches!(&record.caption, Some(c) if c.trim().is_empty()) {
            return Err(ShareError::decode("caption is present but blank"));
        }

        Ok(Self {
            source,
            user_generated: record.user_generated,
            caption: record.caption,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::validation::{BridgeOptions, CaptionOrigin};

    fn bitmap() -> Bitmap {
        Bitmap::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3]).unwrap()
    }

    fn populated(photo: &SharePhoto) -> usize {
        [
            photo.image().is_some(),
            photo.image_url().is_some(),
            photo.asset().is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    #[test]
    fn test_constructors_pin_one_source() {
        let image = SharePhoto::from_image(bitmap(), true);
        assert_eq!(populated(&image), 1);
        assert_eq!(image.source_kind(), Some(SourceKind::Image));

        let url = SharePhoto::from_image_url("https://example.com/a.jpg", false).unwrap();
        assert_eq!(populated(&url), 1);
        assert_eq!(url.image_url().unwrap().host_str(), Some("example.com"));

        let asset = SharePhoto::from_asset("ph://1234/L0/001", true).unwrap();
        assert_eq!(populated(&asset), 1);
        assert_eq!(asset.asset().unwrap().as_str(), "ph://1234/L0/001");
    }

    #[test]
    fn test_constructor_rejects_bad_input() {
        let err = SharePhoto::from_image_url("::nope::", true).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        let err = SharePhoto::from_asset("", true).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_setting_source_clears_previous() {
        let mut photo = SharePhoto::from_image_url("https://example.com/a.jpg", true).unwrap();
        photo.set_asset(AssetId::new("asset-1").unwrap());

        assert!(photo.image_url().is_none());
        assert!(photo.asset().is_some());
        assert_eq!(populated(&photo), 1);

        photo.set_image(bitmap());
        assert!(photo.asset().is_none());
        assert_eq!(photo.source_kind(), Some(SourceKind::Image));

        let removed = photo.clear_source();
        assert!(matches!(removed, Some(PhotoSource::Image(_))));
        assert_eq!(populated(&photo), 0);
    }

    #[test]
    fn test_blank_caption_is_absent() {
        let mut photo = SharePhoto::from_image(bitmap(), true);
        photo.set_caption("   \n");
        assert_eq!(photo.caption(), None);

        photo.set_caption("Sunset");
        assert_eq!(photo.caption(), Some("Sunset"));

        photo.set_caption("");
        assert_eq!(photo.caption(), None);
    }

    #[test]
    fn test_validate_missing_source() {
        let photo = SharePhoto::default();
        let err = photo.validate(&ValidationOptions::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingSource);
    }

    #[test]
    fn test_validate_plain_image() {
        let photo = SharePhoto::from_image(bitmap(), true);
        assert!(photo.validate(&ValidationOptions::default()).is_ok());
    }

    #[test]
    fn test_validate_caption_policy() {
        let photo = SharePhoto::from_image(bitmap(), false).with_caption("Buy now!");
        let prefilled = ValidationOptions::new().caption_origin(CaptionOrigin::Prefilled);

        let err = photo.validate(&prefilled).unwrap_err();
        assert_eq!(err.code, ErrorCode::CaptionPolicyViolation);

        assert!(photo.is_valid(&prefilled.allow_prefilled_captions(true)));
        assert!(photo.is_valid(&ValidationOptions::default()));

        let uncaptioned = SharePhoto::from_image(bitmap(), false);
        assert!(uncaptioned.is_valid(&prefilled));
    }

    #[test]
    fn test_validate_web_bridge() {
        let options = ValidationOptions::new().bridge(BridgeOptions::new().web_image_url());

        let web = SharePhoto::from_image_url("https://example.com/a.jpg", true).unwrap();
        assert!(web.is_valid(&options));

        let local = SharePhoto::from_image_url("file:///tmp/a.jpg", true).unwrap();
        let err = local.validate(&options).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedSource);

        let image = SharePhoto::from_image(bitmap(), true);
        assert_eq!(
            image.validate(&options).unwrap_err().code,
            ErrorCode::UnsupportedSource
        );
    }

    #[test]
    fn test_validate_local_bridge() {
        let options = ValidationOptions::new().bridge(BridgeOptions::new().local_image_url());

        let local = SharePhoto::from_image_url("file:///tmp/a.jpg", true).unwrap();
        assert!(local.is_valid(&options));

        let web = SharePhoto::from_image_url("https://example.com/a.jpg", true).unwrap();
        assert!(!web.is_valid(&options));

        let asset = SharePhoto::from_asset("asset-1", true).unwrap();
        assert!(asset.is_valid(&options));
    }

    #[test]
    fn test_equality() {
        let a = SharePhoto::from_asset("asset-1", true).unwrap().with_caption("hi");
        let b = SharePhoto::from_asset("asset-1", true).unwrap().with_caption("hi");
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);

        let shouting = b.clone().with_caption("HI");
        assert_ne!(a, shouting);

        let mut not_user = b.clone();
        not_user.set_user_generated(false);
        assert_ne!(a, not_user);

        assert_ne!(Some(&a), None);
    }

    #[test]
    fn test_equality_across_variants() {
        let url = SharePhoto::from_image_url("https://example.com/asset-1", true).unwrap();
        let asset = SharePhoto::from_asset("https://example.com/asset-1", true).unwrap();
        assert_ne!(url, asset);
        assert_ne!(asset, url);
    }

    #[test]
    fn test_equality_is_transitive() {
        let a = SharePhoto::from_image(bitmap(), false).with_caption("x");
        let b = a.clone();
        let c = SharePhoto::from_image(bitmap(), false).with_caption("x");
        assert!(!a.image().unwrap().shares_buffer(c.image().unwrap()));

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_clone_is_independent() {
        let originals = vec![
            SharePhoto::from_image(bitmap(), true),
            SharePhoto::from_image_url("https://example.com/a.jpg", false).unwrap(),
            SharePhoto::from_asset("ph://77", true).unwrap(),
        ];

        for original in originals {
            let original = original.with_caption("first");
            let mut copy = original.clone();
            assert_eq!(copy, original);
            assert_eq!(copy.source_kind(), original.source_kind());

            copy.set_caption("second");
            copy.set_user_generated(!original.is_user_generated());
            assert_eq!(original.caption(), Some("first"));
            assert_ne!(copy, original);
        }
    }

    #[test]
    fn test_clone_shares_image_buffer() {
        let original = SharePhoto::from_image(bitmap(), true);
        let copy = original.clone();
        assert!(copy.image().unwrap().shares_buffer(original.image().unwrap()));
    }
}
