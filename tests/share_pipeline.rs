//! End-to-end share pipeline using the public prelude.
//!
//! A mock host stands in for the platform side of an inter-app handoff:
//! it gates content, encodes it, "transmits" the bytes, and decodes on the
//! receiving end. A mock analytics sink implements `EventLogging` directly
//! to prove the capability does not depend on `AppEvents`.
//!
//! Pattern coverage:
//! - MockAnalytics: EventLogging implemented by a host type
//! - MockHost:      ValidationGate + ShareCodec composed over &dyn EventLogging

use share_contracts::prelude::*;
use std::sync::Mutex;

// ═══════════════════════════════════════════════════════════════════
// MOCK ANALYTICS: host-side logger
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct MockAnalytics {
    logged: Mutex<Vec<(String, Metadata, Option<f64>, Option<String>)>>,
    flushes: Mutex<usize>,
}

impl EventLogging for MockAnalytics {
    fn log_event(
        &self,
        name: &str,
        parameters: Option<&Metadata>,
        value_to_sum: Option<f64>,
        app_id: Option<&str>,
    ) {
        self.logged.lock().unwrap().push((
            name.to_string(),
            parameters.cloned().unwrap_or_default(),
            value_to_sum,
            app_id.map(str::to_string),
        ));
    }

    fn flush(&self) {
        *self.flushes.lock().unwrap() += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════
// MOCK HOST: gate, encode, hand off
// ═══════════════════════════════════════════════════════════════════

struct MockHost<'a> {
    gate: ValidationGate<'a>,
    codec: ShareCodec,
    outbox: Vec<Vec<u8>>,
}

impl<'a> MockHost<'a> {
    fn new(config: &ShareConfig, logger: &'a dyn EventLogging) -> Self {
        Self {
            gate: ValidationGate::from_config(config).with_logger(logger),
            codec: ShareCodec::new(config),
            outbox: vec![],
        }
    }

    fn submit<T>(&mut self, content: &T) -> ShareResult<()>
    where
        T: SharingValidation + PayloadFormat,
    {
        self.gate.admit(content)?;
        let bytes = self.codec.encode(content)?;
        self.outbox.push(bytes);
        Ok(())
    }

    fn receive<T: PayloadFormat>(&mut self) -> Option<ShareResult<T>> {
        self.outbox.pop().map(|bytes| self.codec.decode(&bytes))
    }
}

fn png() -> Bitmap {
    Bitmap::new(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13]).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_photo_handoff() {
    let analytics = MockAnalytics::default();
    let config = ShareConfig::new("app-1");
    let mut host = MockHost::new(&config, &analytics);

    let photo = SharePhoto::from_image(png(), true).with_caption("Our trip");
    host.submit(&photo).unwrap();

    let received: SharePhoto = host.receive().unwrap().unwrap();
    assert_eq!(received, photo);
    assert_eq!(received.image().unwrap().as_bytes(), photo.image().unwrap().as_bytes());

    let logged = analytics.logged.lock().unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].0, SHARE_VALIDATION_EVENT);
    assert_eq!(logged[0].1["outcome"], "approved");
}

#[test]
fn test_invalid_photo_never_leaves() {
    let analytics = MockAnalytics::default();
    let mut host = MockHost::new(&ShareConfig::default(), &analytics);

    let err = host.submit(&SharePhoto::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingSource);
    assert_eq!(err.phase(), ErrorPhase::Validation);
    assert!(host.receive::<SharePhoto>().is_none());

    let logged = analytics.logged.lock().unwrap();
    assert_eq!(logged[0].1["error_code"], "MISSING_SOURCE");
}

#[test]
fn test_album_handoff() {
    let events = AppEvents::from_config(&ShareConfig::new("app-2"));
    let mut host = MockHost::new(&ShareConfig::default(), &events);

    let album = SharePhotoContent::new(vec![
        SharePhoto::from_image(png(), true),
        SharePhoto::from_image_url("https://example.com/2.jpg", false).unwrap(),
        SharePhoto::from_asset("ph://3", true)
            .unwrap()
            .with_caption("third"),
    ])
    .hashtag(Hashtag::new("#album").unwrap());

    host.submit(&album).unwrap();
    let received: SharePhotoContent = host.receive().unwrap().unwrap();
    assert_eq!(received, album);

    let recent = events.recent(1);
    assert_eq!(recent[0].app_id.as_deref(), Some("app-2"));
    assert_eq!(recent[0].parameters["content_type"], "share_photo_content");
}

#[test]
fn test_prefilled_caption_blocked_unless_configured() {
    let analytics = MockAnalytics::default();
    let photo = SharePhoto::from_asset("ph://1", false)
        .unwrap()
        .with_caption("Download our app!");
    let prefilled = ValidationOptions::new().caption_origin(CaptionOrigin::Prefilled);

    let strict = ValidationGate::new(prefilled).with_logger(&analytics);
    let err = strict.admit(&photo).unwrap_err();
    assert_eq!(err.code, ErrorCode::CaptionPolicyViolation);

    let relaxed = ValidationGate::new(prefilled.allow_prefilled_captions(true));
    assert!(relaxed.admit(&photo).is_ok());
}

#[test]
fn test_source_reassignment_round_trip() {
    let codec = ShareCodec::default();
    let mut photo = SharePhoto::from_image_url("https://example.com/a.png", true).unwrap();
    photo.set_asset(AssetId::new("ph://reassigned").unwrap());
    assert!(photo.image_url().is_none());

    let decoded: SharePhoto = codec.decode(&codec.encode(&photo).unwrap()).unwrap();
    assert_eq!(decoded.source_kind(), Some(SourceKind::Asset));
    assert!(decoded.image_url().is_none());
    assert!(decoded.image().is_none());
}

#[test]
fn test_unknown_variant_from_peer() {
    let codec = ShareCodec::default();
    let payload = serde_json::json!({
        "format": "share_photo",
        "version": "1.0.0",
        "body": {
            "source": { "type": "video", "value": "ph://clip" },
            "user_generated": true
        }
    });
    let err = codec
        .decode::<SharePhoto>(&serde_json::to_vec(&payload).unwrap())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DecodeError);
    assert_eq!(err.phase(), ErrorPhase::Codec);
}

#[test]
fn test_capability_flush() {
    let analytics = MockAnalytics::default();
    let logger: &dyn EventLogging = &analytics;
    logger.log_event("share_open", None, Some(1.0), Some("app-3"));
    logger.flush();

    assert_eq!(*analytics.flushes.lock().unwrap(), 1);
    let logged = analytics.logged.lock().unwrap();
    assert_eq!(logged[0].2, Some(1.0));
    assert_eq!(logged[0].3.as_deref(), Some("app-3"));
}

#[test]
fn test_error_serialization_for_host() {
    let err = SharePhoto::from_asset("", true).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert_eq!(json["context"]["argument"], "photoAsset");
}
