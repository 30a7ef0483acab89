//! # Share Contracts v0.1.0
//!
//! Media contracts for composing share payloads sent to a host platform.
//!
//! This crate defines the value types and capabilities a sharing pipeline
//! depends on:
//!
//! - **SharePhoto**: one photo, backed by exactly one source: an in-memory
//!   bitmap, an image URL, or a media library asset
//! - **SharePhotoContent**: the container that owns the photos of one share
//! - **SharingValidation**: platform policy checks run before submission
//! - **ShareCodec**: versioned, fail-closed serialization for handoff
//! - **EventLogging**: the narrow logging capability share components use,
//!   implemented by the in-process **AppEvents** facility
//! - **ValidationGate**: validates content and reports each decision
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! share-contracts = "0.1"
//! ```
//!
//! ```rust,ignore
//! use share_contracts::prelude::*;
//!
//! let photo = SharePhoto::from_image_url("https://example.com/cat.jpg", true)?
//!     .with_caption("My cat");
//!
//! let events = AppEvents::default();
//! ValidationGate::default().with_logger(&events).admit(&photo)?;
//!
//! let codec = ShareCodec::default();
//! let bytes = codec.encode(&photo)?;
//! assert_eq!(codec.decode::<SharePhoto>(&bytes)?, photo);
//! ```
//!
//! ## Platform policy
//!
//! Captions must be written by the user (Platform Policy 2.3). The crate
//! cannot verify authorship; callers state it through
//! [`ValidationOptions::caption_origin`](validation::ValidationOptions).

pub mod codec;
pub mod config;
pub mod content;
pub mod errors;
pub mod events;
pub mod gate;
pub mod photo;
pub mod types;
pub mod validation;

// Re-export everything in prelude for convenience
pub mod prelude {
    pub use crate::codec::*;
    pub use crate::config::*;
    pub use crate::content::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::gate::*;
    pub use crate::photo::*;
    pub use crate::types::*;
    pub use crate::validation::*;
}

// Also re-export at crate root
pub use prelude::*;
