//! facekit — safe binding for the gawrs_face native engine.
//!
//! The engine (SCRFD detection, MobileFaceNet embeddings) lives in an
//! opaque shared library; this crate loads it at runtime, marshals image
//! buffers and face structs across the C boundary, and owns every
//! engine-side allocation so callers only ever see owned Rust values.

pub mod config;
pub mod engine;
pub mod error;
pub mod feature;
pub mod image_frame;
pub mod types;
pub mod version;

pub use config::{EngineConfig, Rotation};
pub use engine::Engine;
pub use error::Error;
pub use feature::{FaceFeature, FeatureVersion};
pub use image_frame::{ImageFormat, ImageFrame};
pub use types::{Face, FaceRect, Point};
pub use version::VersionInfo;
