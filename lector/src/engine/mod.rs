//! Recognition Engine Adapter
//!
//! The recognition engine itself is an external collaborator reached over
//! HTTP: given image bytes and a tuning profile it returns an
//! arbitrarily-ordered list of detections (4-point polygon, text,
//! confidence in [0, 1]). This module owns the adapter only:
//!
//! - `EngineProvider` wraps the remote client with availability tracking
//!   and a caller-supplied timeout
//! - `EngineProfile` selects the speed/accuracy trade-off ("quick" vs
//!   "accurate")
//! - `preprocess` applies the optional enhancement pass (downscale,
//!   contrast, sharpen, denoise) before recognition
//! - `annotate` draws detection polygons back onto the recognized buffer
//!
//! Engine failure or an undecodable image is a typed error, never a
//! partial result.

mod annotate;
mod api;
mod preprocess;
mod profile;
mod provider;

pub use annotate::draw_detection_boxes;
pub use preprocess::enhance_image;
pub use profile::{EngineProfile, EngineProfileKind};
pub use provider::EngineProvider;
