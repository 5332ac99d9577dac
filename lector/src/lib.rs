//! Lector, a self-hostable OCR scan service.
//!
//! Lector ingests scanned images, sends them to an external recognition
//! engine, reconstructs natural reading order from the unordered spatial
//! detections, and serves the result. Results are cached by a content
//! fingerprint of the image bytes so identical uploads are never
//! re-recognized, every processing event is recorded in a history log, and
//! a background sweeper reclaims aged artifact files.

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod reconstruct;
pub mod services;
pub mod storage;
