//! Modules layer - Infrastructure components
//!
//! Contains the filesystem store and the image transcoder used by features.

pub mod imaging;
pub mod storage;
