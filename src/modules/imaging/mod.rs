//! Image transcoding for uploaded report photos

mod transcode;

pub use transcode::{transcode, ImageError, TranscodeSettings, ARTIFACT_EXTENSION};
