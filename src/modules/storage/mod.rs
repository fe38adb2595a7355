//! Storage module for file management
//!
//! Provides the local filesystem store that normalized report images are
//! written to and served from.

mod local_storage;

pub use local_storage::LocalStorage;
