use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::core::config::ImageConfig;
use crate::modules::imaging::{transcode, ImageError, TranscodeSettings, ARTIFACT_EXTENSION};
use crate::modules::storage::LocalStorage;

/// Produces the file name for the next artifact
pub type NameGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// A normalized image written to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    /// Value persisted in `reports.image_url`: `<public route>/<file name>`,
    /// e.g. `uploads/incident-1700000000000-123456789.jpg`
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

/// Result of running the image stage
#[derive(Debug)]
pub enum NormalizeOutcome {
    Artifact(StoredArtifact),
    /// Nothing was written; the report proceeds without an image
    Skipped(ImageError),
}

#[cfg(test)]
impl NormalizeOutcome {
    pub fn into_artifact(self) -> Option<StoredArtifact> {
        match self {
            NormalizeOutcome::Artifact(artifact) => Some(artifact),
            NormalizeOutcome::Skipped(_) => None,
        }
    }
}

/// Resizes uploaded photos and stores them as JPEG artifacts
pub struct ImageNormalizer {
    storage: Arc<LocalStorage>,
    settings: TranscodeSettings,
    /// Route prefix without surrounding slashes
    public_prefix: String,
    next_name: NameGenerator,
}

impl ImageNormalizer {
    /// `public_route` is the URL prefix the storage root is served under
    pub fn new(storage: Arc<LocalStorage>, settings: TranscodeSettings, public_route: &str) -> Self {
        Self {
            storage,
            settings,
            public_prefix: public_route.trim_matches('/').to_string(),
            next_name: Arc::new(generate_artifact_name),
        }
    }

    pub fn from_config(storage: Arc<LocalStorage>, config: &ImageConfig) -> Self {
        Self::new(
            storage,
            TranscodeSettings {
                max_dimension: config.max_dimension,
                jpeg_quality: config.jpeg_quality,
            },
            &config.public_route,
        )
    }

    /// Replace the artifact naming scheme
    pub fn with_name_generator(mut self, next_name: NameGenerator) -> Self {
        self.next_name = next_name;
        self
    }

    /// Transcode and store `bytes`. Never fails: any error becomes `Skipped`.
    pub async fn normalize(&self, bytes: Vec<u8>) -> NormalizeOutcome {
        match self.try_normalize(bytes).await {
            Ok(artifact) => {
                info!(
                    "Image processed and saved to {} ({}x{})",
                    artifact.path.display(),
                    artifact.width,
                    artifact.height
                );
                NormalizeOutcome::Artifact(artifact)
            }
            Err(e) => NormalizeOutcome::Skipped(e),
        }
    }

    async fn try_normalize(&self, bytes: Vec<u8>) -> Result<StoredArtifact, ImageError> {
        let settings = self.settings;
        let transcoded = tokio::task::spawn_blocking(move || transcode(&bytes, settings))
            .await
            .map_err(|e| ImageError::Worker(e.to_string()))??;

        debug!(
            "Transcoded {}x{} -> {}x{} ({} bytes)",
            transcoded.source_width,
            transcoded.source_height,
            transcoded.width,
            transcoded.height,
            transcoded.bytes.len()
        );

        let name = (self.next_name)();
        let path = self.storage.write_new(&name, &transcoded.bytes).await?;

        Ok(StoredArtifact {
            reference: self.reference_for(&name),
            path,
            width: transcoded.width,
            height: transcoded.height,
        })
    }

    fn reference_for(&self, name: &str) -> String {
        if self.public_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.public_prefix, name)
        }
    }

    /// Remove an artifact whose report was never stored
    pub async fn discard(&self, artifact: &StoredArtifact) -> std::io::Result<()> {
        self.storage.delete(&artifact.path).await
    }
}

/// `incident-<unix millis>-<suffix>.jpg`
pub fn artifact_file_name(unix_millis: i64, suffix: u32) -> String {
    format!("incident-{}-{}.{}", unix_millis, suffix, ARTIFACT_EXTENSION)
}

fn generate_artifact_name() -> String {
    let suffix = rand::rng().random_range(0..=1_000_000_000u32);
    artifact_file_name(Utc::now().timestamp_millis(), suffix)
}
