use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::dtos::IncidentImageUpload;
use crate::features::reports::models::NewReport;
use crate::features::reports::services::image_normalizer::{
    ImageNormalizer, NormalizeOutcome, StoredArtifact,
};
use crate::features::reports::services::report_store::ReportStore;

/// What the caller gets back for a stored report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReceipt {
    pub report_id: Option<i32>,
    pub image_url: Option<String>,
}

/// Report intake pipeline: optional image stage, then a single insert
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    normalizer: Option<Arc<ImageNormalizer>>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, normalizer: Option<Arc<ImageNormalizer>>) -> Self {
        Self { store, normalizer }
    }

    pub fn accepts_images(&self) -> bool {
        self.normalizer.is_some()
    }

    /// Store a validated report, attaching the normalized image when one was
    /// uploaded and could be processed.
    ///
    /// If the insert fails after an artifact was written, the artifact is
    /// deleted before the error is returned.
    pub async fn submit(
        &self,
        report: NewReport,
        image: Option<IncidentImageUpload>,
    ) -> Result<ReportReceipt> {
        let artifact = self.process_image(image).await;
        let image_url = artifact.as_ref().map(|a| a.reference.clone());

        tracing::debug!(
            "Inserting report: type={}, lat={}, lon={}, address={:?}, image={:?}",
            report.incident_type,
            report.latitude,
            report.longitude,
            report.address,
            image_url
        );

        let report_id = match self.store.insert(&report, image_url.as_deref()).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(artifact) = &artifact {
                    self.discard_orphan(artifact).await;
                }
                return Err(e);
            }
        };

        match report_id {
            Some(id) => tracing::info!("Report saved with id {}", id),
            None => tracing::warn!("Report saved, but the database returned no id"),
        }

        Ok(ReportReceipt {
            report_id,
            image_url,
        })
    }

    async fn process_image(&self, image: Option<IncidentImageUpload>) -> Option<StoredArtifact> {
        let image = image?;

        let Some(normalizer) = &self.normalizer else {
            tracing::info!(
                "Image uploads are disabled; ignoring attachment {:?}",
                image.file_name
            );
            return None;
        };

        tracing::debug!(
            "Processing image {:?} ({:?}, {} bytes)",
            image.file_name,
            image.content_type,
            image.bytes.len()
        );

        match normalizer.normalize(image.bytes).await {
            NormalizeOutcome::Artifact(artifact) => Some(artifact),
            NormalizeOutcome::Skipped(reason) => {
                tracing::warn!(
                    "Image {:?} skipped, continuing without image: {}",
                    image.file_name,
                    reason
                );
                None
            }
        }
    }

    async fn discard_orphan(&self, artifact: &StoredArtifact) {
        let Some(normalizer) = &self.normalizer else {
            return;
        };

        match normalizer.discard(artifact).await {
            Ok(()) => tracing::info!("Removed image {} after failed insert", artifact.reference),
            Err(e) => tracing::warn!(
                "Could not remove image {} after failed insert, leaving orphan: {}",
                artifact.reference,
                e
            ),
        }
    }
}
