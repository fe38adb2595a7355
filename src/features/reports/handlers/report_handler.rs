use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{multipart_error, multipart_rejection, AppJson};
use crate::features::reports::dtos::{
    CreateReportDto, CreateReportResponseDto, IncidentImageUpload, UploadReportDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::constants::{INCIDENT_IMAGE_FIELD, REPORT_SAVED_MESSAGE};
use crate::shared::types::ErrorResponse;

/// Report fields plus the optional photo, read from either a multipart form
/// or a JSON body
#[derive(Debug)]
pub struct ReportSubmission {
    pub fields: CreateReportDto,
    pub image: Option<IncidentImageUpload>,
}

impl<S> FromRequest<S> for ReportSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(multipart_rejection)?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let AppJson(fields) = AppJson::<CreateReportDto>::from_request(req, state).await?;
            Ok(Self {
                fields,
                image: None,
            })
        } else {
            Err(AppError::UnsupportedMediaType(format!(
                "Expected multipart/form-data or application/json, got '{}'",
                content_type
            )))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ReportSubmission> {
    let mut fields = CreateReportDto::default();
    let mut image: Option<IncidentImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == INCIDENT_IMAGE_FIELD {
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers send an empty part when no file was picked
            if bytes.is_empty() {
                debug!("Empty {} part, treating as no image", INCIDENT_IMAGE_FIELD);
                continue;
            }

            image = Some(IncidentImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "description" => &mut fields.description,
            "incidentType" => &mut fields.incident_type,
            "address" => &mut fields.address,
            "latitude" => &mut fields.latitude,
            "longitude" => &mut fields.longitude,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
                continue;
            }
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok(ReportSubmission { fields, image })
}

/// Submit an incident report
///
/// Accepts multipart/form-data with an optional `incidentImage` photo, or a
/// JSON body with the same text fields. The photo is resized and re-encoded
/// before the row is written; a photo that cannot be processed is dropped
/// and the report is still stored.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    request_body(
        content(
            (UploadReportDto = "multipart/form-data"),
            (CreateReportDto = "application/json")
        ),
        description = "Incident report with optional photo",
    ),
    responses(
        (status = 201, description = "Report stored", body = CreateReportResponseDto),
        (status = 400, description = "Invalid report fields or malformed body", body = ErrorResponse),
        (status = 413, description = "Body exceeds the configured limit", body = ErrorResponse),
        (status = 415, description = "Unsupported content type", body = ErrorResponse),
        (status = 500, description = "Report could not be saved", body = ErrorResponse)
    )
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    submission: ReportSubmission,
) -> Result<(StatusCode, Json<CreateReportResponseDto>)> {
    info!(
        "Report received: type={:?}, image={}",
        submission.fields.incident_type,
        submission.image.is_some()
    );

    let report = submission.fields.into_new_report()?;
    let receipt = service.submit(report, submission.image).await?;
    debug!(
        "Report {:?} stored with image {:?}",
        receipt.report_id, receipt.image_url
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponseDto {
            message: REPORT_SAVED_MESSAGE.to_string(),
            report_id: receipt.report_id,
        }),
    ))
}
