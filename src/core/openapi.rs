use utoipa::{Modify, OpenApi};

use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::create_report,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Reports
            reports_dtos::CreateReportDto,
            reports_dtos::UploadReportDto,
            reports_dtos::CreateReportResponseDto,
        )
    ),
    tags(
        (name = "reports", description = "Incident report intake"),
    ),
    info(
        title = "Moodular API",
        version = "0.1.0",
        description = "Incident report ingestion",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_report_endpoint() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Reports".to_string(),
            version: "9.9.9".to_string(),
            description: "Test build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Reports");
        assert_eq!(doc.info.version, "9.9.9");
        assert!(doc.paths.paths.contains_key("/api/reports"));

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("CreateReportResponseDto"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
