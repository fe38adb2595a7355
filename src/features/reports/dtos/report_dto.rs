use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::NewReport;
use crate::shared::constants::INVALID_REPORT_MESSAGE;
use crate::shared::validation::{
    describe_errors, not_blank, parse_decimal, validate_latitude, validate_longitude,
};

/// Report fields as submitted, before validation.
///
/// Every field is optional here so a missing value becomes a validation
/// error instead of a body parsing failure. Multipart and JSON submissions
/// both end up in this shape.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    /// What happened
    #[validate(
        required(message = "is required"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Pothole on 5th")]
    pub description: Option<String>,

    /// Free-form category
    #[validate(
        required(message = "is required"),
        custom(function = "not_blank"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    #[schema(example = "road_damage")]
    pub incident_type: Option<String>,

    /// Optional street address
    #[serde(default)]
    #[schema(example = "5th Avenue & 23rd St")]
    pub address: Option<String>,

    /// Decimal degrees, JSON number or numeric string
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    #[validate(
        required(message = "is required"),
        custom(function = "validate_latitude")
    )]
    #[schema(value_type = Option<String>, example = "40.7128")]
    pub latitude: Option<String>,

    /// Decimal degrees, JSON number or numeric string
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    #[validate(
        required(message = "is required"),
        custom(function = "validate_longitude")
    )]
    #[schema(value_type = Option<String>, example = "-74.0060")]
    pub longitude: Option<String>,
}

impl CreateReportDto {
    /// Validate and convert into the store's input
    pub fn into_new_report(self) -> Result<NewReport, AppError> {
        self.validate().map_err(|e| {
            AppError::Validation(INVALID_REPORT_MESSAGE.to_string(), describe_errors(&e))
        })?;

        let latitude = self.latitude.as_deref().and_then(parse_decimal);
        let longitude = self.longitude.as_deref().and_then(parse_decimal);

        match (self.description, self.incident_type, latitude, longitude) {
            (Some(description), Some(incident_type), Some(latitude), Some(longitude)) => {
                Ok(NewReport {
                    description: description.trim().to_string(),
                    incident_type: incident_type.trim().to_string(),
                    address: self
                        .address
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty()),
                    latitude,
                    longitude,
                })
            }
            _ => Err(AppError::Validation(
                INVALID_REPORT_MESSAGE.to_string(),
                vec!["report: required fields are missing".to_string()],
            )),
        }
    }
}

/// Keeps the literal digits of a JSON number (serde_json `arbitrary_precision`)
/// so nothing is rounded through `f64` before reaching `NUMERIC`.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"a number or a numeric string",
        )),
    }
}

/// Multipart form accepted by `POST /api/reports`
///
/// Note: This struct is for Swagger UI documentation only.
/// The handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadReportDto {
    #[schema(example = "Pothole on 5th")]
    pub description: String,
    #[schema(example = "road_damage")]
    pub incident_type: String,
    pub address: Option<String>,
    #[schema(example = "40.7128")]
    pub latitude: String,
    #[schema(example = "-74.0060")]
    pub longitude: String,
    /// Photo of the incident, any common image format
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub incident_image: Option<String>,
}

/// Body returned when a report is stored
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponseDto {
    pub message: String,
    /// Identifier of the new row. Null when the database returned no id.
    pub report_id: Option<i32>,
}

/// Raw photo taken from the multipart body
#[derive(Debug, Clone)]
pub struct IncidentImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::address::en::StreetName;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn pothole() -> CreateReportDto {
        CreateReportDto {
            description: Some("Pothole on 5th".to_string()),
            incident_type: Some("road_damage".to_string()),
            address: None,
            latitude: Some("40.7128".to_string()),
            longitude: Some("-74.0060".to_string()),
        }
    }

    fn validation_errors(dto: CreateReportDto) -> Vec<String> {
        match dto.into_new_report() {
            Err(AppError::Validation(_, errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_report_converts() {
        let report = pothole().into_new_report().unwrap();
        assert_eq!(report.description, "Pothole on 5th");
        assert_eq!(report.incident_type, "road_damage");
        assert_eq!(report.address, None);
        assert_eq!(report.latitude, Decimal::from_str("40.7128").unwrap());
        assert_eq!(report.longitude, Decimal::from_str("-74.0060").unwrap());
    }

    #[test]
    fn test_generated_reports_convert() {
        for _ in 0..50 {
            let latitude: f64 = (-90.0..90.0).fake();
            let longitude: f64 = (-180.0..180.0).fake();
            let dto = CreateReportDto {
                description: Some(Sentence(3..12).fake()),
                incident_type: Some(Sentence(1..3).fake()),
                address: Some(StreetName().fake()),
                latitude: Some(format!("{:.6}", latitude)),
                longitude: Some(format!("{:.6}", longitude)),
            };

            let report = dto.clone().into_new_report().unwrap();
            assert_eq!(Some(report.description), dto.description.map(|d| d.trim().to_string()));
            assert!(report.address.is_some());
            assert!(report.latitude.abs() <= Decimal::from(90));
            assert!(report.longitude.abs() <= Decimal::from(180));
        }
    }

    #[test]
    fn test_missing_latitude_is_rejected() {
        let errors = validation_errors(CreateReportDto {
            latitude: None,
            ..pothole()
        });
        assert_eq!(errors, vec!["latitude: is required".to_string()]);
    }

    #[test]
    fn test_every_problem_is_reported() {
        let errors = validation_errors(CreateReportDto {
            description: Some("   ".to_string()),
            incident_type: None,
            address: None,
            latitude: Some("91".to_string()),
            longitude: Some("east".to_string()),
        });

        assert_eq!(
            errors,
            vec![
                "description: must not be blank".to_string(),
                "incidentType: is required".to_string(),
                "latitude: must be between -90 and 90".to_string(),
                "longitude: must be a decimal number".to_string(),
            ]
        );
    }

    #[test]
    fn test_incident_type_column_width() {
        let errors = validation_errors(CreateReportDto {
            incident_type: Some("x".repeat(256)),
            ..pothole()
        });
        assert_eq!(
            errors,
            vec!["incidentType: must be at most 255 characters".to_string()]
        );
    }

    #[test]
    fn test_blank_address_is_absent() {
        let report = CreateReportDto {
            address: Some("  ".to_string()),
            ..pothole()
        }
        .into_new_report()
        .unwrap();
        assert_eq!(report.address, None);
    }

    #[test]
    fn test_json_accepts_numbers_and_strings() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"description":"Broken light","incidentType":"lighting","latitude":40.7128,"longitude":"-74.0060"}"#,
        )
        .unwrap();
        assert_eq!(dto.latitude.as_deref(), Some("40.7128"));
        assert_eq!(dto.longitude.as_deref(), Some("-74.0060"));
        assert_eq!(dto.address, None);
    }

    #[test]
    fn test_json_number_keeps_every_digit() {
        let dto: CreateReportDto = serde_json::from_str(
            r#"{"description":"x","incidentType":"y","latitude":40.712812345678901234567,"longitude":-74.006000000000000000001}"#,
        )
        .unwrap();
        assert_eq!(dto.latitude.as_deref(), Some("40.712812345678901234567"));
        assert_eq!(dto.longitude.as_deref(), Some("-74.006000000000000000001"));

        let report = dto.into_new_report().unwrap();
        assert_eq!(
            report.latitude,
            Decimal::from_str("40.712812345678901234567").unwrap()
        );
    }

    #[test]
    fn test_json_coordinate_rejects_other_types() {
        let result: Result<CreateReportDto, _> = serde_json::from_str(
            r#"{"description":"x","incidentType":"y","latitude":true,"longitude":"1"}"#,
        );
        assert!(result.is_err());

        let dto: CreateReportDto = serde_json::from_str(
            r#"{"description":"x","incidentType":"y","latitude":null,"longitude":"1"}"#,
        )
        .unwrap();
        assert!(dto.latitude.is_none());
    }

    #[test]
    fn test_json_missing_coordinates_deserialize_as_none() {
        let dto: CreateReportDto =
            serde_json::from_str(r#"{"description":"x","incidentType":"y"}"#).unwrap();
        assert!(dto.latitude.is_none());
        assert!(dto.longitude.is_none());
    }

    #[test]
    fn test_response_serializes_null_report_id() {
        let body = serde_json::to_value(CreateReportResponseDto {
            message: "ok".to_string(),
            report_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "message": "ok", "reportId": null }));
    }
}
