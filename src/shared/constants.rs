/// Success message returned with a newly created report
pub const REPORT_SAVED_MESSAGE: &str = "Report saved successfully.";

/// Top-level message for a submission that fails validation
pub const INVALID_REPORT_MESSAGE: &str = "The report is missing required fields or has invalid values.";

/// Multipart field carrying the incident photo
pub const INCIDENT_IMAGE_FIELD: &str = "incidentImage";
