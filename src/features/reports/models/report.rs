use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: i32,
    pub description: String,
    pub incident_type: String,
    pub address: Option<String>,
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// Storage path of the normalized artifact
    pub image_url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Validated data for creating a new report
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub description: String,
    pub incident_type: String,
    pub address: Option<String>,
    pub latitude: Decimal,
    pub longitude: Decimal,
}
