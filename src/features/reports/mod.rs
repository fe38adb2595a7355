pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{routes, uploads_routes};
pub use services::{bootstrap, ImageNormalizer, PgReportStore, ReportService};
