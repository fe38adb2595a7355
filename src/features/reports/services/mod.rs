mod image_normalizer;
mod report_service;
mod report_store;

pub use image_normalizer::ImageNormalizer;
pub use report_service::ReportService;
pub use report_store::{bootstrap, PgReportStore, ReportStore};
