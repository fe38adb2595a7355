mod report_dto;

pub use report_dto::{
    CreateReportDto, CreateReportResponseDto, IncidentImageUpload, UploadReportDto,
};
