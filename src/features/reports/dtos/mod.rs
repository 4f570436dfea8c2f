mod report_dto;

pub use report_dto::{
    ListReportsQuery, ReportFilterParams, ReportItemDto, ReportPageDto, SubmitReport,
    SubmitReportForm, SubmitReportResponseDto,
};
