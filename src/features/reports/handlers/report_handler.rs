use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppQuery, ClientIp};
use crate::features::reports::dtos::{
    ListReportsQuery, ReportPageDto, SubmitReport, SubmitReportForm, SubmitReportResponseDto,
};
use crate::features::reports::services::ReportService;
use crate::modules::storage::LocalPhotoStorage;
use crate::shared::types::ErrorResponse;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub photo_storage: Arc<LocalPhotoStorage>,
}

/// Photo part of a submission
struct PhotoUpload {
    file_name: String,
    data: Vec<u8>,
}

/// Fields read from the submission form
#[derive(Default)]
struct SubmissionForm {
    restroom_id: String,
    category: String,
    comment: Option<String>,
    photo: Option<PhotoUpload>,
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" | "foto" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if !file_name.is_empty() && !data.is_empty() {
                    form.photo = Some(PhotoUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            "restroomId" | "id_bano" => {
                form.restroom_id = field.text().await.map_err(multipart_error)?;
            }
            "category" | "categoria" => {
                form.category = field.text().await.map_err(multipart_error)?;
            }
            "comment" | "comentario" => {
                form.comment = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

/// Submit a maintenance report
///
/// Accepts multipart/form-data. The restroom must exist and be active.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Report form with optional photo"
    ),
    responses(
        (status = 200, description = "Report stored", body = SubmitReportResponseDto),
        (status = 400, description = "Missing fields or invalid restroom", body = ErrorResponse),
        (status = 413, description = "Photo or body too large", body = ErrorResponse),
        (status = 415, description = "Photo extension not allowed", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    ClientIp(client_ip): ClientIp,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitReportResponseDto>> {
    let multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("Expected multipart/form-data: {}", e.body_text()))
    })?;
    let form = read_form(multipart).await?;

    let submit = SubmitReport::new(&form.restroom_id, &form.category, form.comment.as_deref());
    state.report_service.check_submission(&submit).await?;

    let photo_url = match &form.photo {
        Some(photo) => Some(
            state
                .photo_storage
                .store(&photo.file_name, &photo.data)
                .await?,
        ),
        None => None,
    };

    match state
        .report_service
        .submit(submit, photo_url.clone(), client_ip)
        .await
    {
        Ok(report_id) => Ok(Json(SubmitReportResponseDto {
            ok: true,
            report_id,
        })),
        Err(e) => {
            if let Some(url) = photo_url {
                state.photo_storage.remove(&url).await;
            }
            Err(e)
        }
    }
}

/// List reports
///
/// Filtered by local calendar days in the requested zone, newest first.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Page of reports", body = ReportPageDto),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<ReportPageDto>> {
    let page = state.report_service.list(query).await?;
    Ok(Json(page))
}
