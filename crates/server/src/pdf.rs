//! PDF report endpoints: upload, listing, download and deletion.

use api_types::{
    Deleted,
    pdf::{FinancialData, PdfRecordView, UploadResponse, UploadedFile},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State, multipart::Field},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use engine::{EngineError, Money, PDF_MIMETYPE, PdfRecordNew};

use crate::{
    Event, MAX_REPORT_SIZE, ServerError, parse_id,
    server::ServerState,
    storage::{self, is_pdf, is_safe_filename},
};

/// The file part of an upload, validated but not yet stored.
struct UploadedPart {
    original_name: String,
    bytes: Bytes,
}

/// Text fields sent along with the file.
#[derive(Default)]
struct UploadForm {
    user_id: Option<String>,
    report_period: Option<String>,
    financial_data: FinancialData,
}

fn pdf_view(state: &ServerState, record: engine::PdfRecord) -> PdfRecordView {
    PdfRecordView {
        id: record.id,
        user_id: record.user_id,
        download_url: state.download_url(&record.filename),
        filename: record.filename,
        original_name: record.original_name,
        file_size: record.file_size,
        mimetype: record.mimetype,
        uploaded_at: record.uploaded_at,
        report_type: record.report_type,
        report_period: record.report_period,
        financial_data: FinancialData {
            total_income_minor: record.total_income_minor,
            total_expenses_minor: record.total_expenses_minor,
            net_amount_minor: record.net_amount_minor,
        },
    }
}

async fn text_field(field: Field<'_>) -> Result<Option<String>, ServerError> {
    let text = field
        .text()
        .await
        .map_err(|err| ServerError::Upload(err.to_string()))?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Parse a decimal amount such as `1234.50` into cents.
async fn money_field(field: Field<'_>) -> Result<Option<i64>, ServerError> {
    match text_field(field).await? {
        Some(text) => Ok(Some(text.parse::<Money>()?.cents())),
        None => Ok(None),
    }
}

async fn file_field(field: Field<'_>) -> Result<UploadedPart, ServerError> {
    let original_name = field.file_name().unwrap_or("report.pdf").to_string();
    if !is_pdf(field.content_type(), &original_name) {
        return Err(ServerError::Upload(
            "only PDF files are allowed".to_string(),
        ));
    }
    let bytes = field
        .bytes()
        .await
        .map_err(|err| ServerError::Upload(err.to_string()))?;
    if bytes.is_empty() {
        return Err(ServerError::Upload("uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_REPORT_SIZE {
        return Err(ServerError::Upload(format!(
            "file exceeds {} bytes",
            MAX_REPORT_SIZE
        )));
    }
    Ok(UploadedPart {
        original_name,
        bytes,
    })
}

/// Store an uploaded report and, when a user id is given, record it.
///
/// The file is removed again if the record can't be created.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut part = None;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Upload(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => part = Some(file_field(field).await?),
            "userId" | "user_id" => form.user_id = text_field(field).await?,
            "reportPeriod" | "report_period" => form.report_period = text_field(field).await?,
            "totalIncome" | "total_income" => {
                form.financial_data.total_income_minor = money_field(field).await?;
            }
            "totalExpenses" | "total_expenses" => {
                form.financial_data.total_expenses_minor = money_field(field).await?;
            }
            "netAmount" | "net_amount" => {
                form.financial_data.net_amount_minor = money_field(field).await?;
            }
            other => tracing::debug!("ignoring multipart field {other}"),
        }
    }

    let part = part.ok_or_else(|| {
        ServerError::Upload("no file uploaded, send a PDF in the `file` field".to_string())
    })?;
    let size = part.bytes.len();
    let uploaded_at = Utc::now();
    let filename = storage::report_filename(uploaded_at);
    let path = state.reports.save(&filename, &part.bytes).await?;
    let path_str = path.to_string_lossy().to_string();
    tracing::info!("stored report {filename} ({size} bytes)");

    let record = match &form.user_id {
        Some(user_id) => {
            let file_size = i64::try_from(size)
                .map_err(|_| ServerError::Upload("file too large".to_string()))?;
            let cmd = PdfRecordNew::new(
                user_id,
                &filename,
                &part.original_name,
                &path_str,
                file_size,
            )
            .mimetype(PDF_MIMETYPE)
            .totals(
                form.financial_data.total_income_minor,
                form.financial_data.total_expenses_minor,
                form.financial_data.net_amount_minor,
            );
            let cmd = match form.report_period.clone() {
                Some(period) => cmd.report_period(period),
                None => cmd,
            };
            match state.engine.new_pdf_record(cmd).await {
                Ok(record) => Some(record),
                Err(err) => {
                    storage::remove_best_effort(&path_str).await;
                    return Err(err.into());
                }
            }
        }
        None => None,
    };

    if let Some(record) = &record {
        let email = state
            .engine
            .user(&record.user_id.to_string())
            .await
            .ok()
            .map(|user| user.email);
        state.notifier.notify(Event::ReportUploaded {
            email,
            filename: filename.clone(),
            file_path: path.clone(),
            file_size: size as u64,
            upload_time: uploaded_at,
            financial_data: form.financial_data.clone(),
        });
    }

    Ok(Json(UploadResponse {
        file: UploadedFile {
            download_url: state.download_url(&filename),
            filename,
            original_name: part.original_name,
            size: size as u64,
            uploaded_at,
        },
        record: record.map(|record| pdf_view(&state, record)),
        financial_data: form.financial_data,
    }))
}

pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PdfRecordView>>, ServerError> {
    let records = state.engine.pdf_records_for_user(&user_id).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|record| pdf_view(&state, record))
            .collect(),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PdfRecordView>, ServerError> {
    let record = state.engine.pdf_record(&id).await?;
    Ok(Json(pdf_view(&state, record)))
}

/// Serve a stored report.
pub async fn download(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<Response, ServerError> {
    if !is_safe_filename(&filename) {
        return Err(ServerError::Generic(format!("invalid filename: {filename}")));
    }
    let bytes = match state.reports.read(&filename).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::KeyNotFound(filename).into());
        }
        Err(err) => return Err(err.into()),
    };

    Ok((
        [
            (header::CONTENT_TYPE, PDF_MIMETYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Delete a report record, then its file. A file that can't be removed is
/// only logged.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let id = parse_id(&id, "pdf record")?;
    let record = state.engine.delete_pdf_record(&id.to_string()).await?;
    storage::remove_best_effort(&record.file_path).await;
    Ok(Json(Deleted { id }))
}
