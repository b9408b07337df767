//! Invoice download handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use super::dto::InvoiceQuery;
use crate::infrastructure::invoice::{InvoiceRenderer, InvoiceTotals};
use crate::interfaces::http::common::ApiResponse;

#[derive(Clone)]
pub struct InvoiceState {
    pub renderer: Arc<InvoiceRenderer>,
    /// Name offered in `Content-Disposition`
    pub file_name: Arc<str>,
}

#[utoipa::path(
    get,
    path = "/download_pdf",
    tag = "Billing",
    params(InvoiceQuery),
    responses(
        (
            status = 200,
            description = "PDF invoice",
            content_type = "application/pdf",
            body = Vec<u8>
        ),
        (status = 500, description = "Rendering failed", body = ApiResponse<String>)
    )
)]
pub async fn download_invoice(
    State(state): State<InvoiceState>,
    Query(query): Query<InvoiceQuery>,
) -> Response {
    let totals = InvoiceTotals::from(query);
    let issued_on = chrono::Local::now().date_naive();
    let renderer = state.renderer.clone();

    let rendered =
        tokio::task::spawn_blocking(move || renderer.render(&totals, issued_on)).await;

    let bytes = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to render invoice");
            return failure(e.to_string());
        }
        Err(e) => {
            error!(error = %e, "Invoice rendering task panicked");
            return failure("Invoice rendering was interrupted".to_string());
        }
    };

    metrics::counter!("invoices_rendered_total").increment(1);
    info!(size = bytes.len(), "Invoice downloaded");

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}
