//! Bill calculator handlers: the HTML form and the JSON API

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form, Json,
};
use tracing::warn;

use super::dto::{BillForm, BillResponse, CalculateBillRequest, TariffResponse};
use super::view::{render_page, BillPage, Outcome};
use crate::application::BillingService;
use crate::domain::Consumption;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct BillingState {
    pub billing: Arc<BillingService>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Billing",
    responses(
        (status = 200, description = "Calculator form", content_type = "text/html", body = String)
    )
)]
pub async fn show_form(State(state): State<BillingState>) -> Html<String> {
    Html(render_page(&BillPage {
        tariff: state.billing.tariff(),
        units: "",
        outcome: Outcome::Empty,
    }))
}

/// Always answers with the page; bad input becomes a message on it.
#[utoipa::path(
    post,
    path = "/",
    tag = "Billing",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`units=<number>`"
    ),
    responses(
        (
            status = 200,
            description = "Results or validation message",
            content_type = "text/html",
            body = String
        )
    )
)]
pub async fn submit_form(
    State(state): State<BillingState>,
    form: Result<Form<BillForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable bill form");
            BillForm::default()
        }
    };

    let tariff = state.billing.tariff();
    let html = match state.billing.quote_str(&form.units) {
        Ok(bill) => render_page(&BillPage {
            tariff,
            units: &form.units,
            outcome: Outcome::Calculated(&bill),
        }),
        Err(e) => render_page(&BillPage {
            tariff,
            units: &form.units,
            outcome: Outcome::Rejected(e.reason()),
        }),
    };
    Html(html)
}

#[utoipa::path(
    post,
    path = "/api/v1/bills",
    tag = "Billing",
    request_body = CalculateBillRequest,
    responses(
        (status = 200, description = "Calculated bill", body = ApiResponse<BillResponse>),
        (status = 400, description = "Malformed JSON", body = ApiResponse<String>),
        (status = 422, description = "Invalid consumption", body = ApiResponse<String>)
    )
)]
pub async fn calculate_bill(
    State(state): State<BillingState>,
    ValidatedJson(req): ValidatedJson<CalculateBillRequest>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    let consumption = Consumption::new(req.consumption).map_err(domain_error)?;
    let bill = state.billing.quote(consumption).map_err(domain_error)?;
    let currency = state.billing.tariff().currency.as_str();
    Ok(Json(ApiResponse::success(BillResponse::new(&bill, currency))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tariff",
    tag = "Billing",
    responses((status = 200, description = "Active tariff", body = ApiResponse<TariffResponse>))
)]
pub async fn get_tariff(State(state): State<BillingState>) -> Json<ApiResponse<TariffResponse>> {
    Json(ApiResponse::success(state.billing.tariff().into()))
}
