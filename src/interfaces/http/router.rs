//! HTTP router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::billing::{self, BillingState};
use super::modules::health::{self, HealthState};
use super::modules::invoice::{self, InvoiceState};
use super::modules::metrics::{self, http_metrics_middleware, MetricsState};
use super::modules::request_id::request_id_middleware;
use crate::application::BillingService;
use crate::infrastructure::invoice::InvoiceRenderer;

/// Unified router state. Each handler extracts only its own slice via
/// `FromRef`, so handlers stay independent of each other.
#[derive(Clone)]
pub struct AppState {
    pub billing: Arc<BillingService>,
    pub invoice: Arc<InvoiceRenderer>,
    pub invoice_file_name: Arc<str>,
    pub started_at: Instant,
    pub prometheus: PrometheusHandle,
}

impl FromRef<AppState> for BillingState {
    fn from_ref(s: &AppState) -> Self {
        BillingState {
            billing: Arc::clone(&s.billing),
        }
    }
}

impl FromRef<AppState> for InvoiceState {
    fn from_ref(s: &AppState) -> Self {
        InvoiceState {
            renderer: Arc::clone(&s.invoice),
            file_name: Arc::clone(&s.invoice_file_name),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            billing: Arc::clone(&s.billing),
            started_at: s.started_at,
        }
    }
}

impl FromRef<AppState> for MetricsState {
    fn from_ref(s: &AppState) -> Self {
        MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Billing
        billing::handlers::show_form,
        billing::handlers::submit_form,
        billing::handlers::calculate_bill,
        billing::handlers::get_tariff,
        invoice::handlers::download_invoice,
        // Health
        health::handlers::health_check,
        metrics::handlers::prometheus_metrics,
    ),
    components(
        schemas(
            ApiResponse<String>,
            billing::CalculateBillRequest,
            billing::BillResponse,
            billing::BandUsageResponse,
            billing::TariffResponse,
            billing::BandResponse,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Billing", description = "Slab tariff bill calculation and PDF invoices"),
        (name = "Health", description = "Liveness and Prometheus metrics"),
    ),
    info(
        title = "PowerBill API",
        version = "1.0.0",
        description = "Tiered (slab) electricity billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the router with all routes and the middleware stack
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/bills", post(billing::calculate_bill))
        .route("/tariff", get(billing::get_tariff));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // HTML calculator + invoice
        .route("/", get(billing::show_form).post(billing::submit_form))
        .route("/download_pdf", get(invoice::download_invoice))
        // Health
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        // JSON API
        .nest("/api/v1", api_routes)
        .with_state(state)
        // Swagger UI
        .merge(swagger_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::infrastructure::invoice::Letterhead;
    use crate::interfaces::http::modules::metrics::UNMATCHED_PATH;

    fn app() -> Router {
        let billing = BillingService::default();
        let invoice = InvoiceRenderer::new(
            Letterhead::default(),
            billing.tariff().currency.clone(),
            billing.tariff().tax_caption(),
        );
        create_router(AppState {
            billing: Arc::new(billing),
            invoice: Arc::new(invoice),
            invoice_file_name: Arc::from("PowerBill_Invoice.pdf"),
            started_at: Instant::now(),
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
        })
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Runs `requests` on a fresh runtime with a thread-local recorder and
    /// returns the Prometheus exposition it collected.
    fn record<F>(requests: F) -> String
    where
        F: std::future::Future<Output = ()>,
    {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        ::metrics::with_local_recorder(&recorder, || runtime.block_on(requests));
        handle.render()
    }

    #[tokio::test]
    async fn form_page_renders() {
        let resp = app().oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("<form method=\"post\""));
    }

    #[tokio::test]
    async fn form_submission_shows_breakdown() {
        let resp = app().oneshot(post_form("units=250")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Bill calculated successfully."));
        assert!(html.contains("3500.00"));
        assert!(html.contains("262.50"));
        assert!(html.contains("4512.50"));
    }

    #[tokio::test]
    async fn negative_units_show_message_without_totals() {
        let resp = app().oneshot(post_form("units=-5")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Please enter a valid positive number."));
        assert!(!html.contains("Total Payable"));
    }

    #[tokio::test]
    async fn non_numeric_units_show_message() {
        let resp = app().oneshot(post_form("units=lots")).await.unwrap();
        let html = body_string(resp).await;
        assert!(html.contains("Please enter a valid positive number."));
    }

    #[tokio::test]
    async fn missing_field_is_treated_as_empty_input() {
        let resp = app().oneshot(post_form("")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("consumption is required"));
    }

    #[tokio::test]
    async fn unreadable_form_does_not_fail_the_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("units=10"))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Please enter a valid positive number."));
    }

    #[tokio::test]
    async fn json_bill_calculation() {
        let resp = app()
            .oneshot(post_json("/api/v1/bills", r#"{"consumption": 250}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["energy_total"], "3500");
        assert_eq!(data["tax"], "262.5");
        assert_eq!(data["fixed_charge"], "750");
        assert_eq!(data["grand_total"], "4512.5");
        assert_eq!(data["breakdown"].as_array().unwrap().len(), 3);
        assert_eq!(data["breakdown"][2]["units_used"], "50");
        assert_eq!(
            data["invoice_url"],
            "/download_pdf?energy_total=3500.00&vat=262.50&fixed_charge=750.00&grand_total=4512.50"
        );
    }

    #[tokio::test]
    async fn json_accepts_decimal_strings() {
        let resp = app()
            .oneshot(post_json("/api/v1/bills", r#"{"consumption": "0"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["data"]["grand_total"], "750");
        assert!(body["data"]["breakdown"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_negative_consumption_is_422() {
        let resp = app()
            .oneshot(post_json("/api/v1/bills", r#"{"consumption": -1}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("consumption:"));
    }

    #[tokio::test]
    async fn json_garbage_is_400() {
        let resp = app()
            .oneshot(post_json("/api/v1/bills", r#"{"consumption": "abc"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tariff_endpoint_lists_bands() {
        let resp = app().oneshot(get("/api/v1/tariff")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let bands = body["data"]["bands"].as_array().unwrap();
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0]["capacity"], "100");
        assert!(bands[3]["capacity"].is_null());
        assert_eq!(body["data"]["tax_rate"], "0.075");
    }

    #[tokio::test]
    async fn invoice_download_is_pdf_attachment() {
        let uri = concat!(
            "/download_pdf?energy_total=3500.00&vat=262.50",
            "&fixed_charge=750.00&grand_total=4512.50"
        );
        let resp = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"PowerBill_Invoice.pdf\""
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn invoice_without_parameters_still_renders() {
        let resp = app().oneshot(get("/download_pdf")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let resp = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tariff_bands"], 4);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_text() {
        let resp = app().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let resp = app().oneshot(get("/api-doc/openapi.json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert!(body["paths"]["/api/v1/bills"].is_object());
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let resp = app().oneshot(get("/health")).await.unwrap();
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[test]
    fn unknown_paths_share_one_metrics_series() {
        let rendered = record(async {
            for path in ["/junk-1", "/junk-2", "/nested/junk-3"] {
                let resp = app().oneshot(get(path)).await.unwrap();
                assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            }
            app().oneshot(get("/health")).await.unwrap();
        });

        let series: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .collect();
        assert_eq!(series.len(), 2, "{rendered}");
        let unmatched = format!("path=\"{}\"", UNMATCHED_PATH);
        assert!(series
            .iter()
            .any(|line| line.contains(&unmatched) && line.ends_with(" 3")));
        assert!(series.iter().any(|line| line.contains("path=\"/health\"")));
        assert!(!rendered.contains("junk"));
    }

    #[test]
    fn bills_and_invoices_are_counted() {
        let rendered = record(async {
            let resp = app()
                .oneshot(post_json("/api/v1/bills", r#"{"consumption": 250}"#))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let resp = app().oneshot(get("/download_pdf")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        });

        assert!(rendered.contains("bills_calculated_total 1"), "{rendered}");
        assert!(rendered.contains("invoices_rendered_total 1"), "{rendered}");
    }
}
