use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::{
    CalculationError, CalculationInput, CalculationOutput, Industry, Workload, calculate,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const INVALID_SELECTION: &str = "Invalid industry or workload";
const INTERNAL_ERROR: &str = "Internal server error";

/// Request body as posted by the form. Every field is kept as a raw JSON value
/// so that presence, type and membership are checked in a fixed order rather
/// than by the deserializer.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    monthly_cloud_spend: Option<Value>,
    industry: Option<Value>,
    primary_workload: Option<Value>,
    current_utilization: Option<Value>,
    manual_optimization_hours: Option<Value>,
    engineer_hourly_cost: Option<Value>,
    sustainability_goals: Option<Value>,
}

#[derive(Debug, Serialize)]
struct SuccessResponse<'a> {
    success: bool,
    data: &'a CalculationOutput,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Detail is logged, never sent to the client.
    #[error("{0}")]
    Internal(String),
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        if err.is_unknown_key() {
            ApiError::Validation(INVALID_SELECTION.to_string())
        } else if err.is_validation() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                warn!(error = %msg, "rejected calculation request");
                error_response(StatusCode::BAD_REQUEST, &msg)
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, "error in calculation");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/calculate", post(calculate_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "cloud savings API listening");
    info!("local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_handler(body: Bytes) -> Response {
    match calculate_from_body(&body) {
        Ok(output) => json_response(
            StatusCode::OK,
            SuccessResponse {
                success: true,
                data: &output,
            },
        ),
        Err(err) => err.into_response(),
    }
}

fn calculate_from_body(body: &[u8]) -> Result<CalculationOutput, ApiError> {
    // Only a JSON object is a request; arrays would otherwise fill the
    // payload fields by position.
    let object = serde_json::from_slice::<Map<String, Value>>(body)
        .map_err(|e| ApiError::Internal(format!("unreadable request body: {e}")))?;
    let payload = serde_json::from_value::<CalculatePayload>(Value::Object(object))
        .map_err(|e| ApiError::Internal(format!("unreadable request body: {e}")))?;
    let input = input_from_payload(payload)?;
    Ok(calculate(&input)?)
}

fn input_from_payload(payload: CalculatePayload) -> Result<CalculationInput, CalculationError> {
    // Membership is checked before anything else so an unknown key is always
    // reported as such, whatever the other fields hold.
    let industry = key_field(payload.industry.as_ref()).parse::<Industry>();
    let primary_workload = key_field(payload.primary_workload.as_ref()).parse::<Workload>();
    let (industry, primary_workload) = (industry?, primary_workload?);

    Ok(CalculationInput {
        monthly_cloud_spend: number_field(payload.monthly_cloud_spend, "monthlyCloudSpend")?,
        industry,
        primary_workload,
        current_utilization: number_field(payload.current_utilization, "currentUtilization")?,
        manual_optimization_hours: number_field(
            payload.manual_optimization_hours,
            "manualOptimizationHours",
        )?,
        engineer_hourly_cost: number_field(payload.engineer_hourly_cost, "engineerHourlyCost")?,
        sustainability_goals: bool_field(payload.sustainability_goals, "sustainabilityGoals")?,
    })
}

// Missing and non-string keys fall through to the unknown-key error.
fn key_field(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

fn number_field(value: Option<Value>, field: &'static str) -> Result<f64, CalculationError> {
    let Some(value) = value else {
        return Err(CalculationError::InvalidField {
            field,
            reason: "is required",
        });
    };
    value.as_f64().ok_or(CalculationError::InvalidField {
        field,
        reason: "must be a number",
    })
}

fn bool_field(value: Option<Value>, field: &'static str) -> Result<bool, CalculationError> {
    match value {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(_) => Err(CalculationError::InvalidField {
            field,
            reason: "must be a boolean",
        }),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            success: false,
            error: msg.to_string(),
        },
    )
}
