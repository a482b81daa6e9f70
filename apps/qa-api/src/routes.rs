use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use qa_service::{Error as ServiceError, QueryRequest, QueryResponse, RequestMetricsResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/query", post(query))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/admin/request_metrics", get(request_metrics))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn query(
	State(state): State<AppState>,
	payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.handle_query(payload).await?;

	Ok(Json(response))
}

async fn request_metrics(
	State(state): State<AppState>,
) -> Result<Json<RequestMetricsResponse>, ApiError> {
	let response = state.service.request_metrics().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message, fields } => ApiError::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"INVALID_REQUEST",
				message,
				Some(fields),
			),
			ServiceError::GenerationUnavailable { message } => {
				tracing::error!(%message, "Answer generation unavailable.");

				ApiError::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"GENERATION_UNAVAILABLE",
					"Answer generation is temporarily unavailable.",
					None,
				)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Failed to record the query.",
					None,
				)
			},
			ServiceError::Internal { message } => {
				tracing::error!(%message, "Internal failure.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		ApiError::new(err.status(), "INVALID_REQUEST", err.body_text(), None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
