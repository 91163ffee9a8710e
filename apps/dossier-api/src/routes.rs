use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use tokio::task;

use dossier_service::{DetailResponse, DossierService, ListResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/dossiers", get(list_dossiers))
		.route("/api/dossiers/{filename}", get(get_dossier))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_dossiers(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
	let response = blocking(state, |service| service.list()).await?;

	Ok(Json(response))
}

async fn get_dossier(
	State(state): State<AppState>,
	Path(filename): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
	let response = blocking(state, move |service| service.get(&filename)).await?;

	Ok(Json(response))
}

/// Runs a file-system bound service call off the async workers.
async fn blocking<T, F>(state: AppState, call: F) -> Result<T, ApiError>
where
	T: Send + 'static,
	F: FnOnce(&DossierService) -> dossier_service::Result<T> + Send + 'static,
{
	let service = state.service;

	task::spawn_blocking(move || call(service.as_ref()))
		.await
		.map_err(|err| json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string()))?
		.map_err(ApiError::from)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<dossier_service::Error> for ApiError {
	fn from(err: dossier_service::Error) -> Self {
		match err {
			dossier_service::Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message),
			err @ dossier_service::Error::ReadDir { .. } => {
				tracing::error!(error = %err, "Failed to scan the search folder.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "read_failed", err.to_string())
			},
			err @ dossier_service::Error::Dossier(_) => {
				tracing::error!(error = %err, "Failed to read dossier.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "read_failed", err.to_string())
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
