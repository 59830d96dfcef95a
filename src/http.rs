use crate::appointment_manager::AppointmentManager;
use crate::configuration::Configuration;
use crate::error::SchedulingError;
use crate::expiry_scheduler::ExpiryScheduler;
use crate::store::AppointmentStore;
use crate::types::{Appointment, AppointmentSummary, AvailabilityWindow};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState<S: AppointmentStore> {
    appointment_manager: AppointmentManager<S>,
}

#[derive(Debug, Clone, Deserialize)]
struct ListAppointmentsQuery {
    date: Option<NaiveDate>,
    provider: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReserveRequest {
    client: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SetAvailabilityQuery {
    overwrite: Option<bool>,
}

pub fn create_app<S, C>(store: S, configuration: C) -> Router
where
    S: AppointmentStore,
    C: Configuration,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let appointment_manager =
        AppointmentManager::new(store, ExpiryScheduler::default(), &configuration);
    let state = AppState {
        appointment_manager,
    };

    Router::new()
        .route("/ping", get(ping))
        .route("/appointments", get(get_available_appointments))
        .route("/appointments/:appointment_id", get(get_appointment))
        .route(
            "/appointments/:appointment_id/reserve",
            put(reserve_appointment),
        )
        .route(
            "/appointments/:appointment_id/confirm",
            put(confirm_appointment),
        )
        .route(
            "/providers/:provider/availability",
            post(set_provider_availability),
        )
        .with_state(state)
        .layer(cors)
}

/// Wire mapping of the engine's error kinds. Everything the engine
/// reports is a client error except store failures.
impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let status = match &self {
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::AlreadyScheduled(_) | SchedulingError::AvailabilityExists(_) => {
                StatusCode::CONFLICT
            }
            SchedulingError::InsufficientAvailability
            | SchedulingError::LeadTimeViolation { .. }
            | SchedulingError::NotReserved(_) => StatusCode::BAD_REQUEST,
            SchedulingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn ping() -> &'static str {
    "pong"
}

async fn get_available_appointments<S: AppointmentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<AppointmentSummary>>, SchedulingError> {
    let appointments = state
        .appointment_manager
        .list_available(query.date, query.provider.as_deref())?;
    Ok(Json(appointments))
}

async fn get_appointment<S: AppointmentStore>(
    State(state): State<AppState<S>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state.appointment_manager.get_by_id(appointment_id)?;
    Ok(Json(appointment))
}

async fn reserve_appointment<S: AppointmentStore>(
    State(state): State<AppState<S>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<ReserveRequest>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state
        .appointment_manager
        .reserve(appointment_id, &request.client)
        .await?;
    Ok(Json(appointment))
}

async fn confirm_appointment<S: AppointmentStore>(
    State(state): State<AppState<S>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, SchedulingError> {
    let appointment = state.appointment_manager.confirm(appointment_id).await?;
    Ok(Json(appointment))
}

async fn set_provider_availability<S: AppointmentStore>(
    State(state): State<AppState<S>>,
    Path(provider): Path<String>,
    Query(query): Query<SetAvailabilityQuery>,
    Json(window): Json<AvailabilityWindow>,
) -> Result<StatusCode, SchedulingError> {
    state
        .appointment_manager
        .set_availability(&provider, &window, query.overwrite.unwrap_or(false))
        .await?;
    Ok(StatusCode::CREATED)
}
