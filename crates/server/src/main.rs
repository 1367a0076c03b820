// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod outbox;
mod seed;
mod session;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use clap::Parser;
use nagrik_setu_api::{
    AssignStaffResponse, AuditTimelineResponse, ComplaintResponse, DeleteComplaintResponse,
    DepartmentListResponse, ErrorKind, FileComplaintRequest, FileComplaintResponse,
    LifecycleCoordinator, LifecycleError, ListComplaintsResponse, Ports, RoleGate,
    StaffListResponse, StatusResponse, TrackComplaintResponse, audit_timeline, file_complaint,
    get_complaint, list_citizen_complaints, list_complaints, list_departments, list_staff,
    track_complaint,
};
use nagrik_setu_domain::{CitizenId, Complaint, ComplaintId, ComplaintStatus, StaffId};
use nagrik_setu_persistence::{Persistence, SharedPersistence};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::outbox::{LogDelivery, OutboxGateway, run_worker};
use crate::seed::DirectorySeed;
use crate::session::Caller;

/// Nagrik Setu Server - HTTP server for civic complaint tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON file with departments, citizens and staff to create at startup
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Capacity of the notification queue
    #[arg(long, default_value_t = 256)]
    notification_queue: usize,

    /// Upper bound on delivering a single notification, in milliseconds
    #[arg(long, default_value_t = 5000)]
    notification_timeout_ms: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Owns every complaint mutation.
    coordinator: LifecycleCoordinator,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error kind, e.g. `AlreadyTerminal`.
    kind: String,
    /// Error message.
    message: String,
    /// Whether the caller may retry the request.
    retryable: bool,
    /// Status committed before the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    committed: Option<ComplaintStatus>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The response body.
    body: ErrorResponse,
}

impl HttpError {
    fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: true,
                kind: String::from("Internal"),
                message,
                retryable: false,
                committed: None,
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<LifecycleError> for HttpError {
    fn from(err: LifecycleError) -> Self {
        let kind: ErrorKind = err.kind();
        let status: StatusCode = match kind {
            ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::AlreadyTerminal
            | ErrorKind::StaffUnavailable
            | ErrorKind::ConcurrentModification => StatusCode::CONFLICT,
            ErrorKind::DependencyFailure => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::InvalidState | ErrorKind::ReferenceMissing => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(kind = ?kind, committed = ?err.committed(), error = %err, "Request failed");
        }

        Self {
            status,
            body: ErrorResponse {
                error: true,
                kind: format!("{kind:?}"),
                message: err.to_string(),
                retryable: kind.is_retryable(),
                committed: err.committed(),
            },
        }
    }
}

/// Runs a coordinator call on the blocking pool.
///
/// Store calls are synchronous and must not run on the async workers.
async fn run_blocking<T, F>(app_state: &AppState, op: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&LifecycleCoordinator) -> Result<T, LifecycleError> + Send + 'static,
{
    let coordinator: LifecycleCoordinator = app_state.coordinator.clone();
    tokio::task::spawn_blocking(move || op(&coordinator))
        .await
        .map_err(|e| {
            error!(error = %e, "Blocking task failed");
            HttpError::internal(format!("Task failed: {e}"))
        })?
        .map_err(HttpError::from)
}

/// Handler for POST `/complaints` endpoint.
///
/// Files a complaint for the calling citizen.
async fn handle_file_complaint(
    AxumState(app_state): AxumState<AppState>,
    Caller { actor, .. }: Caller,
    Json(req): Json<FileComplaintRequest>,
) -> Result<(StatusCode, Json<FileComplaintResponse>), HttpError> {
    info!(actor_id = %actor.id, department_id = req.department_id, "Handling file_complaint request");

    let response: FileComplaintResponse =
        run_blocking(&app_state, move |c| file_complaint(c, &req, &actor)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/complaints` endpoint.
async fn handle_list_complaints(
    AxumState(app_state): AxumState<AppState>,
    Caller { actor, .. }: Caller,
) -> Result<Json<ListComplaintsResponse>, HttpError> {
    let response: ListComplaintsResponse =
        run_blocking(&app_state, move |c| list_complaints(c, &actor)).await?;
    Ok(Json(response))
}

/// Handler for GET `/complaints/{id}` endpoint.
async fn handle_get_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Caller { actor, .. }: Caller,
) -> Result<Json<ComplaintResponse>, HttpError> {
    let response: ComplaintResponse = run_blocking(&app_state, move |c| {
        get_complaint(c, ComplaintId::new(complaint_id), &actor)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/complaints/{id}` endpoint.
async fn handle_delete_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Caller { actor, cause }: Caller,
) -> Result<Json<DeleteComplaintResponse>, HttpError> {
    info!(actor_id = %actor.id, complaint_id, "Handling delete_complaint request");

    run_blocking(&app_state, move |c| {
        c.delete_complaint(ComplaintId::new(complaint_id), &actor, cause)
    })
    .await?;

    Ok(Json(DeleteComplaintResponse {
        complaint_id,
        message: format!("Deleted complaint {complaint_id}"),
    }))
}

/// Handler for PUT `/complaints/{id}/status/next` endpoint.
///
/// Advances the complaint one step.
async fn handle_advance_status(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Caller { actor, cause }: Caller,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(actor_id = %actor.id, complaint_id, "Handling advance_status request");

    let status: ComplaintStatus = run_blocking(&app_state, move |c| {
        c.advance_status(ComplaintId::new(complaint_id), &actor, cause)
    })
    .await?;

    Ok(Json(StatusResponse {
        complaint_id,
        status,
    }))
}

/// Handler for PUT `/complaints/{id}/status/reject` endpoint.
async fn handle_reject(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Caller { actor, cause }: Caller,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(actor_id = %actor.id, complaint_id, "Handling reject request");

    let status: ComplaintStatus = run_blocking(&app_state, move |c| {
        c.reject(ComplaintId::new(complaint_id), &actor, cause)
    })
    .await?;

    Ok(Json(StatusResponse {
        complaint_id,
        status,
    }))
}

/// Handler for PUT `/complaints/{id}/assigned_to/{staff_id}` endpoint.
async fn handle_assign_staff(
    AxumState(app_state): AxumState<AppState>,
    Path((complaint_id, staff_id)): Path<(i64, i64)>,
    Caller { actor, cause }: Caller,
) -> Result<Json<AssignStaffResponse>, HttpError> {
    info!(actor_id = %actor.id, complaint_id, staff_id, "Handling assign_staff request");

    let complaint: Complaint = run_blocking(&app_state, move |c| {
        c.assign_staff(
            ComplaintId::new(complaint_id),
            StaffId::new(staff_id),
            &actor,
            cause,
        )
    })
    .await?;

    Ok(Json(AssignStaffResponse {
        complaint: ComplaintResponse::from(&complaint),
        message: format!("Assigned staff {staff_id} to complaint {complaint_id}"),
    }))
}

/// Handler for GET `/complaints/{id}/audit` endpoint.
async fn handle_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Caller { actor, .. }: Caller,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let response: AuditTimelineResponse = run_blocking(&app_state, move |c| {
        audit_timeline(c, ComplaintId::new(complaint_id), &actor)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/citizens/{id}/complaints` endpoint.
async fn handle_citizen_complaints(
    AxumState(app_state): AxumState<AppState>,
    Path(citizen_id): Path<i64>,
    Caller { actor, .. }: Caller,
) -> Result<Json<ListComplaintsResponse>, HttpError> {
    let response: ListComplaintsResponse = run_blocking(&app_state, move |c| {
        list_citizen_complaints(c, CitizenId::new(citizen_id), &actor)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/track/{token}` endpoint.
///
/// Public; no caller headers required.
async fn handle_track_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(token): Path<String>,
) -> Result<Json<TrackComplaintResponse>, HttpError> {
    let response: TrackComplaintResponse =
        run_blocking(&app_state, move |c| track_complaint(c, &token)).await?;
    Ok(Json(response))
}

/// Handler for GET `/staff` endpoint.
async fn handle_list_staff(
    AxumState(app_state): AxumState<AppState>,
    Caller { actor, .. }: Caller,
) -> Result<Json<StaffListResponse>, HttpError> {
    let response: StaffListResponse =
        run_blocking(&app_state, move |c| list_staff(c, &actor)).await?;
    Ok(Json(response))
}

/// Handler for GET `/departments` endpoint.
///
/// Public; no caller headers required.
async fn handle_list_departments(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DepartmentListResponse>, HttpError> {
    let response: DepartmentListResponse = run_blocking(&app_state, list_departments).await?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/complaints",
            get(handle_list_complaints).post(handle_file_complaint),
        )
        .route(
            "/complaints/{id}",
            get(handle_get_complaint).delete(handle_delete_complaint),
        )
        .route("/complaints/{id}/status/next", put(handle_advance_status))
        .route("/complaints/{id}/status/reject", put(handle_reject))
        .route(
            "/complaints/{id}/assigned_to/{staff_id}",
            put(handle_assign_staff),
        )
        .route("/complaints/{id}/audit", get(handle_audit_timeline))
        .route("/citizens/{id}/complaints", get(handle_citizen_complaints))
        .route("/track/{token}", get(handle_track_complaint))
        .route("/staff", get(handle_list_staff))
        .route("/departments", get(handle_list_departments))
        .with_state(app_state)
}

/// Wires the coordinator to a store and a notification gateway.
fn build_state(persistence: Persistence, gateway: OutboxGateway) -> AppState {
    let store: SharedPersistence = SharedPersistence::new(persistence);
    AppState {
        coordinator: LifecycleCoordinator::new(
            Ports::from_store(store),
            Arc::new(RoleGate),
            Arc::new(gateway),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Nagrik Setu server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(seed_path) = &args.seed {
        info!("Loading directory seed from: {}", seed_path.display());
        DirectorySeed::load(seed_path)?.apply(&mut persistence)?;
    }

    // Start the notification outbox
    let (gateway, rx) = OutboxGateway::channel(args.notification_queue);
    tokio::spawn(run_worker(
        rx,
        LogDelivery,
        Duration::from_millis(args.notification_timeout_ms),
    ));

    let app: Router = build_router(build_state(persistence, gateway));

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
