use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;
use crate::core::{Dispatcher, DispatchError};
use crate::models::{
    AvailabilityRequest, ErrorResponse, HealthResponse, LocationRequest, ProviderId,
    ProviderRegisteredResponse, ProviderRelocatedResponse, RequestId, RideRequestResponse,
    SweepResponse,
};

/// Application state shared across all handlers
///
/// One lock guards drivers, the index and pending requests together.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Mutex<Dispatcher>>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }
}

/// Configure all ride-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/providers", web::post().to(register_provider))
        .route("/providers/{id}/location", web::put().to(relocate_provider))
        .route("/providers/{id}/availability", web::put().to(set_availability))
        .route("/requests", web::post().to(request_ride))
        .route("/requests/sweep", web::post().to(sweep_expired))
        .route("/requests/{id}/match", web::post().to(attempt_match))
        .route("/stats", web::get().to(stats));
}

fn invalid_coordinate(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Rejected coordinate: {:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "invalid_coordinate".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn not_found(err: DispatchError) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not_found".to_string(),
        message: err.to_string(),
        status_code: 404,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Register a driver
///
/// POST /api/v1/providers
///
/// Request body:
/// ```json
/// { "latitude": 12.9716, "longitude": 77.5946 }
/// ```
async fn register_provider(
    state: web::Data<AppState>,
    req: web::Json<LocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_coordinate(errors);
    }

    let mut dispatcher = state.dispatcher.lock().await;
    let provider_id = dispatcher.register_provider(req.coordinate());
    let geohash = dispatcher
        .registry()
        .get(provider_id)
        .map(|p| p.geohash.to_string())
        .unwrap_or_default();

    HttpResponse::Created().json(ProviderRegisteredResponse { provider_id, geohash })
}

/// Move a driver
///
/// PUT /api/v1/providers/{id}/location
async fn relocate_provider(
    state: web::Data<AppState>,
    path: web::Path<ProviderId>,
    req: web::Json<LocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_coordinate(errors);
    }

    let provider_id = path.into_inner();
    let mut dispatcher = state.dispatcher.lock().await;

    match dispatcher.relocate_provider(provider_id, req.coordinate()) {
        Ok(geohash) => HttpResponse::Ok().json(ProviderRelocatedResponse {
            provider_id,
            geohash: geohash.to_string(),
        }),
        Err(e) => not_found(e),
    }
}

/// Toggle a driver's availability
///
/// PUT /api/v1/providers/{id}/availability
///
/// Request body:
/// ```json
/// { "available": true }
/// ```
async fn set_availability(
    state: web::Data<AppState>,
    path: web::Path<ProviderId>,
    req: web::Json<AvailabilityRequest>,
) -> impl Responder {
    let provider_id = path.into_inner();
    let mut dispatcher = state.dispatcher.lock().await;

    match dispatcher.set_provider_availability(provider_id, req.available) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => not_found(e),
    }
}

/// Request a ride; matching is attempted before responding
///
/// POST /api/v1/requests
async fn request_ride(
    state: web::Data<AppState>,
    req: web::Json<LocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_coordinate(errors);
    }

    let mut dispatcher = state.dispatcher.lock().await;
    let (request_id, outcome) = dispatcher.submit_request(req.coordinate());

    HttpResponse::Created().json(RideRequestResponse { request_id, outcome })
}

/// Retry matching for a pending request
///
/// POST /api/v1/requests/{id}/match
async fn attempt_match(
    state: web::Data<AppState>,
    path: web::Path<RequestId>,
) -> impl Responder {
    let request_id = path.into_inner();
    let mut dispatcher = state.dispatcher.lock().await;

    match dispatcher.attempt_match(request_id) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => not_found(e),
    }
}

/// Purge requests that waited too long
///
/// POST /api/v1/requests/sweep
async fn sweep_expired(state: web::Data<AppState>) -> impl Responder {
    let expired = state.dispatcher.lock().await.sweep_expired();

    if !expired.is_empty() {
        tracing::info!("Swept {} expired ride requests", expired.len());
    }

    HttpResponse::Ok().json(SweepResponse { expired })
}

/// System statistics
///
/// GET /api/v1/stats
async fn stats(state: web::Data<AppState>) -> impl Responder {
    let stats = state.dispatcher.lock().await.snapshot_stats();
    HttpResponse::Ok().json(stats)
}
