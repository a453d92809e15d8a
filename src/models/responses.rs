use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchOutcome, ProviderId, RequestId};

/// Response for driver registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRegisteredResponse {
    #[serde(rename = "providerId")]
    pub provider_id: ProviderId,
    pub geohash: String,
}

/// Response for a driver location update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRelocatedResponse {
    #[serde(rename = "providerId")]
    pub provider_id: ProviderId,
    pub geohash: String,
}

/// Response for a ride request, including the immediate match attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRequestResponse {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    pub outcome: MatchOutcome,
}

/// Response for an expiry sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub expired: Vec<RequestId>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
