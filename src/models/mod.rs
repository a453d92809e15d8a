// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Candidate, Coordinate, MatchOutcome, MatchPolicy, PendingRequest, Provider,
    ProviderId, ProviderSnapshot, RequestId, RequestSnapshot, SystemStats,
};
pub use requests::{AvailabilityRequest, LocationRequest};
pub use responses::{
    ErrorResponse, HealthResponse, ProviderRegisteredResponse, ProviderRelocatedResponse,
    RideRequestResponse, SweepResponse,
};
