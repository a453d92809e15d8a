// Core algorithm exports
pub mod clock;
pub mod dispatch;
pub mod distance;
pub mod geohash;
pub mod index;
pub mod matcher;
pub mod registry;
pub mod requests;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatch::{Dispatcher, DispatchError};
pub use distance::{haversine_distance, is_within_bounding_box};
pub use geohash::{decode, decode_bounds, encode, neighbors, Geohash};
pub use index::SpatialIndex;
pub use matcher::{Matcher, MatchResult};
pub use registry::ProviderRegistry;
pub use requests::RequestStore;
