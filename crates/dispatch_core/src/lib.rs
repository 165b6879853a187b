//! Route optimization and geocoding for field-service dispatch.
//! Orders are geocoded against a rate-limited search endpoint, clustered per
//! technician with k-means, then sequenced with nearest-neighbor and 2-opt.

mod algo;
mod constants;
mod error;
mod geo;
mod geocode;
mod io;
pub mod logging;
mod node;
mod order;
mod route;

pub(crate) use algo::{clustering, construction, distribution, two_opt};
pub(crate) use geo::geometry;
pub(crate) use io::options;

pub use algo::clustering::kmeans_cluster;
pub use algo::construction::nearest_neighbor_sort;
pub use algo::distribution::distribute_by_latitude;
pub use algo::optimizer::{RouteOptimizer, apply_geocode_results, optimize_routes};
pub use algo::two_opt::{TwoOptStats, two_opt_optimize};
pub use error::{Error, Result};
pub use geo::geometry::{calculate_centroid, route_distance};
pub use geocode::address::{build_address_query, build_alternative_queries, normalize_address};
pub use geocode::client::{NominatimClient, PlaceLookup};
pub use geocode::geocoder::{CancellationToken, GeocodeProgress, Geocoder};
pub use io::input::DispatchInput;
pub use io::options::{DispatchOptions, LogFormat, LogLevel, RouteStrategy};
pub use io::output::DispatchOutput;
pub use node::{GeoPoint, haversine_distance};
pub use order::Order;
pub use route::{OptimizationResult, RouteSummary, TechnicianRoute};
