pub(crate) const EARTH_RADIUS_KM: f64 = 6_371.0;

pub(crate) const KMEANS_MAX_ITERATIONS: usize = 50;
pub(crate) const TWO_OPT_MAX_PASSES: usize = 100;
/// Open paths shorter than this have no improving 2-opt move.
pub(crate) const MIN_TOUR_SIZE_FOR_2OPT: usize = 4;
pub(crate) const TWO_OPT_IMPROVEMENT_EPSILON: f64 = 1e-9;

pub(crate) const COUNTRY: &str = "Brasil";
pub(crate) const DEFAULT_REGION: &str = "Santa Catarina";
pub(crate) const DEFAULT_GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub(crate) const DEFAULT_USER_AGENT: &str = "FieldServiceManagement/1.0";
pub(crate) const DEFAULT_GEOCODE_INTERVAL_MS: u64 = 1_500;
/// Nominatim usage policy: at most one request per second, with margin.
pub(crate) const MIN_GEOCODE_INTERVAL_MS: u64 = 1_100;
pub(crate) const GEOCODE_TIMEOUT_SECS: u64 = 20;
