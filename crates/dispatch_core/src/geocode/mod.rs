pub(crate) mod address;
pub(crate) mod client;
pub(crate) mod geocoder;
mod throttle;
