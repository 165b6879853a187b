use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;

const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Lifts a nullable `(lat, lng)` pair from an order record.
    /// A missing component, `(0, 0)` or an out-of-range value means the
    /// order has not been geocoded.
    pub fn from_record(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        let point = Self::new(lat?, lng?);
        point.is_valid().then_some(point)
    }

    /// Great-circle distance in kilometers.
    pub fn dist(self, rhs: &Self) -> f64 {
        haversine_distance(self.lat, self.lng, rhs.lat, rhs.lng)
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lng)
            && !(self.lat == 0.0 && self.lng == 0.0)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lng))
    }
}

/// Haversine distance in kilometers between two `(lat, lng)` pairs in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lon2 - lon1).to_radians();
    let s1 = (dlat / 2.0).sin();
    let s2 = (dlng / 2.0).sin();
    let h = s1 * s1 + phi1.cos() * phi2.cos() * s2 * s2;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
