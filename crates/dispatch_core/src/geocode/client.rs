use std::time::Duration;

use reqwest::{blocking::Client, header::ACCEPT};
use serde::Deserialize;

use crate::{Error, Result, constants::GEOCODE_TIMEOUT_SECS, node::GeoPoint};

/// One address lookup against a geocoding service.
///
/// `Ok(None)` means the service answered but found nothing; `Err` covers
/// transport failures, non-2xx statuses and unreadable bodies.
pub trait PlaceLookup {
    fn search(&self, query: &str) -> Result<Option<GeoPoint>>;
}

/// Nominatim-compatible `/search` endpoint.
pub struct NominatimClient {
    http: Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(Error::invalid_input("geocode endpoint must not be empty"));
        }
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(GEOCODE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim().to_string(),
        })
    }
}

impl PlaceLookup for NominatimClient {
    fn search(&self, query: &str) -> Result<Option<GeoPoint>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        parse_search_response(&response.text()?)
    }
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// First hit of a `format=json` search body.
pub(crate) fn parse_search_response(body: &str) -> Result<Option<GeoPoint>> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let lat = parse_coordinate("lat", &place.lat)?;
    let lng = parse_coordinate("lon", &place.lon)?;
    let point = GeoPoint::new(lat, lng);
    if !point.is_valid() {
        log::warn!("geocoder.response: unusable point={point}, treating as no result");
        return Ok(None);
    }
    Ok(Some(point))
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid_data(format!("{field} is not a number: {raw:?}")))?;
    if !value.is_finite() {
        return Err(Error::invalid_data(format!("{field} is not finite: {raw:?}")));
    }
    Ok(value)
}
