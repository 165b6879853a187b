use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::node::GeoPoint;

/// A service order as the dispatch core sees it: identity, address and an
/// optional location. Every other field of the source record is carried in
/// `extra` untouched so the record can be written back out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderRecord", into = "OrderRecord")]
pub struct Order {
    pub id: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub municipality: Option<String>,
    pub location: Option<GeoPoint>,
    extra: Map<String, Value>,
}

impl Order {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            street: None,
            number: None,
            neighborhood: None,
            municipality: None,
            location: None,
            extra: Map::new(),
        }
    }

    pub fn with_address(
        mut self,
        street: &str,
        number: &str,
        neighborhood: &str,
        municipality: &str,
    ) -> Self {
        self.street = non_blank(street);
        self.number = non_blank(number);
        self.neighborhood = non_blank(neighborhood);
        self.municipality = non_blank(municipality);
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = GeoPoint::from_record(Some(lat), Some(lng));
        self
    }

    pub fn has_valid_location(&self) -> bool {
        self.location.is_some_and(GeoPoint::is_valid)
    }

    /// The location, if it is usable for routing.
    pub fn valid_location(&self) -> Option<GeoPoint> {
        self.location.filter(|p| p.is_valid())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Wire shape of a `service_orders` row.
#[derive(Serialize, Deserialize)]
struct OrderRecord {
    id: String,
    #[serde(default, deserialize_with = "text_or_number")]
    address: Option<String>,
    /// Older exports name the column `street`. Only read when `address` is
    /// absent; otherwise it is kept with the other unknown fields.
    #[serde(default, deserialize_with = "text_or_number", skip_serializing)]
    street: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    number: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    neighborhood: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    municipality: Option<String>,
    #[serde(default)]
    client_lat: Option<f64>,
    #[serde(default)]
    client_long: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let mut extra = record.extra;
        let street = match (record.address, record.street) {
            (Some(address), Some(street)) => {
                extra.insert("street".to_string(), Value::String(street));
                Some(address)
            }
            (address, street) => address.or(street),
        };
        Self {
            id: record.id,
            street,
            number: record.number,
            neighborhood: record.neighborhood,
            municipality: record.municipality,
            location: GeoPoint::from_record(record.client_lat, record.client_long),
            extra,
        }
    }
}

impl From<Order> for OrderRecord {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            address: order.street,
            street: None,
            number: order.number,
            neighborhood: order.neighborhood,
            municipality: order.municipality,
            client_lat: order.location.map(|p| p.lat),
            client_long: order.location.map(|p| p.lng),
            extra: order.extra,
        }
    }
}

/// Spreadsheet imports leave house numbers as JSON numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => non_blank(&s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Order;
    use crate::node::GeoPoint;

    #[test]
    fn decodes_service_order_row() {
        let order: Order = serde_json::from_value(json!({
            "id": "os-1",
            "address": "R. das Flores",
            "number": 123,
            "neighborhood": "Centro",
            "municipality": "Itajaí",
            "client_lat": -26.9,
            "client_long": -48.66,
            "status": "pending"
        }))
        .expect("decode order");

        assert_eq!(order.id, "os-1");
        assert_eq!(order.street.as_deref(), Some("R. das Flores"));
        assert_eq!(order.number.as_deref(), Some("123"));
        assert_eq!(order.location, Some(GeoPoint::new(-26.9, -48.66)));
    }

    #[test]
    fn zero_and_null_coordinates_decode_as_missing() {
        let zero: Order = serde_json::from_value(json!({
            "id": "a", "client_lat": 0.0, "client_long": 0.0
        }))
        .expect("decode zero");
        let null: Order = serde_json::from_value(json!({
            "id": "b", "client_lat": null
        }))
        .expect("decode null");

        assert_eq!(zero.location, None);
        assert_eq!(null.location, None);
        assert!(!zero.has_valid_location());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let value = json!({
            "id": "os-2",
            "address": "Av. Brasil",
            "number": "10",
            "neighborhood": null,
            "municipality": "Itajaí",
            "client_lat": null,
            "client_long": null,
            "protocol": "P-77",
            "status": "pending"
        });
        let order: Order = serde_json::from_value(value).expect("decode");
        let encoded = serde_json::to_value(&order).expect("encode");

        assert_eq!(encoded["protocol"], "P-77");
        assert_eq!(encoded["status"], "pending");
        assert_eq!(encoded["address"], "Av. Brasil");
        assert!(encoded["client_lat"].is_null());
    }

    #[test]
    fn street_column_is_read_when_address_is_missing() {
        let order: Order = serde_json::from_value(json!({
            "id": "os-3", "street": "R. Hercílio Luz"
        }))
        .expect("decode");
        assert_eq!(order.street.as_deref(), Some("R. Hercílio Luz"));
    }

    #[test]
    fn address_wins_over_street_and_street_is_kept() {
        let order: Order = serde_json::from_value(json!({
            "id": "os-4",
            "address": "Av. Brasil",
            "street": "Avenida Brasil"
        }))
        .expect("both columns decode");
        assert_eq!(order.street.as_deref(), Some("Av. Brasil"));

        let encoded = serde_json::to_value(&order).expect("encode");
        assert_eq!(encoded["address"], "Av. Brasil");
        assert_eq!(encoded["street"], "Avenida Brasil");
    }

    #[test]
    fn builders_drop_blank_address_parts() {
        let order = Order::new("x").with_address("Rua A", " ", "Centro", "Itajaí");
        assert_eq!(order.number, None);
        assert_eq!(order.neighborhood.as_deref(), Some("Centro"));
    }
}
