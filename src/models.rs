//! Provider records, the service catalog and the service areas

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One entry of the fixed service catalog, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKind {
    WashOnly,
    IronOnly,
    WashAndIron,
    DryClean,
}

impl ServiceKind {
    /// The whole catalog in display and submission order
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::WashOnly,
        ServiceKind::IronOnly,
        ServiceKind::WashAndIron,
        ServiceKind::DryClean,
    ];

    /// Key stored in the `services[].name` column
    pub fn key(&self) -> &'static str {
        match self {
            ServiceKind::WashOnly => "washOnly",
            ServiceKind::IronOnly => "ironOnly",
            ServiceKind::WashAndIron => "washAndIron",
            ServiceKind::DryClean => "dryClean",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKind::WashOnly => "Wash Only",
            ServiceKind::IronOnly => "Iron Only",
            ServiceKind::WashAndIron => "Wash & Iron",
            ServiceKind::DryClean => "Dry Clean",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ServiceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Service areas a provider can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceArea {
    #[serde(rename = "HBR Layout")]
    HbrLayout,
    #[serde(rename = "Hebbal")]
    Hebbal,
    #[serde(rename = "Whitefield")]
    Whitefield,
}

impl ServiceArea {
    pub const ALL: [ServiceArea; 3] = [
        ServiceArea::HbrLayout,
        ServiceArea::Hebbal,
        ServiceArea::Whitefield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceArea::HbrLayout => "HBR Layout",
            ServiceArea::Hebbal => "Hebbal",
            ServiceArea::Whitefield => "Whitefield",
        }
    }
}

impl fmt::Display for ServiceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceArea {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceArea::ALL
            .into_iter()
            .find(|area| area.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string names no catalog entry or area
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// A service as persisted: catalog key plus price.
///
/// Stored rows may lack a usable price, so it is optional on read. Records
/// built by the form always carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Service {
    pub fn new(kind: ServiceKind, price: f64) -> Self {
        Self {
            name: kind.key().to_string(),
            price: Some(price),
        }
    }

    /// Reads one stored array element. Anything without a string `name` is
    /// skipped; a price given as numeric text is coerced.
    fn from_stored(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let price = match value.get("price") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
            _ => None,
        };
        Some(Self { name, price })
    }
}

/// Store-assigned record identifier. Integer and text keys are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => RecordId::Int(id),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

/// Insert payload for a new registration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProviderRecord {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: ServiceArea,
    pub services: Vec<Service>,
}

/// The shapes the `services` column has been seen to arrive in.
///
/// Rows written by this crate hold a JSON array; older rows hold the array
/// encoded as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredServices {
    Structured(Vec<Value>),
    Encoded(String),
    Other(Value),
}

impl Default for StoredServices {
    fn default() -> Self {
        StoredServices::Other(Value::Null)
    }
}

impl StoredServices {
    /// Structured services for every shape. Array elements keep their order;
    /// only elements without a name are dropped. Text that does not decode
    /// to an array, and any other JSON value, become an empty list.
    pub fn normalize(self) -> Vec<Service> {
        match self {
            StoredServices::Structured(items) => read_items(&items),
            StoredServices::Encoded(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Array(items)) => read_items(&items),
                Ok(other) => {
                    log::debug!("discarding services text that is not an array: {}", other);
                    Vec::new()
                }
                Err(e) => {
                    log::debug!("discarding unparsable services text: {}", e);
                    Vec::new()
                }
            },
            StoredServices::Other(_) => Vec::new(),
        }
    }
}

fn read_items(items: &[Value]) -> Vec<Service> {
    items.iter().filter_map(Service::from_stored).collect()
}

/// Text columns tolerate null, missing and non-string values.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn deserialize_services<'de, D>(deserializer: D) -> Result<Vec<Service>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StoredServices::deserialize(deserializer)?.normalize())
}

/// A registration as read back from the store
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_services")]
    pub services: Vec<Service>,
}

impl ProviderRecord {
    /// Builds the record the store would hold after inserting `record`
    pub fn from_new(id: RecordId, record: NewProviderRecord) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            address: record.address.to_string(),
            services: record.services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_keys_round_trip() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.key().parse::<ServiceKind>(), Ok(kind));
        }
        assert!("steamPress".parse::<ServiceKind>().is_err());
        assert_eq!(
            serde_json::to_value(ServiceKind::WashAndIron).unwrap(),
            json!("washAndIron")
        );
    }

    #[test]
    fn areas_parse_exact_text_only() {
        assert_eq!("HBR Layout".parse::<ServiceArea>(), Ok(ServiceArea::HbrLayout));
        assert!("hebbal".parse::<ServiceArea>().is_err());
        assert_eq!(serde_json::to_value(ServiceArea::Whitefield).unwrap(), json!("Whitefield"));
    }

    #[test]
    fn record_ids_accept_numbers_and_text() {
        let id: RecordId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id, RecordId::Int(7));
        let id: RecordId = serde_json::from_value(json!("a1b2")).unwrap();
        assert_eq!(id.to_string(), "a1b2");
        assert_eq!("12".parse::<RecordId>().unwrap(), RecordId::Int(12));
    }

    #[test]
    fn structured_services_are_kept() {
        let services: StoredServices =
            serde_json::from_value(json!([{ "name": "washOnly", "price": 50 }])).unwrap();
        assert_eq!(services.normalize(), vec![Service::new(ServiceKind::WashOnly, 50.0)]);
    }

    #[test]
    fn loosely_typed_array_items_are_kept() {
        let services: StoredServices = serde_json::from_value(json!([
            { "name": "washOnly", "price": "50" },
            { "name": "ironOnly" },
            { "name": "dryClean", "price": null },
            { "price": 10 },
            "washAndIron"
        ]))
        .unwrap();
        let services = services.normalize();
        assert_eq!(services.len(), 3);
        assert_eq!(services[0], Service::new(ServiceKind::WashOnly, 50.0));
        assert_eq!(services[1].name, "ironOnly");
        assert_eq!(services[1].price, None);
        assert_eq!(services[2].price, None);
    }

    #[test]
    fn encoded_services_are_parsed() {
        let services: StoredServices =
            serde_json::from_value(json!("[{\"name\":\"dryClean\",\"price\":120.5}]")).unwrap();
        assert_eq!(services.normalize(), vec![Service::new(ServiceKind::DryClean, 120.5)]);
    }

    #[test]
    fn encoded_empty_array_is_empty() {
        let services: StoredServices = serde_json::from_value(json!("[]")).unwrap();
        assert!(services.normalize().is_empty());
    }

    #[test]
    fn malformed_text_degrades_to_empty() {
        for text in ["[{\"name\":\"washOnly\"", "not json", "{\"name\":\"x\"}", ""] {
            let services: StoredServices = serde_json::from_value(json!(text)).unwrap();
            assert!(services.normalize().is_empty(), "{:?}", text);
        }
    }

    #[test]
    fn unexpected_json_degrades_to_empty() {
        for value in [json!(null), json!(3), json!({ "washOnly": 50 }), json!([1, 2])] {
            let services: StoredServices = serde_json::from_value(value).unwrap();
            assert!(services.normalize().is_empty());
        }
    }

    #[test]
    fn provider_rows_normalize_services_on_read() {
        let row = json!({
            "id": 3,
            "name": "Clean Co",
            "email": null,
            "phone": "9876543210",
            "address": "Hebbal",
            "services": "[{\"name\":\"ironOnly\",\"price\":15}]",
            "created_at": "2024-01-01T00:00:00Z"
        });
        let record: ProviderRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id, RecordId::Int(3));
        assert_eq!(record.email, None);
        assert_eq!(record.services, vec![Service::new(ServiceKind::IronOnly, 15.0)]);
    }

    #[test]
    fn null_text_columns_read_as_empty() {
        let row = json!({
            "id": 5, "name": null, "email": 42, "phone": 9876543210u64, "services": []
        });
        let record: ProviderRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.email.as_deref(), Some("42"));
        assert_eq!(record.phone, "9876543210");
        assert_eq!(record.address, "");
    }

    #[test]
    fn provider_rows_without_services_column() {
        let row = json!({ "id": "x", "name": "A", "phone": "1", "address": "Hebbal" });
        let record: ProviderRecord = serde_json::from_value(row).unwrap();
        assert!(record.services.is_empty());
    }

    #[test]
    fn new_record_serializes_expected_shape() {
        let record = NewProviderRecord {
            name: "Clean Co".into(),
            email: None,
            phone: "9876543210".into(),
            address: ServiceArea::Hebbal,
            services: vec![Service::new(ServiceKind::WashOnly, 50.0)],
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "Clean Co",
                "email": null,
                "phone": "9876543210",
                "address": "Hebbal",
                "services": [{ "name": "washOnly", "price": 50.0 }]
            })
        );
    }
}
