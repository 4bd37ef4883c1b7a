use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as the store hands it back: an id plus free-form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Field as text, empty when missing
    ///
    /// Numbers are rendered as text since spreadsheet cells and hand-entered
    /// documents are not consistent about types.
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Field as an integer, zero when missing or unparseable
    pub fn integer(&self, key: &str) -> i64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// Surplus food offered by a donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationOffer {
    pub id: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: String,
    #[serde(rename = "expiryTime")]
    pub expiry_time_hours: i64,
    pub location: String,
    pub timestamp: String,
}

impl DonationOffer {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            food_type: doc.text("foodType"),
            quantity: doc.text("quantity"),
            expiry_time_hours: doc.integer("expiryTime"),
            location: doc.text("location"),
            timestamp: doc.text("timestamp"),
        }
    }
}

/// Food need published by an NGO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgoRequest {
    pub id: String,
    #[serde(rename = "ngoName")]
    pub ngo_name: String,
    #[serde(rename = "foodNeeded")]
    pub food_needed: String,
    pub location: String,
    pub timestamp: String,
}

impl NgoRequest {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            ngo_name: doc.text("ngoName"),
            food_needed: doc.text("foodNeeded"),
            location: doc.text("location"),
            timestamp: doc.text("timestamp"),
        }
    }
}

/// Latitude/longitude pair in decimal degrees
///
/// Serialized as `[latitude, longitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite, latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(c: Coordinates) -> Self {
        (c.latitude, c.longitude)
    }
}

/// Donor half of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedDonor {
    pub id: String,
    pub food_type: String,
    pub quantity: String,
    pub expiry_time_hours: i64,
    pub location: String,
    pub coordinates: Coordinates,
    pub timestamp: String,
}

/// NGO half of a match, with its distance from the donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedNgo {
    pub id: String,
    pub ngo_name: String,
    pub food_needed: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub distance_km: f64,
    pub timestamp: String,
}

/// One donor paired with its nearest geocoded NGO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub donor: MatchedDonor,
    pub matched_ngo: MatchedNgo,
}
