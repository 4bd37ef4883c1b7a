use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// First problem found with a create request, by wire field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing(&'static str),
    Invalid(&'static str),
}

/// Create requests whose required fields are reported one at a time, in a fixed order
pub trait RequiredFields: Validate {
    /// `(wire name, struct field name)` in reporting order
    const REQUIRED: &'static [(&'static str, &'static str)];

    /// Values that pass validation but still count as not provided
    fn is_blank(&self, _field: &str) -> bool {
        false
    }

    fn check(&self) -> Result<(), FieldProblem> {
        let errors = self.validate().err();

        for &(wire, field) in Self::REQUIRED {
            if let Some(problem) = errors.as_ref().and_then(|e| problem_for(e, wire, field)) {
                return Err(problem);
            }
            if self.is_blank(wire) {
                return Err(FieldProblem::Missing(wire));
            }
        }

        Ok(())
    }
}

fn problem_for(errors: &ValidationErrors, wire: &'static str, field: &str) -> Option<FieldProblem> {
    let field_errors = errors.field_errors();
    let failures = field_errors.get(wire).or_else(|| field_errors.get(field))?;

    let out_of_range = failures.iter().any(|e| e.code == "range");
    Some(if out_of_range {
        FieldProblem::Invalid(wire)
    } else {
        FieldProblem::Missing(wire)
    })
}

/// Request to register a food donation
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateDonationRequest {
    #[validate(required, length(min = 1))]
    #[serde(rename = "foodType", default)]
    pub food_type: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub quantity: Option<String>,
    #[validate(required, range(min = 0))]
    #[serde(rename = "expiryTime", default, deserialize_with = "lenient_int")]
    pub expiry_time: Option<i64>,
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub location: Option<String>,
}

impl RequiredFields for CreateDonationRequest {
    const REQUIRED: &'static [(&'static str, &'static str)] = &[
        ("foodType", "food_type"),
        ("quantity", "quantity"),
        ("expiryTime", "expiry_time"),
        ("location", "location"),
    ];

    // zero hours is treated the same as an absent expiry
    fn is_blank(&self, field: &str) -> bool {
        field == "expiryTime" && self.expiry_time == Some(0)
    }
}

impl CreateDonationRequest {
    /// Store fields for a checked request
    pub fn into_fields(self, timestamp: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("foodType".into(), Value::from(self.food_type.unwrap_or_default()));
        fields.insert("quantity".into(), Value::from(self.quantity.unwrap_or_default()));
        fields.insert("expiryTime".into(), Value::from(self.expiry_time.unwrap_or_default()));
        fields.insert("location".into(), Value::from(self.location.unwrap_or_default()));
        fields.insert("timestamp".into(), Value::from(timestamp));
        fields
    }
}

/// Request to register an NGO's food need
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateNgoRequest {
    #[validate(required, length(min = 1))]
    #[serde(rename = "ngoName", default)]
    pub ngo_name: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(rename = "foodNeeded", default)]
    pub food_needed: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub location: Option<String>,
}

impl RequiredFields for CreateNgoRequest {
    const REQUIRED: &'static [(&'static str, &'static str)] = &[
        ("ngoName", "ngo_name"),
        ("foodNeeded", "food_needed"),
        ("location", "location"),
    ];
}

impl CreateNgoRequest {
    pub fn into_fields(self, timestamp: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("ngoName".into(), Value::from(self.ngo_name.unwrap_or_default()));
        fields.insert("foodNeeded".into(), Value::from(self.food_needed.unwrap_or_default()));
        fields.insert("location".into(), Value::from(self.location.unwrap_or_default()));
        fields.insert("timestamp".into(), Value::from(timestamp));
        fields
    }
}

/// Accepts `48`, `48.5`, `"48"`, `"48.5"` or null, truncating decimals; anything else reads as absent
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64),
        _ => None,
    })
}
