use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// CRM lead with property-seeking preferences (demand side).
///
/// Every preference field is optional: absence means "no preference" and must
/// never exclude a candidate on its own. Numeric fields are stored loosely in
/// the CRM (number or string), so they are coerced here at the serde boundary
/// rather than inside the matching logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    /// Creation timestamp, epoch milliseconds.
    #[serde(rename = "createdAt", default, deserialize_with = "de_millis")]
    pub created_at: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(rename = "typeContact", default, deserialize_with = "de_opt_string")]
    pub type_contact: Option<String>,
    /// Legacy alias of `typeContact`; older documents carry one or the other.
    #[serde(rename = "contactType", default, deserialize_with = "de_opt_string")]
    pub contact_type: Option<String>,
    #[serde(rename = "contactStage", default, deserialize_with = "de_opt_string")]
    pub contact_stage: Option<String>,
    /// Desired property type (`selecTP`), e.g. "Casa".
    #[serde(rename = "selecTP", default, deserialize_with = "de_opt_string")]
    pub desired_type: Option<String>,
    /// Desired operation type (`selecTO`): "sale" or "rental".
    #[serde(rename = "selecTO", default, deserialize_with = "de_opt_string")]
    pub desired_operation: Option<String>,
    #[serde(rename = "numBeds", default, deserialize_with = "de_opt_count")]
    pub min_bedrooms: Option<u32>,
    #[serde(rename = "numBaths", default, deserialize_with = "de_opt_count")]
    pub min_bathrooms: Option<u32>,
    #[serde(rename = "numParks", default, deserialize_with = "de_opt_count")]
    pub min_parking: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub budget: Option<f64>,
    /// Pre-classified price bracket label (`rangeProp`), used when no precise
    /// budget was captured. Historical documents mix casing.
    #[serde(rename = "rangeProp", default, deserialize_with = "de_opt_string")]
    pub price_range: Option<String>,
    #[serde(rename = "locaProperty", default)]
    pub desired_locations: Vec<String>,
    #[serde(rename = "tagsProperty", default)]
    pub desired_features: Vec<String>,
}

impl Contact {
    /// Lead type, whichever of the two historical fields is populated.
    pub fn lead_type(&self) -> Option<&str> {
        non_blank(&self.type_contact).or_else(|| non_blank(&self.contact_type))
    }

    pub fn wanted_property_type(&self) -> Option<&str> {
        non_blank(&self.desired_type)
    }

    pub fn wanted_operation(&self) -> Option<&str> {
        non_blank(&self.desired_operation)
    }

    /// Numeric budget, only when usable (finite and positive).
    pub fn effective_budget(&self) -> Option<f64> {
        self.budget.filter(|b| b.is_finite() && *b > 0.0)
    }

    /// Bracket label normalized to canonical lowercase.
    pub fn normalized_range(&self) -> Option<String> {
        non_blank(&self.price_range).map(|r| r.to_lowercase())
    }

    /// Desired zone tokens, lowercased with blanks dropped.
    pub fn wanted_locations(&self) -> Vec<String> {
        lowercase_non_blank(&self.desired_locations)
    }

    /// Desired feature tags, lowercased with blanks dropped.
    pub fn wanted_features(&self) -> Vec<String> {
        lowercase_non_blank(&self.desired_features)
    }

    pub fn stage(&self) -> &str {
        non_blank(&self.contact_stage).unwrap_or("")
    }
}

/// Listed property (supply side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub public_id: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub property_type: Option<String>,
    /// Operation type: "sale" or "rental".
    #[serde(
        rename = "selecTO",
        alias = "operation_type",
        default,
        deserialize_with = "de_opt_string"
    )]
    pub operation_type: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub bedrooms: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub bathrooms: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub parking_spaces: u32,
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
    /// Listing operations as imported from EasyBroker; only the first entry's
    /// amount is meaningful for matching.
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Free-form tag list mixing zone tokens and feature tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Property {
    /// Canonical asking price: the flat `price` field when present, otherwise
    /// the first operation's amount (the imported listing shape).
    pub fn list_price(&self) -> f64 {
        if self.price > 0.0 {
            self.price
        } else {
            self.operations.first().map(|op| op.amount).unwrap_or(0.0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "type", default, deserialize_with = "de_opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn lowercase_non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

// --- boundary coercion -------------------------------------------------------
//
// CRM documents store numerics inconsistently (42, "42", "1,500,000", "").
// Unparseable values coerce to "absent", never to an error.

fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_count(value: &Value) -> Option<u32> {
    coerce_amount(value).filter(|f| *f >= 0.0).map(|f| f as u32)
}

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value).unwrap_or(0.0))
}

fn de_opt_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value).unwrap_or(0))
}

fn de_opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

fn de_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let millis = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(millis.unwrap_or(0))
}

fn de_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
