use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Top-level request body: `{"request": {...}}`.
///
/// Keys are matched case-insensitively, so `Request`, `Email` and
/// `firstname` all land on their fields. Serde names are the lowercase forms.
#[derive(Debug, Default, Deserialize)]
pub struct GenericSchema {
    #[serde(default)]
    pub request: Option<CustomerPayload>,
}

impl GenericSchema {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(fold_keys(value, true))
    }
}

// Lowercases object keys of the envelope and, one level down, of `request`.
fn fold_keys(value: Value, descend: bool) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = key.to_lowercase();
                    let value = if descend && key == "request" {
                        fold_keys(value, false)
                    } else {
                        value
                    };
                    (key, value)
                })
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomerPayload {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(rename = "firstname", deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(rename = "lastname", deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub number: String,
    #[serde(rename = "jwttoken", deserialize_with = "null_as_empty")]
    pub jwt_token: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub mobile: String,
}

/// `null` leaves a string field empty instead of failing the decode.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CustomerPayload {
    /// Looks up a field by its template name (`.Email`, `.Number`, ...).
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "Email" => &self.email,
            "FirstName" => &self.first_name,
            "LastName" => &self.last_name,
            "Number" => &self.number,
            "JwtToken" => &self.jwt_token,
            "Address" => &self.address,
            "Mobile" => &self.mobile,
            _ => return None,
        };
        Some(value.as_str())
    }
}

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "ERROR";

/// Outcome envelope returned to every publish caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub name: String,
    #[serde(rename = "statuscode")]
    pub status_code: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    pub fn success(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status_code: "200".to_string(),
            status: STATUS_OK.to_string(),
            message: message.into(),
            payload: None,
        }
    }

    pub fn error(name: &str, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status_code: status_code.to_string(),
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            payload: None,
        }
    }
}

#[derive(Serialize)]
pub struct IsAliveResponse {
    pub version: String,
    pub name: String,
}
