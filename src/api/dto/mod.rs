/*
 * Responsibility
 * - Request DTOs decoded from the parsed body map, one file per resource
 * - validate() returns the client-facing 400 message
 * - Field decoding is lenient: a value of the wrong JSON type reads as absent,
 *   so handlers answer with their own "x is required" message instead of a
 *   generic decode error
 */
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod donor;
pub mod ngo;
pub mod recurring;

/// Non-empty, trimmed string; anything else is `None`.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Tri-state text for patch bodies:
/// - None: field missing (do not update)
/// - Some(None): null or blank (clear)
/// - Some(Some(v)): set value
pub(crate) fn deserialize_patch_text<'de, D>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// `true`, `"true"`; everything else is false.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// A money field as the client sent it. Numbers and numeric strings are
/// accepted (`50`, `"50.5"`); anything else present is `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Value(f64),
    Invalid,
}

impl Amount {
    pub fn positive(self) -> Option<f64> {
        match self {
            Amount::Value(v) if v.is_finite() && v > 0.0 => Some(v),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64().map_or(Amount::Invalid, Amount::Value),
            Value::String(s) => s.trim().parse::<f64>().map_or(Amount::Invalid, Amount::Value),
            _ => Amount::Invalid,
        })
    }
}

/// Body of the image upload routes: `{"image": "data:image/png;base64,..."}`.
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub image: Option<String>,
}

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_text")]
        name: Option<String>,
        #[serde(default)]
        amount: Option<Amount>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        anonymous: bool,
        #[serde(default, deserialize_with = "deserialize_patch_text")]
        end_date: Option<Option<String>>,
    }

    fn sample(v: Value) -> Sample {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn wrong_types_read_as_absent() {
        let p = sample(json!({"name": 42, "anonymous": "yes"}));
        assert_eq!(p.name, None);
        assert!(!p.anonymous);
        assert_eq!(p.amount, None);
        assert_eq!(p.end_date, None);

        assert_eq!(sample(json!({"name": "   "})).name, None);
        assert_eq!(sample(json!({"name": " Ada "})).name.as_deref(), Some("Ada"));
    }

    #[test]
    fn amounts_accept_numeric_strings() {
        assert_eq!(sample(json!({"amount": 50})).amount, Some(Amount::Value(50.0)));
        assert_eq!(sample(json!({"amount": "12.5"})).amount, Some(Amount::Value(12.5)));
        assert_eq!(sample(json!({"amount": "ten"})).amount, Some(Amount::Invalid));
        assert_eq!(sample(json!({"amount": null})).amount, None);

        assert_eq!(Amount::Value(-1.0).positive(), None);
        assert_eq!(Amount::Value(0.0).positive(), None);
        assert_eq!(Amount::Value(f64::INFINITY).positive(), None);
        assert_eq!(Amount::Value(3.0).positive(), Some(3.0));
    }

    #[test]
    fn patch_text_distinguishes_null_from_missing() {
        assert_eq!(sample(json!({})).end_date, None);
        assert_eq!(sample(json!({"end_date": null})).end_date, Some(None));
        assert_eq!(
            sample(json!({"end_date": "2030-01-01T00:00:00Z"})).end_date,
            Some(Some("2030-01-01T00:00:00Z".to_string()))
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@@x.com"));
        assert!(!is_valid_email("a@.com"));
    }
}
