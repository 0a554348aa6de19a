//! Wire model of a converted recipe.
//!
//! Deserialization is lenient about the shapes models tend to produce: numbers where
//! text is expected, numeric strings where numbers are expected, and `null` for
//! optional collections. Required fields are checked separately by
//! [`crate::extract::parse_recipe`] before the typed model is built.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_SERVINGS: u32 = 4;

/// Sentinel for `settings.temp` meaning no heating in this step.
pub const TEMP_NOT_APPLICABLE: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub prep_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_time: Option<String>,
    #[serde(default = "default_servings", deserialize_with = "servings")]
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item: String,
}

/// Ingredient quantity: either a number (`200`) or free text (`"a pinch"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Numeric value, including text that parses as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, deserialize_with = "step_number")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instruction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: StepSettings,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

/// Appliance settings for one step. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSettings {
    /// One of "Wooden Spoon", "1".."10", "Turbo".
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed: Option<String>,
    /// Degrees Celsius as text, or [`TEMP_NOT_APPLICABLE`].
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub temp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub reverse: Option<bool>,
    /// Measuring cup on the lid.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub mc: Option<bool>,
}

impl StepSettings {
    #[must_use]
    pub fn is_heated(&self) -> bool {
        self.temp
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty() && t.trim() != TEMP_NOT_APPLICABLE)
    }
}

/// Provider-agnostic response wrapper: `{"content":[{"text":"<recipe json>"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

impl Envelope {
    /// # Errors
    ///
    /// Returns an error if the recipe cannot be serialized.
    pub fn wrap(recipe: &Recipe) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![ContentBlock {
                text: Some(serde_json::to_string(recipe)?),
            }],
        })
    }

    /// All block texts joined by a single space; blocks without text count as empty.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|b| b.text.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.trim().parse::<bool>().ok(),
        _ => None,
    })
}

fn positive_whole(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n.round() < 1.0 || n.round() > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n.round() as u32)
}

fn servings<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(positive_whole)
        .unwrap_or(DEFAULT_SERVINGS))
}

fn step_number<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(positive_whole)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal(extra: Value) -> Value {
        let mut base = json!({ "name": "Soup", "ingredients": [], "steps": [] });
        if let (Some(obj), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        base
    }

    fn recipe(extra: Value) -> Recipe {
        serde_json::from_value(minimal(extra)).unwrap()
    }

    #[test]
    fn servings_defaults_when_absent() {
        assert_eq!(recipe(json!({})).servings, 4);
    }

    #[test]
    fn servings_defaults_when_non_numeric_or_not_positive() {
        assert_eq!(recipe(json!({ "servings": "a few" })).servings, 4);
        assert_eq!(recipe(json!({ "servings": 0 })).servings, 4);
        assert_eq!(recipe(json!({ "servings": -3 })).servings, 4);
        assert_eq!(recipe(json!({ "servings": null })).servings, 4);
    }

    #[test]
    fn servings_accepts_numeric_strings_and_floats() {
        assert_eq!(recipe(json!({ "servings": "6" })).servings, 6);
        assert_eq!(recipe(json!({ "servings": 2.6 })).servings, 3);
        assert_eq!(recipe(json!({ "servings": 8 })).servings, 8);
    }

    #[test]
    fn settings_accept_numbers_as_text() {
        let r = recipe(json!({
            "steps": [{
                "stepNumber": 1,
                "title": "Chop",
                "instruction": "Chop onion",
                "settings": { "speed": 5, "temp": 100, "time": "0:05", "reverse": false, "mc": "true" }
            }]
        }));
        let s = &r.steps[0].settings;
        assert_eq!(s.speed.as_deref(), Some("5"));
        assert_eq!(s.temp.as_deref(), Some("100"));
        assert_eq!(s.reverse, Some(false));
        assert_eq!(s.mc, Some(true));
        assert!(s.is_heated());
    }

    #[test]
    fn null_settings_and_tips_become_defaults() {
        let r = recipe(json!({
            "tips": null,
            "steps": [{ "stepNumber": "2", "title": "Rest", "instruction": "Wait", "settings": null }]
        }));
        assert!(r.tips.is_empty());
        assert_eq!(r.steps[0].step_number, 2);
        assert_eq!(r.steps[0].settings, StepSettings::default());
    }

    #[test]
    fn temp_sentinel_is_not_heated() {
        let s = StepSettings {
            temp: Some(TEMP_NOT_APPLICABLE.into()),
            ..StepSettings::default()
        };
        assert!(!s.is_heated());
        assert!(!StepSettings::default().is_heated());
    }

    #[test]
    fn amount_number_or_text() {
        let r = recipe(json!({
            "ingredients": [
                { "amount": 200, "unit": "g", "item": "flour" },
                { "amount": "a pinch", "item": "salt" },
                { "item": "pepper" }
            ]
        }));
        assert_eq!(r.ingredients[0].amount, Some(Amount::Number(200.0)));
        assert_eq!(r.ingredients[1].amount, Some(Amount::Text("a pinch".into())));
        assert_eq!(r.ingredients[1].unit, None);
        assert_eq!(r.ingredients[2].amount, None);
    }

    #[test]
    fn integral_amount_serializes_without_fraction() {
        assert_eq!(serde_json::to_string(&Amount::Number(200.0)).unwrap(), "200");
        assert_eq!(serde_json::to_string(&Amount::Number(1.5)).unwrap(), "1.5");
        assert_eq!(Amount::Number(200.0).to_string(), "200");
        assert_eq!(Amount::Text("½".into()).as_number(), None);
        assert_eq!(Amount::Text(" 2 ".into()).as_number(), Some(2.0));
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let r = recipe(json!({ "prepTime": "10 min", "totalTime": 30 }));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["prepTime"], "10 min");
        assert_eq!(v["totalTime"], "30");
        assert_eq!(v["servings"], 4);
        assert!(v.get("tips").is_none());
    }

    #[test]
    fn envelope_wraps_single_text_block() {
        let r = recipe(json!({}));
        let env = Envelope::wrap(&r).unwrap();
        assert_eq!(env.content.len(), 1);
        let back: Recipe = serde_json::from_str(env.content[0].text.as_ref().unwrap()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn envelope_joins_texts_with_space() {
        let env: Envelope =
            serde_json::from_value(json!({ "content": [{ "text": "a" }, {}, { "text": "b" }] }))
                .unwrap();
        assert_eq!(env.joined_text(), "a  b");
        let empty: Envelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.joined_text(), "");
    }
}
