//! Recovery of a recipe object from free-form model output.
//!
//! The scan is deliberately greedy: it spans from the first `{` to the last `}` of the
//! whole text. Commentary containing braces outside the object breaks it; a
//! balanced-brace scanner would change which inputs are accepted.

use serde_json::Value;

use crate::error::{ConvertError, ExtractError};
use crate::recipe::Recipe;

const FENCE_MARKERS: [&str; 2] = ["```json", "```"];
const REQUIRED_FIELDS: [&str; 3] = ["name", "ingredients", "steps"];

/// Return the JSON candidate embedded in `text`, with code-fence markers removed.
///
/// # Errors
///
/// Returns [`ExtractError::NoObject`] when the text has no `{` followed by a `}`.
pub fn extract_json_candidate(text: &str) -> Result<String, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoObject)?;
    let end = text.rfind('}').ok_or(ExtractError::NoObject)?;
    if end < start {
        return Err(ExtractError::NoObject);
    }

    let mut candidate = text[start..=end].to_owned();
    for marker in FENCE_MARKERS {
        candidate = candidate.replace(marker, "");
    }
    Ok(candidate.trim().to_owned())
}

/// Extract, parse and shape-check a recipe from raw provider output.
///
/// # Errors
///
/// [`ConvertError::MalformedResponse`] if no JSON object can be parsed,
/// [`ConvertError::InvalidRecipeShape`] if `name`, `ingredients` or `steps` is missing
/// or the object does not fit the recipe model.
pub fn parse_recipe(text: &str) -> Result<Recipe, ConvertError> {
    let candidate = extract_json_candidate(text)?;
    let value: Value = serde_json::from_str(&candidate)
        .map_err(|e| ConvertError::MalformedResponse(e.to_string()))?;

    let missing = missing_fields(&value);
    if !missing.is_empty() {
        return Err(ConvertError::InvalidRecipeShape(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value).map_err(|e| ConvertError::InvalidRecipeShape(e.to_string()))
}

fn missing_fields(value: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| match value.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => *field == "name" && s.trim().is_empty(),
            Some(_) => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MINIMAL: &str = r#"{"name":"X","ingredients":[],"steps":[]}"#;

    #[test]
    fn fenced_response_with_commentary() {
        let text = "Here you go:\n```json\n{\"name\":\"X\",\"ingredients\":[],\"steps\":[]}\n```\nEnjoy!";
        assert_eq!(extract_json_candidate(text).unwrap(), MINIMAL);
        let recipe = parse_recipe(text).unwrap();
        assert_eq!(recipe.name, "X");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
    }

    #[test]
    fn bare_object_is_returned_unchanged() {
        assert_eq!(extract_json_candidate(MINIMAL).unwrap(), MINIMAL);
    }

    #[test]
    fn no_braces_is_malformed() {
        assert_eq!(
            extract_json_candidate("Sorry, I cannot access that page."),
            Err(ExtractError::NoObject)
        );
        assert!(matches!(
            parse_recipe("Sorry, I cannot access that page."),
            Err(ConvertError::MalformedResponse(_))
        ));
    }

    #[test]
    fn closing_before_opening_is_malformed() {
        assert_eq!(extract_json_candidate("} then {"), Err(ExtractError::NoObject));
    }

    #[test]
    fn empty_text_is_malformed() {
        assert!(matches!(
            parse_recipe(""),
            Err(ConvertError::MalformedResponse(_))
        ));
    }

    #[test]
    fn greedy_scan_spans_stray_braces() {
        let text = "{note} then {\"name\":\"X\"}";
        assert_eq!(extract_json_candidate(text).unwrap(), text);
        assert!(matches!(
            parse_recipe(text),
            Err(ConvertError::MalformedResponse(_))
        ));
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        let text = r#"Result: {"name":"X","ingredients":[{"amount":1,"item":"egg"}],"steps":[{"stepNumber":1,"settings":{"speed":"4"}}]} done"#;
        let recipe = parse_recipe(text).unwrap();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.steps[0].settings.speed.as_deref(), Some("4"));
    }

    #[test]
    fn missing_required_fields_fail_shape_validation() {
        let err = parse_recipe(r#"{"name":"X","steps":[]}"#).unwrap_err();
        match err {
            ConvertError::InvalidRecipeShape(msg) => assert!(msg.contains("ingredients")),
            other => panic!("expected InvalidRecipeShape, got {other:?}"),
        }

        let err = parse_recipe(r#"{"ingredients":null,"steps":[]}"#).unwrap_err();
        match err {
            ConvertError::InvalidRecipeShape(msg) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("ingredients"));
                assert!(!msg.contains("steps"));
            }
            other => panic!("expected InvalidRecipeShape, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_fails_shape_validation() {
        assert!(matches!(
            parse_recipe(r#"{"name":"  ","ingredients":[],"steps":[]}"#),
            Err(ConvertError::InvalidRecipeShape(_))
        ));
    }

    #[test]
    fn wrong_field_types_fail_shape_validation() {
        assert!(matches!(
            parse_recipe(r#"{"name":"X","ingredients":"flour","steps":[]}"#),
            Err(ConvertError::InvalidRecipeShape(_))
        ));
    }

    #[test]
    fn invalid_json_inside_braces_is_malformed() {
        assert!(matches!(
            parse_recipe("{name: X, ingredients: []}"),
            Err(ConvertError::MalformedResponse(_))
        ));
    }

    proptest! {
        #[test]
        fn recovers_object_from_any_brace_free_wrapper(
            prefix in "[^{}]{0,40}",
            suffix in "[^{}]{0,40}",
            fenced in any::<bool>(),
        ) {
            let body = if fenced {
                format!("```json\n{MINIMAL}\n```")
            } else {
                MINIMAL.to_owned()
            };
            let text = format!("{prefix}{body}{suffix}");
            prop_assert_eq!(extract_json_candidate(&text).unwrap(), MINIMAL);
            prop_assert_eq!(parse_recipe(&text).unwrap().name, "X");
        }

        #[test]
        fn recovers_generated_recipe_with_braces_in_strings(
            name in "[A-Za-z][A-Za-z0-9 {}]{0,24}",
            ingredients in prop::collection::vec((1u32..2000, "[a-z]{1,10}"), 0..6),
            titles in prop::collection::vec("[A-Za-z {}]{1,16}", 0..6),
            prefix in "[^{}]{0,40}",
            suffix in "[^{}]{0,40}",
            fenced in any::<bool>(),
        ) {
            let object = serde_json::json!({
                "name": name,
                "servings": 2,
                "ingredients": ingredients
                    .iter()
                    .map(|(amount, item)| serde_json::json!({"amount": amount, "unit": "g", "item": item}))
                    .collect::<Vec<_>>(),
                "steps": titles
                    .iter()
                    .enumerate()
                    .map(|(i, title)| serde_json::json!({"stepNumber": i + 1, "title": title}))
                    .collect::<Vec<_>>(),
            })
            .to_string();
            let body = if fenced {
                format!("```json\n{object}\n```")
            } else {
                object.clone()
            };
            let text = format!("{prefix}{body}{suffix}");

            prop_assert_eq!(extract_json_candidate(&text).unwrap(), object);
            let recipe = parse_recipe(&text).unwrap();
            prop_assert_eq!(&recipe.name, &name);
            prop_assert_eq!(recipe.ingredients.len(), ingredients.len());
            prop_assert_eq!(recipe.steps.len(), titles.len());
            for (step, title) in recipe.steps.iter().zip(&titles) {
                prop_assert_eq!(&step.title, title);
            }
        }
    }
}
