use html_escape::decode_html_entities;
use serde_json::Value;
use std::collections::BTreeMap;

/// A schema.org/Recipe as found in the page, from either JSON-LD or microdata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRecipe {
    pub name: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub recipe_yield: Option<String>,
    pub total_time: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub images: Vec<String>,
    pub nutrition: Option<Value>,
}

impl SchemaRecipe {
    /// Total time in minutes, falling back to prep + cook time.
    pub fn total_minutes(&self) -> Option<u32> {
        if let Some(total) = self.total_time.as_deref().and_then(parse_minutes) {
            return Some(total);
        }

        let prep = self.prep_time.as_deref().and_then(parse_minutes);
        let cook = self.cook_time.as_deref().and_then(parse_minutes);
        match (prep, cook) {
            (None, None) => None,
            (prep, cook) => prep.unwrap_or(0).checked_add(cook.unwrap_or(0)),
        }
    }

    /// Nutrition facts as name -> value, skipping `@type` and friends.
    pub fn nutrients(&self) -> Result<BTreeMap<String, String>, String> {
        let mut nutrients = BTreeMap::new();
        match &self.nutrition {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    if key.starts_with('@') {
                        continue;
                    }
                    if let Some(text) = scalar_text(value) {
                        nutrients.insert(key.clone(), text);
                    }
                }
            }
            Some(other) => {
                return Err(format!("unexpected nutrition value: {other}"));
            }
        }
        Ok(nutrients)
    }
}

/// Decode HTML entities and collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    // some sites double-encode entities (&amp;#39;)
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of a string or number value.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let text = normalize_text(s);
            (!text.is_empty()).then_some(text)
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(scalar_text),
        _ => None,
    }
}

/// Normalize a recipe yield: a bare number becomes "N servings".
pub fn normalize_yields(raw: &str) -> Option<String> {
    let text = normalize_text(raw);
    if text.is_empty() {
        return None;
    }

    match whole_number(&text) {
        Some(n) => Some(format!("{} serving{}", n, if n == 1 { "" } else { "s" })),
        None => Some(text),
    }
}

/// `"12"` or `"12.0"`; exponents, signs and out-of-range values are not counts.
fn whole_number(text: &str) -> Option<u64> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b == b'0')
    {
        return None;
    }
    whole.parse().ok()
}

/// Convert an ISO 8601 duration (or a bare number of minutes) to minutes.
///
/// Handles `PT1H30M`, `P0DT45M`, `PT5400.0S` and ranges like `PT15-20M`,
/// where the upper bound wins.
pub fn parse_minutes(duration: &str) -> Option<u32> {
    let duration = duration.trim();
    if let Ok(minutes) = duration.parse::<u32>() {
        return Some(minutes);
    }

    let rest = duration
        .strip_prefix('P')
        .or_else(|| duration.strip_prefix('p'))?;

    let mut minutes = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut matched = false;

    for c in rest.chars() {
        match c.to_ascii_uppercase() {
            'T' => in_time = true,
            c if c.is_ascii_digit() || c == '.' || c == '-' => number.push(c),
            designator => {
                let value = number
                    .rsplit('-')
                    .next()
                    .and_then(|n| n.parse::<f64>().ok());
                number.clear();
                let Some(value) = value else {
                    continue;
                };
                let factor = match (designator, in_time) {
                    ('W', false) => 7.0 * 24.0 * 60.0,
                    ('D', false) => 24.0 * 60.0,
                    ('H', true) => 60.0,
                    ('M', true) => 1.0,
                    ('S', true) => 1.0 / 60.0,
                    _ => continue,
                };
                minutes += value * factor;
                matched = true;
            }
        }
    }

    let minutes = minutes.round();
    if !matched || !minutes.is_finite() || minutes < 0.0 || minutes > f64::from(u32::MAX) {
        return None;
    }
    Some(minutes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("PT30M"), Some(30));
        assert_eq!(parse_minutes("PT1H"), Some(60));
        assert_eq!(parse_minutes("PT1H30M"), Some(90));
        assert_eq!(parse_minutes("PT90M"), Some(90));
        assert_eq!(parse_minutes("P0DT45M"), Some(45));
        assert_eq!(parse_minutes("P1DT2H"), Some(1560));
        assert_eq!(parse_minutes("pt20m"), Some(20));
        assert_eq!(parse_minutes("45"), Some(45));
        // ranges take the upper bound
        assert_eq!(parse_minutes("PT15-20M"), Some(20));
        // seconds
        assert_eq!(parse_minutes("PT5400S"), Some(90));
        assert_eq!(parse_minutes("PT5400.0S"), Some(90));
        assert_eq!(parse_minutes("PT0S"), Some(0));
    }

    #[test]
    fn test_parse_minutes_rejects_garbage() {
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("invalid"), None);
        assert_eq!(parse_minutes("PT"), None);
        assert_eq!(parse_minutes("about an hour"), None);
    }

    #[test]
    fn test_total_minutes_falls_back_to_prep_and_cook() {
        let recipe = SchemaRecipe {
            prep_time: Some("PT15M".to_string()),
            cook_time: Some("PT1H".to_string()),
            ..Default::default()
        };
        assert_eq!(recipe.total_minutes(), Some(75));

        let recipe = SchemaRecipe {
            total_time: Some("PT25M".to_string()),
            prep_time: Some("PT15M".to_string()),
            ..Default::default()
        };
        assert_eq!(recipe.total_minutes(), Some(25));

        assert_eq!(SchemaRecipe::default().total_minutes(), None);
    }

    #[test]
    fn test_total_minutes_overflow_is_unknown() {
        let recipe = SchemaRecipe {
            prep_time: Some("4294967295".to_string()),
            cook_time: Some("PT1M".to_string()),
            ..Default::default()
        };
        assert_eq!(recipe.total_minutes(), None);

        let recipe = SchemaRecipe {
            total_time: Some("PT99999999999H".to_string()),
            prep_time: Some("PT10M".to_string()),
            ..Default::default()
        };
        assert_eq!(recipe.total_minutes(), Some(10));
    }

    #[test]
    fn test_parse_minutes_rejects_out_of_range() {
        assert_eq!(parse_minutes("PT99999999999H"), None);
        assert_eq!(parse_minutes("P99999999999W"), None);
        assert_eq!(parse_minutes("PT4294967295M"), Some(u32::MAX));
    }

    #[test]
    fn test_normalize_yields() {
        assert_eq!(normalize_yields("4"), Some("4 servings".to_string()));
        assert_eq!(normalize_yields("1"), Some("1 serving".to_string()));
        assert_eq!(normalize_yields("6.0"), Some("6 servings".to_string()));
        assert_eq!(
            normalize_yields(" 24  cookies "),
            Some("24 cookies".to_string())
        );
        assert_eq!(normalize_yields("   "), None);
    }

    #[test]
    fn test_normalize_yields_only_rewrites_plain_counts() {
        assert_eq!(normalize_yields("1e30"), Some("1e30".to_string()));
        assert_eq!(normalize_yields("-2"), Some("-2".to_string()));
        assert_eq!(normalize_yields("2.5"), Some("2.5".to_string()));
        assert_eq!(
            normalize_yields("99999999999999999999999"),
            Some("99999999999999999999999".to_string())
        );
    }

    #[test]
    fn test_normalize_text_decodes_entities() {
        assert_eq!(normalize_text("Mac &amp; Cheese"), "Mac & Cheese");
        assert_eq!(normalize_text("Mom&amp;#39;s  \n pie"), "Mom's pie");
    }

    #[test]
    fn test_nutrients_skip_type_and_stringify_numbers() {
        let recipe = SchemaRecipe {
            nutrition: Some(json!({
                "@type": "NutritionInformation",
                "calories": "240 kcal",
                "proteinContent": 12,
                "fatContent": null
            })),
            ..Default::default()
        };

        let nutrients = recipe.nutrients().unwrap();
        assert_eq!(nutrients.len(), 2);
        assert_eq!(nutrients["calories"], "240 kcal");
        assert_eq!(nutrients["proteinContent"], "12");
    }

    #[test]
    fn test_nutrients_reject_non_object() {
        let recipe = SchemaRecipe {
            nutrition: Some(json!("lots")),
            ..Default::default()
        };
        assert!(recipe.nutrients().is_err());
        assert!(SchemaRecipe::default().nutrients().unwrap().is_empty());
    }
}
