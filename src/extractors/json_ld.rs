use super::schema::{normalize_text, normalize_yields, scalar_text, SchemaRecipe};
use log::{debug, warn};
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

/// Find the first schema.org/Recipe in the page's JSON-LD scripts.
pub fn extract(document: &Html) -> Option<SchemaRecipe> {
    let selector = Selector::parse("script[type='application/ld+json']").expect("Invalid selector");

    let scripts: Vec<_> = document.select(&selector).collect();
    debug!("JsonLd: Found {} JSON-LD script tags", scripts.len());

    for (index, script) in scripts.iter().enumerate() {
        let raw_json = script.inner_html();
        let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
            Ok(json_ld) => json_ld,
            Err(_) => match serde_json::from_str::<Value>(&sanitize_json(&raw_json)) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    warn!("JsonLd: Skipping unparsable script {}: {}", index, e);
                    continue;
                }
            },
        };

        let Some(recipe_json) = find_recipe(&json_ld) else {
            debug!("JsonLd: No recipe found in script {}", index);
            continue;
        };

        match JsonLdRecipe::deserialize(recipe_json) {
            Ok(recipe) => {
                debug!("JsonLd: Found recipe in script {}", index);
                return Some(recipe.into());
            }
            Err(e) => {
                debug!("JsonLd: Failed to read recipe in script {}: {}", index, e);
            }
        }
    }

    None
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

fn find_recipe(json_ld: &Value) -> Option<&Value> {
    match json_ld {
        Value::Array(items) => items
            .iter()
            .find(|item| is_recipe_type(item))
            .or_else(|| items.iter().find_map(find_recipe))
            .or_else(|| {
                items
                    .iter()
                    .find(|item| item.get("recipeInstructions").is_some())
            }),
        Value::Object(map) => {
            if is_recipe_type(json_ld) {
                return Some(json_ld);
            }
            ["@graph", "mainEntity", "mainEntityOfPage"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(find_recipe)
        }
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<Value>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    ingredients: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<Value>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "totalTime")]
    total_time: Option<Value>,
    #[serde(rename = "prepTime")]
    prep_time: Option<Value>,
    #[serde(rename = "cookTime")]
    cook_time: Option<Value>,
    nutrition: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

// Sequence variants come before object variants: derived structs also
// accept sequences, which would swallow single-element image arrays.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageType>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Single(String),
    Multiple(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Other(Value),
}

impl ImageType {
    fn collect_urls(self, urls: &mut Vec<String>) {
        match self {
            ImageType::String(url) => urls.push(url),
            ImageType::Multiple(images) => {
                for image in images {
                    image.collect_urls(urls);
                }
            }
            ImageType::Object(image) => {
                if let Some(url) = image.url.or(image.content_url) {
                    urls.push(url);
                }
            }
            ImageType::Other(_) => {}
        }
    }
}

impl RecipeIngredients {
    fn into_lines(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            RecipeIngredients::Single(s) => s.lines().map(str::to_string).collect(),
            RecipeIngredients::Multiple(items) => items
                .iter()
                .filter_map(|item| match item {
                    // ingredient objects carry the text in "name" or "text"
                    Value::Object(obj) => obj
                        .get("text")
                        .or_else(|| obj.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    other => scalar_text(other),
                })
                .collect(),
            RecipeIngredients::Other(_) => Vec::new(),
        };

        raw.iter()
            .map(|ingredient| normalize_text(ingredient))
            .filter(|ingredient| !ingredient.is_empty())
            .collect()
    }
}

impl RecipeYield {
    fn into_yields(self) -> Option<String> {
        match self {
            RecipeYield::Number(n) => normalize_yields(&n.to_string()),
            RecipeYield::String(s) => normalize_yields(&s),
            RecipeYield::Array(values) => {
                // Prefer the descriptive entry ("15 Stück") over a bare number
                let texts: Vec<String> = values.iter().filter_map(scalar_text).collect();
                texts
                    .iter()
                    .find(|s| s.contains(char::is_alphabetic))
                    .or_else(|| texts.first())
                    .and_then(|s| normalize_yields(s))
            }
            RecipeYield::Other(_) => None,
        }
    }
}

/// Flatten HowToStep / HowToSection / nested arrays into one line per step.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            steps.extend(
                text.lines()
                    .map(normalize_text)
                    .filter(|line| !line.is_empty()),
            );
        }
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        Value::Object(obj) => {
            if let Some(items) = obj.get("itemListElement") {
                collect_steps(items, steps);
            } else if let Some(text) = obj.get("text").or_else(|| obj.get("name")) {
                collect_steps(text, steps);
            }
        }
        _ => {}
    }
}

impl From<JsonLdRecipe> for SchemaRecipe {
    fn from(recipe: JsonLdRecipe) -> Self {
        let mut images = Vec::new();
        if let Some(image) = recipe.image {
            image.collect_urls(&mut images);
        }

        let mut instructions = Vec::new();
        if let Some(value) = &recipe.recipe_instructions {
            collect_steps(value, &mut instructions);
        }

        SchemaRecipe {
            name: recipe.name.as_ref().and_then(scalar_text),
            ingredients: recipe
                .recipe_ingredient
                .or(recipe.ingredients)
                .map(RecipeIngredients::into_lines)
                .unwrap_or_default(),
            instructions,
            recipe_yield: recipe.recipe_yield.and_then(RecipeYield::into_yields),
            total_time: recipe.total_time.as_ref().and_then(scalar_text),
            prep_time: recipe.prep_time.as_ref().and_then(scalar_text),
            cook_time: recipe.cook_time.as_ref().and_then(scalar_text),
            images: images
                .into_iter()
                .map(|url| normalize_text(&url))
                .filter(|url| !url.is_empty())
                .collect(),
            nutrition: recipe.nutrition,
        }
    }
}

/// Escape raw control characters inside strings and drop trailing commas.
fn sanitize_json(json_str: &str) -> String {
    let mut result = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json_str.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    result.push(c);
                }
                '\\' => {
                    escaped = true;
                    result.push(c);
                }
                '"' => {
                    in_string = false;
                    result.push(c);
                }
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            match c {
                '"' => {
                    in_string = true;
                    result.push(c);
                }
                ']' | '}' => {
                    let trimmed_len = result.trim_end().len();
                    if result[..trimmed_len].ends_with(',') {
                        result.truncate(trimmed_len - 1);
                    }
                    result.push(c);
                }
                _ => result.push(c),
            }
        }
    }

    result.trim().to_string()
}
