use super::schema::{normalize_text, normalize_yields, SchemaRecipe};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    // Look for elements with itemscope and itemtype containing "Recipe"
    let selector = Selector::parse("[itemscope][itemtype]").expect("Invalid selector");
    for element in document.select(&selector) {
        if let Some(itemtype) = element.value().attr("itemtype") {
            if itemtype.contains("schema.org/Recipe")
                || itemtype.contains("data-vocabulary.org/Recipe")
            {
                return Some(element);
            }
        }
    }
    None
}

fn itemprop_selector(prop: &str) -> Option<Selector> {
    Selector::parse(&format!("[itemprop='{prop}']")).ok()
}

/// Whether `element` is a property of `scope` itself rather than of a nested
/// item such as an author or a review.
fn in_scope(scope: ElementRef, element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
        .is_some_and(|owner| owner.id() == scope.id())
}

/// The value of a microdata element: `content`/`datetime` attributes win over text.
fn element_value(element: ElementRef) -> String {
    let attrs = element.value();
    attrs
        .attr("content")
        .or_else(|| attrs.attr("datetime"))
        .map(normalize_text)
        .unwrap_or_else(|| normalize_text(&element.text().collect::<Vec<_>>().join(" ")))
}

fn get_itemprop(root: ElementRef, prop: &str) -> Option<String> {
    let selector = itemprop_selector(prop)?;
    root.select(&selector)
        .filter(|element| in_scope(root, *element))
        .map(element_value)
        .find(|value| !value.is_empty())
}

fn get_itemprop_list(root: ElementRef, prop: &str) -> Vec<String> {
    let Some(selector) = itemprop_selector(prop) else {
        return Vec::new();
    };
    root.select(&selector)
        .filter(|element| in_scope(root, *element))
        .map(element_value)
        .filter(|value| !value.is_empty())
        .collect()
}

fn get_image(root: ElementRef) -> Option<String> {
    let selector = itemprop_selector("image")?;
    let element = root
        .select(&selector)
        .find(|element| in_scope(root, *element))?;
    let attrs = element.value();
    attrs
        .attr("src")
        .or_else(|| attrs.attr("href"))
        .or_else(|| attrs.attr("content"))
        .map(str::to_string)
        .or_else(|| Some(element_value(element)).filter(|text| !text.is_empty()))
}

fn get_nutrition(root: ElementRef) -> Option<Value> {
    let selector = itemprop_selector("nutrition")?;
    let container = root
        .select(&selector)
        .find(|element| in_scope(root, *element))?;
    let props = Selector::parse("[itemprop]").ok()?;

    let mut nutrition = Map::new();
    for element in container.select(&props) {
        if element.id() == container.id() {
            continue;
        }
        if let Some(name) = element.value().attr("itemprop") {
            let value = element_value(element);
            if !value.is_empty() {
                nutrition.insert(name.to_string(), Value::String(value));
            }
        }
    }
    Some(Value::Object(nutrition))
}

/// Read a schema.org/Recipe from microdata attributes.
///
/// A Recipe container is required; page-wide itemprops pick up unrelated
/// content (site title, author bio, ads).
pub fn extract(document: &Html) -> Option<SchemaRecipe> {
    debug!("Microdata: Looking for a Recipe container");
    let container = find_recipe_container(document)?;

    // Try 'recipeIngredient' and the legacy 'ingredients'
    let mut ingredients = get_itemprop_list(container, "recipeIngredient");
    if ingredients.is_empty() {
        ingredients = get_itemprop_list(container, "ingredients");
    }

    let mut instructions = get_itemprop_list(container, "recipeInstructions");
    if instructions.is_empty() {
        instructions = get_itemprop_list(container, "instructions");
    }

    let name = get_itemprop(container, "name");
    if name.is_none() && ingredients.is_empty() && instructions.is_empty() {
        debug!("Microdata: Recipe container has no usable content");
        return None;
    }

    Some(SchemaRecipe {
        name,
        ingredients,
        instructions,
        recipe_yield: get_itemprop(container, "recipeYield").and_then(|y| normalize_yields(&y)),
        total_time: get_itemprop(container, "totalTime"),
        prep_time: get_itemprop(container, "prepTime"),
        cook_time: get_itemprop(container, "cookTime"),
        images: get_image(container).into_iter().collect(),
        nutrition: get_nutrition(container),
    })
}
