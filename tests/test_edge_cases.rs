use scrape_recipe::{scrape_with_config, RecipeRecord, ScrapeConfig, Strategy};

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

fn scrape_json_ld(json_ld: &str) -> RecipeRecord {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(json_ld))
        .create();

    let url = format!("{}/recipe", server.url());
    let resolved = scrape_with_config(&url, &ScrapeConfig::default()).unwrap();
    assert_eq!(resolved.strategy, Strategy::SchemaOrg);
    resolved.record
}

#[test]
fn test_german_recipe_with_sections_and_array_yield() {
    let record = scrape_json_ld(
        r#"
    {
        "@id": "https://biancazapatka.com/de/brookies-chocolate-chip-cookie-brownies/#recipe",
        "@type": "Recipe",
        "cookTime": "PT25M",
        "prepTime": "PT20M",
        "image": [
            "https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies.jpg",
            "https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies-500x500.jpg"
        ],
        "name": "Vegane Brookies - Chocolate Chip Cookie Brownies",
        "recipeIngredient": [
            "160 g Mehl (Weizen-, Dinkel oder glutenfreies Mehl, gesiebt)",
            "30 g Kakaopulver",
            "1  Prise Salz"
        ],
        "recipeInstructions": [
            {
                "@type": "HowToSection",
                "name": "Brownie-Teig",
                "itemListElement": [
                    {
                        "@type": "HowToStep",
                        "name": "Den Backofen vorheizen",
                        "text": "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen."
                    },
                    {
                        "@type": "HowToStep",
                        "text": "Vegane Butter mit der Schokolade schmelzen."
                    }
                ]
            },
            {
                "@type": "HowToSection",
                "name": "Cookie-Teig",
                "itemListElement": [
                    {
                        "@type": "HowToStep",
                        "text": "Zucker und Butter cremig rühren."
                    }
                ]
            }
        ],
        "recipeYield": ["15", "15 Stück"]
    }
    "#,
    );

    assert_eq!(
        record.title,
        "Vegane Brookies - Chocolate Chip Cookie Brownies"
    );
    assert_eq!(record.yields.as_deref(), Some("15 Stück"));
    assert_eq!(record.total_time_minutes, Some(45));
    assert_eq!(record.ingredients[2], "1 Prise Salz");
    assert_eq!(
        record.instructions,
        vec![
            "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen.",
            "Vegane Butter mit der Schokolade schmelzen.",
            "Zucker und Butter cremig rühren."
        ]
    );
    assert_eq!(
        record.image_url.as_deref(),
        Some("https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies.jpg")
    );
}

#[test]
fn test_recipe_without_instructions() {
    let record = scrape_json_ld(
        r#"
    {
        "@context": "https://schema.org/",
        "@type": "Recipe",
        "name": "Dishoom's House Black Daal",
        "cookTime": "PT5H",
        "prepTime": "PT15M",
        "totalTime": "PT5H30M",
        "recipeIngredient": [
            "300g whole black urad daal",
            "⅔ tsp deggi mirch chilli powder (or ⅓ tsp normal chilli powder)",
            "90ml double cream"
        ],
        "recipeYield": 8
    }
    "#,
    );

    assert_eq!(record.title, "Dishoom's House Black Daal");
    assert!(record.instructions.is_empty());
    assert_eq!(record.total_time_minutes, Some(330));
    assert_eq!(record.yields.as_deref(), Some("8 servings"));
    assert_eq!(record.ingredients.len(), 3);
    assert!(record.nutrients.is_empty());
    assert!(record.image_url.is_none());
}

#[test]
fn test_recipe_without_ingredients_or_times() {
    let record = scrape_json_ld(
        r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Water",
        "recipeInstructions": ["Pour.", "   ", "Drink."]
    }
    "#,
    );

    assert!(record.ingredients.is_empty());
    assert_eq!(record.instructions, vec!["Pour.", "Drink."]);
    assert_eq!(record.total_time_minutes, None);
    assert_eq!(record.yields, None);
}

#[test]
fn test_html_entities_are_decoded() {
    let record = scrape_json_ld(
        r#"
    {
        "@type": "Recipe",
        "name": "Mac &amp; Cheese",
        "recipeIngredient": ["1 cup &quot;sharp&quot; cheddar"],
        "recipeInstructions": "Boil macaroni &amp; drain."
    }
    "#,
    );

    assert_eq!(record.title, "Mac & Cheese");
    assert_eq!(record.ingredients, vec!["1 cup \"sharp\" cheddar"]);
    assert_eq!(record.instructions, vec!["Boil macaroni & drain."]);
}
