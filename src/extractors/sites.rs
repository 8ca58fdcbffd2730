use super::schema::normalize_text;
use log::debug;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// CSS selectors for one family of recipe-card markup.
///
/// Each list is tried in order; the first selector that yields text wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRules {
    pub name: &'static str,
    pub title: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub instructions: &'static [&'static str],
    pub yields: &'static [&'static str],
}

/// WP Recipe Maker
pub const WPRM: SiteRules = SiteRules {
    name: "wprm",
    title: &[".wprm-recipe-name"],
    ingredients: &[".wprm-recipe-ingredient"],
    instructions: &[".wprm-recipe-instruction-text", ".wprm-recipe-instruction"],
    yields: &[".wprm-recipe-servings-with-unit", ".wprm-recipe-servings"],
};

/// Tasty Recipes
pub const TASTY_RECIPES: SiteRules = SiteRules {
    name: "tasty-recipes",
    title: &[".tasty-recipes-title"],
    ingredients: &[".tasty-recipes-ingredients li", ".tasty-recipes-ingredients p"],
    instructions: &[".tasty-recipes-instructions li", ".tasty-recipes-instructions p"],
    yields: &[".tasty-recipes-yield"],
};

/// Dotdash Meredith structured content (Allrecipes, Serious Eats, ...)
pub const DOTDASH: SiteRules = SiteRules {
    name: "dotdash",
    title: &["h1.article-heading", "h1.heading__title"],
    ingredients: &[
        ".mm-recipes-structured-ingredients__list-item",
        ".structured-ingredients__list-item",
    ],
    instructions: &[
        ".mm-recipes-steps__content li p",
        ".structured-project__steps li p",
    ],
    yields: &[],
};

const KNOWN_SITES: &[(&str, &SiteRules)] = &[
    ("allrecipes.com", &DOTDASH),
    ("budgetbytes.com", &WPRM),
    ("cookieandkate.com", &WPRM),
    ("eatingwell.com", &DOTDASH),
    ("minimalistbaker.com", &WPRM),
    ("natashaskitchen.com", &WPRM),
    ("pinchofyum.com", &TASTY_RECIPES),
    ("recipetineats.com", &WPRM),
    ("sallysbakingaddiction.com", &TASTY_RECIPES),
    ("seriouseats.com", &DOTDASH),
    ("simplyrecipes.com", &DOTDASH),
];

impl SiteRules {
    /// Text of the first selector that matches something non-empty.
    pub fn select_text(&self, document: &Html, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|css| {
            let selector = Selector::parse(css).ok()?;
            let text = document
                .select(&selector)
                .map(|el| normalize_text(&el.text().collect::<Vec<_>>().join(" ")))
                .find(|text| !text.is_empty());
            if text.is_some() {
                debug!("{}: matched {}", self.name, css);
            }
            text
        })
    }

    /// Texts of every element matched by the first productive selector.
    pub fn select_list(&self, document: &Html, selectors: &[&str]) -> Vec<String> {
        for css in selectors {
            let Ok(selector) = Selector::parse(css) else {
                continue;
            };
            let items: Vec<String> = document
                .select(&selector)
                .map(|el| normalize_text(&el.text().collect::<Vec<_>>().join(" ")))
                .filter(|text| !text.is_empty())
                .collect();
            if !items.is_empty() {
                debug!("{}: found {} items using {}", self.name, items.len(), css);
                return items;
            }
        }
        Vec::new()
    }
}

/// Hosts with site-specific scraping rules.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: HashMap<String, SiteRules>,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        let sites = KNOWN_SITES
            .iter()
            .map(|(host, rules)| (host.to_string(), (*rules).clone()))
            .collect();
        Self { sites }
    }
}

impl SiteRegistry {
    pub fn empty() -> Self {
        Self {
            sites: HashMap::new(),
        }
    }

    pub fn register(mut self, host: impl Into<String>, rules: SiteRules) -> Self {
        self.sites.insert(host.into(), rules);
        self
    }

    pub fn get(&self, host: &str) -> Option<&SiteRules> {
        self.sites.get(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WPRM_CARD: &str = r#"
        <html><body>
        <div class="wprm-recipe-container">
            <h2 class="wprm-recipe-name">Chicken   Stroganoff</h2>
            <span class="wprm-recipe-servings">6</span>
            <ul>
                <li class="wprm-recipe-ingredient"><span>1 lb</span> <span>chicken</span></li>
                <li class="wprm-recipe-ingredient"><span>2 Tbsp</span> <span>flour</span></li>
            </ul>
            <ul>
                <li class="wprm-recipe-instruction"><div class="wprm-recipe-instruction-text">Slice chicken.</div></li>
                <li class="wprm-recipe-instruction"><div class="wprm-recipe-instruction-text">Brown it.</div></li>
            </ul>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_wprm_rules() {
        let document = Html::parse_document(WPRM_CARD);

        assert_eq!(
            WPRM.select_text(&document, WPRM.title).as_deref(),
            Some("Chicken Stroganoff")
        );
        assert_eq!(
            WPRM.select_list(&document, WPRM.ingredients),
            vec!["1 lb chicken", "2 Tbsp flour"]
        );
        assert_eq!(
            WPRM.select_list(&document, WPRM.instructions),
            vec!["Slice chicken.", "Brown it."]
        );
        assert_eq!(
            WPRM.select_text(&document, WPRM.yields).as_deref(),
            Some("6")
        );
    }

    #[test]
    fn test_rules_without_matches() {
        let document = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert!(TASTY_RECIPES
            .select_text(&document, TASTY_RECIPES.title)
            .is_none());
        assert!(DOTDASH
            .select_list(&document, DOTDASH.ingredients)
            .is_empty());
    }

    #[test]
    fn test_registry() {
        let registry = SiteRegistry::default();
        assert_eq!(registry.get("allrecipes.com"), Some(&DOTDASH));
        assert_eq!(registry.get("budgetbytes.com"), Some(&WPRM));
        assert!(registry.get("example.com").is_none());

        let registry = SiteRegistry::empty().register("example.com", TASTY_RECIPES);
        assert_eq!(registry.get("example.com"), Some(&TASTY_RECIPES));
        assert!(registry.get("allrecipes.com").is_none());
    }
}
