use serde::Serialize;
use std::collections::BTreeMap;

/// The recipe as printed by the command line tool.
///
/// Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub title: String,
    pub total_time_minutes: Option<u32>,
    pub yields: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub nutrients: BTreeMap<String, String>,
    pub canonical_url: String,
    pub host: String,
}

/// Split a multi-line instructions blob into steps, dropping blank lines.
pub fn split_instructions(blob: &str) -> Vec<String> {
    blob.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
