use serde::{Deserialize, Serialize};

use crate::db::models::Recipe;
use crate::importer::ImageOutcome;
use crate::utils::sanitize::lines_to_list;

/// Recipe list query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    pub limit: Option<usize>,
}

fn default_page() -> usize {
    1
}

/// Ingredients or steps as submitted: either a JSON list or the multi-line
/// text a form textarea produces
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Items(Vec<String>),
    Lines(String),
}

impl Default for TextList {
    fn default() -> Self {
        TextList::Items(Vec::new())
    }
}

impl TextList {
    /// Trimmed, non-blank entries
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextList::Items(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
            TextList::Lines(text) => lines_to_list(&text),
        }
    }
}

/// Create/update request body
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: TextList,
    #[serde(default)]
    pub steps: TextList,
    /// Filename previously returned by `POST /api/uploads`
    pub image_filename: Option<String>,
}

/// Import request body
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub url: String,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Full recipe details
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_filename: Option<String>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Recipe> for RecipeDetail {
    fn from(recipe: Recipe) -> Self {
        let image_url = recipe
            .image_filename
            .as_ref()
            .map(|name| format!("/uploads/{name}"));

        Self {
            id: recipe.id,
            name: recipe.name,
            ingredients: recipe.ingredients.0,
            steps: recipe.steps.0,
            image_filename: recipe.image_filename,
            image_url,
            source_url: recipe.source_url,
            created_at: recipe.created_at.to_rfc3339(),
            updated_at: recipe.updated_at.to_rfc3339(),
        }
    }
}

/// Recipe list response
#[derive(Debug, Clone, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<RecipeDetail>,
    pub pagination: Pagination,
}

/// Import response: the stored record plus what happened to its image
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub recipe: RecipeDetail,
    pub image: ImageOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_list_accepts_both_shapes() {
        let input: RecipeInput = serde_json::from_value(serde_json::json!({
            "name": "Soup",
            "ingredients": ["  water ", "", "salt"],
            "steps": "Boil.\n\n  Season.  \n"
        }))
        .unwrap();

        assert_eq!(input.ingredients.into_vec(), vec!["water", "salt"]);
        assert_eq!(input.steps.into_vec(), vec!["Boil.", "Season."]);
    }

    #[test]
    fn test_text_list_defaults_empty() {
        let input: RecipeInput =
            serde_json::from_value(serde_json::json!({"name": "Toast"})).unwrap();
        assert!(input.ingredients.into_vec().is_empty());
        assert!(input.image_filename.is_none());
    }
}
