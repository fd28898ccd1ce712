use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::importer::NormalizedRecipe;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Json<Vec<String>>,
    pub steps: Json<Vec<String>>,
    pub image_filename: Option<String>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_filename: Option<String>,
    pub source_url: Option<String>,
}

impl NewRecipe {
    pub fn from_imported(recipe: NormalizedRecipe, source_url: Option<String>) -> Self {
        Self {
            name: recipe.name,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            image_filename: recipe.image_filename,
            source_url,
        }
    }
}

/// Replacement fields for an edit. `image_filename: None` keeps the
/// stored image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_filename: Option<String>,
}
