// src/market/recipes.rs

use crate::market::traits::RecipeRegistry;
use crate::model::error::ReactorError;
use crate::model::material::Composition;
use std::collections::HashMap;

/// In-memory recipe registry.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, Composition>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh and spent low-enriched uranium oxide, by mass fraction.
    pub fn with_standard_recipes() -> Self {
        let mut book = Self::new();
        book.insert(
            "fresh_uox",
            Composition::new().with("U235", 0.04).with("U238", 0.96),
        );
        book.insert(
            "spent_uox",
            Composition::new()
                .with("U235", 0.011)
                .with("U236", 0.005)
                .with("U238", 0.94)
                .with("Pu239", 0.009)
                .with("FP", 0.035),
        );
        book
    }

    /// Adds or replaces a recipe.
    pub fn insert(&mut self, recipe_id: &str, composition: Composition) {
        self.recipes.insert(recipe_id.to_string(), composition);
    }
}

impl RecipeRegistry for RecipeBook {
    fn resolve_recipe(&self, recipe_id: &str) -> Result<Composition, ReactorError> {
        self.recipes
            .get(recipe_id)
            .cloned()
            .ok_or_else(|| ReactorError::UnknownRecipe(recipe_id.to_string()))
    }
}
