use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Recipe;

/// Client-side filter selection. Never persisted.
///
/// Text criteria treat `None` and the empty string alike: both mean
/// "no constraint", matching an untouched `<select>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub difficulty: Option<String>,
    pub spice_level: Option<String>,
    pub cuisine_type: Option<String>,
    pub vegan: bool,
    pub vegetarian: bool,
    pub gluten_free: bool,
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl FilterState {
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_spice_level(mut self, spice_level: impl Into<String>) -> Self {
        self.spice_level = Some(spice_level.into());
        self
    }

    pub fn with_cuisine_type(mut self, cuisine_type: impl Into<String>) -> Self {
        self.cuisine_type = Some(cuisine_type.into());
        self
    }

    pub fn vegan_only(mut self) -> Self {
        self.vegan = true;
        self
    }

    pub fn vegetarian_only(mut self) -> Self {
        self.vegetarian = true;
        self
    }

    pub fn gluten_free_only(mut self) -> Self {
        self.gluten_free = true;
        self
    }

    /// True when no criterion is set
    pub fn is_unset(&self) -> bool {
        criterion(&self.difficulty).is_none()
            && criterion(&self.spice_level).is_none()
            && criterion(&self.cuisine_type).is_none()
            && !self.vegan
            && !self.vegetarian
            && !self.gluten_free
    }

    /// Conjunctive match: every set criterion must hold
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(difficulty) = criterion(&self.difficulty) {
            if recipe.difficulty.as_deref() != Some(difficulty) {
                return false;
            }
        }
        if let Some(spice) = criterion(&self.spice_level) {
            if recipe.spice_level.as_deref() != Some(spice) {
                return false;
            }
        }
        if let Some(cuisine) = criterion(&self.cuisine_type) {
            if recipe.cuisine_type.as_deref() != Some(cuisine) {
                return false;
            }
        }
        if self.vegan && !recipe.is_vegan {
            return false;
        }
        if self.vegetarian && !recipe.is_vegetarian {
            return false;
        }
        if self.gluten_free && !recipe.is_gluten_free {
            return false;
        }
        true
    }

    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        recipes
            .iter()
            .filter(|recipe| self.matches(recipe))
            .cloned()
            .collect()
    }
}

/// Recipe-list view selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    All,
    Favorites,
    AiGenerated,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Favorites => "favorites",
            Tab::AiGenerated => "ai-generated",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "favorites" => Ok(Tab::Favorites),
            "ai-generated" | "ai" => Ok(Tab::AiGenerated),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<Recipe> {
        let specs = [
            ("1", "Easy", true, true, false),
            ("2", "Easy", false, true, true),
            ("3", "Medium", true, true, true),
            ("4", "Easy", true, true, true),
            ("5", "Hard", false, false, false),
            ("6", "Easy", false, false, true),
            ("7", "Medium", false, true, false),
            ("8", "Easy", true, true, false),
            ("9", "Hard", true, true, true),
            ("10", "Medium", false, false, false),
        ];
        specs
            .iter()
            .map(|(id, difficulty, vegan, vegetarian, gluten_free)| {
                let mut recipe = Recipe::new(*id, format!("Recipe {}", id));
                recipe.difficulty = Some(difficulty.to_string());
                recipe.is_vegan = *vegan;
                recipe.is_vegetarian = *vegetarian;
                recipe.is_gluten_free = *gluten_free;
                recipe
            })
            .collect()
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn easy_and_vegan_is_conjunctive() {
        let recipes = fixture();
        let filter = FilterState::default().with_difficulty("Easy").vegan_only();

        let filtered = filter.apply(&recipes);
        assert_eq!(ids(&filtered), vec!["1", "4", "8"]);
        assert!(filtered
            .iter()
            .all(|r| r.is_vegan && r.difficulty.as_deref() == Some("Easy")));
    }

    #[test]
    fn filtering_is_idempotent() {
        let recipes = fixture();
        let filter = FilterState::default()
            .with_difficulty("Easy")
            .gluten_free_only();

        let once = filter.apply(&recipes);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_text_criteria_are_ignored() {
        let recipes = fixture();
        let filter = FilterState {
            difficulty: Some(String::new()),
            cuisine_type: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.is_unset());
        assert_eq!(filter.apply(&recipes).len(), recipes.len());
    }

    #[test]
    fn missing_recipe_field_never_matches_a_set_criterion() {
        let recipe = Recipe::new("x", "Plain");
        assert!(!FilterState::default().with_cuisine_type("Kenyan").matches(&recipe));
    }

    #[test]
    fn tab_parses_from_markup_names() {
        assert_eq!("ai-generated".parse::<Tab>().unwrap(), Tab::AiGenerated);
        assert_eq!("Favorites".parse::<Tab>().unwrap(), Tab::Favorites);
        assert!("recent".parse::<Tab>().is_err());
    }
}
