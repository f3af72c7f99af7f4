use serde::{Deserialize, Serialize};

use super::Id;

/// Aggregate rating as reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

impl RatingSummary {
    pub fn new(average: f64, count: u32) -> Self {
        Self { average, count }
    }
}

// DTO shared by list, search, surprise and detail responses.
// Generated recipes are persisted locally with the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<String>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_benefits: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub rating: RatingSummary,
    #[serde(rename = "userRating", default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(rename = "isAIGenerated", default)]
    pub is_ai_generated: bool,
}

impl Recipe {
    /// Minimal recipe, mostly useful for fixtures
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image: None,
            country: None,
            origin: None,
            cuisine_type: None,
            prep_time: None,
            difficulty: None,
            spice_level: None,
            is_vegan: false,
            is_vegetarian: false,
            is_gluten_free: false,
            health_benefits: None,
            ingredients: Vec::new(),
            steps: Vec::new(),
            rating: RatingSummary::default(),
            user_rating: None,
            is_ai_generated: false,
        }
    }

    /// Record a server-confirmed rating aggregate and the user's own vote
    pub fn apply_rating(&mut self, summary: RatingSummary, user_rating: u8) {
        self.rating = summary;
        self.user_rating = Some(user_rating);
    }
}

/// Body returned by the generation endpoint: recipe-shaped, without id or rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub spice_level: Option<String>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub health_benefits: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl GeneratedRecipe {
    /// Assign a client id and mark the recipe as generated with no ratings
    pub fn into_recipe(self, id: Id) -> Recipe {
        Recipe {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            country: self.country,
            origin: self.origin,
            cuisine_type: self.cuisine_type,
            prep_time: self.prep_time,
            difficulty: self.difficulty,
            spice_level: self.spice_level,
            is_vegan: self.is_vegan,
            is_vegetarian: self.is_vegetarian,
            is_gluten_free: self.is_gluten_free,
            health_benefits: self.health_benefits,
            ingredients: self.ingredients,
            steps: self.steps,
            rating: RatingSummary::default(),
            user_rating: None,
            is_ai_generated: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationPreferences {
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub cuisine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub ingredients: Vec<String>,
    pub preferences: GenerationPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRequest {
    pub recipe_id: Id,
    pub rating: u8,
}

/// Aggregate returned after a rating was stored
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RateResponse {
    pub average_rating: f64,
    pub rating_count: u32,
}

impl From<RateResponse> for RatingSummary {
    fn from(resp: RateResponse) -> Self {
        RatingSummary::new(resp.average_rating, resp.rating_count)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OwnRating {
    pub rating: u8,
    #[serde(default)]
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Ratings breakdown for one recipe, including the caller's own vote when signed in
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingsOverview {
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub user_rating: Option<OwnRating>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_recipe_without_rating_decodes_with_defaults() {
        let json = serde_json::json!({
            "id": 3,
            "name": "Ugali",
            "country": "Kenya",
            "origin": "",
            "description": "Maize porridge",
            "is_vegan": true,
            "ingredients": ["maize flour", "water"],
            "steps": ["Boil water", "Stir in flour"]
        });

        let recipe: Recipe = serde_json::from_value(json).unwrap();
        assert_eq!(recipe.id.as_str(), "3");
        assert_eq!(recipe.rating, RatingSummary::default());
        assert_eq!(recipe.user_rating, None);
        assert!(!recipe.is_ai_generated);
        assert_eq!(recipe.steps.len(), 2);
    }

    #[test]
    fn generated_recipe_is_marked_and_unrated() {
        let generated = GeneratedRecipe {
            name: "Chicken Fried Rice".to_string(),
            description: String::new(),
            image: None,
            country: None,
            origin: None,
            cuisine_type: Some("Asian".to_string()),
            prep_time: None,
            difficulty: None,
            spice_level: None,
            is_vegan: false,
            is_vegetarian: false,
            is_gluten_free: false,
            health_benefits: None,
            ingredients: vec!["chicken".to_string(), "rice".to_string()],
            steps: vec![],
        };

        let recipe = generated.into_recipe(Id::generated(1));
        assert!(recipe.is_ai_generated);
        assert_eq!(recipe.rating, RatingSummary::new(0.0, 0));
        assert_eq!(recipe.id.as_str(), "ai_1");

        let stored = serde_json::to_value(&recipe).unwrap();
        assert_eq!(stored["isAIGenerated"], true);
    }
}
