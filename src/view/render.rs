//! Pure display-model construction
//!
//! Every function here maps state to plain structs. Lists are rebuilt in
//! full on every call and each element gets fresh `Action` bindings.

use crate::models::{Id, RatingSummary, Recipe, UserSession};
use crate::services::{Favorites, Ingredients};

use super::models::{
    Action, Badge, EmptyState, GeneratedCard, GeneratedPanel, IngredientPanel, IngredientTag,
    ListView, ProfileView, RatingRow, RecipeCard, RecipeDetail, Star,
};

pub const CARD_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/350x200?text=Recipe+Image";
pub const DETAIL_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x300?text=Recipe+Image";
pub const MAX_STARS: u8 = 5;

const DEFAULT_COUNTRY: &str = "International";
const DEFAULT_PREP_TIME: &str = "Not specified";
const DEFAULT_DIFFICULTY: &str = "Medium";
const DEFAULT_HEALTH_BENEFITS: &str = "No health information available.";

// Backend sends "" for unknown optional columns
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_fallback(value: &Option<String>, fallback: &str) -> String {
    present(value).unwrap_or_else(|| fallback.to_string())
}

/// Dietary, spice and provenance badges.
/// Vegan wins over vegetarian; a spice level of "None" gets no badge.
pub fn badges(recipe: &Recipe) -> Vec<Badge> {
    let mut badges = Vec::new();

    if recipe.is_vegan {
        badges.push(Badge::Vegan);
    } else if recipe.is_vegetarian {
        badges.push(Badge::Vegetarian);
    }

    if recipe.is_gluten_free {
        badges.push(Badge::GlutenFree);
    }

    if let Some(spice) = present(&recipe.spice_level) {
        if spice != "None" {
            badges.push(Badge::Spice(spice));
        }
    }

    if recipe.is_ai_generated {
        badges.push(Badge::AiGenerated);
    }

    badges
}

pub fn rating_caption(rating: &RatingSummary) -> String {
    if rating.count == 0 {
        "No ratings yet".to_string()
    } else {
        format!("{:.1} ({} reviews)", rating.average, rating.count)
    }
}

/// Star `i` is active when `i <= average` and user-rated when `i <= user_rating`
pub fn rating_row(id: &Id, rating: &RatingSummary, user_rating: Option<u8>) -> RatingRow {
    let own = user_rating.unwrap_or(0);
    let stars = (1..=MAX_STARS)
        .map(|value| Star {
            value,
            active: f64::from(value) <= rating.average,
            user_rated: value <= own,
            action: Action::Rate(id.clone(), value),
        })
        .collect();

    RatingRow {
        stars,
        caption: rating_caption(rating),
    }
}

pub fn recipe_card(recipe: &Recipe, favorites: &Favorites) -> RecipeCard {
    RecipeCard {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        image_url: or_fallback(&recipe.image, CARD_PLACEHOLDER_IMAGE),
        country: or_fallback(&recipe.country, DEFAULT_COUNTRY),
        origin: present(&recipe.origin),
        cuisine_type: present(&recipe.cuisine_type),
        description: recipe.description.clone(),
        prep_time: or_fallback(&recipe.prep_time, DEFAULT_PREP_TIME),
        difficulty: or_fallback(&recipe.difficulty, DEFAULT_DIFFICULTY),
        is_favorite: favorites.contains(&recipe.id),
        badges: badges(recipe),
        rating: rating_row(&recipe.id, &recipe.rating, recipe.user_rating),
        open: Action::OpenDetails(recipe.id.clone()),
        favorite: Action::ToggleFavorite(recipe.id.clone()),
    }
}

pub fn no_recipes_found() -> EmptyState {
    EmptyState {
        icon: "search",
        title: "No recipes found".to_string(),
        message: "Try adjusting your search terms or click \"Surprise Me!\" for random recipes"
            .to_string(),
    }
}

pub fn no_generated_recipes() -> EmptyState {
    EmptyState {
        icon: "robot",
        title: "No AI Generated Recipes Yet".to_string(),
        message: "Use the AI Recipe Generator above to create custom recipes from your ingredients!"
            .to_string(),
    }
}

pub fn failure(message: &str) -> EmptyState {
    EmptyState {
        icon: "exclamation-triangle",
        title: "Oops!".to_string(),
        message: message.to_string(),
    }
}

pub fn generation_failed() -> EmptyState {
    EmptyState {
        icon: "exclamation-triangle",
        title: "Recipe Generation Failed".to_string(),
        message: "Sorry, we couldn't generate a recipe right now. Please try again later."
            .to_string(),
    }
}

/// Whole-list render; an empty input yields the "No recipes found" state
pub fn recipe_list(recipes: &[Recipe], favorites: &Favorites) -> ListView {
    if recipes.is_empty() {
        return ListView::Empty(no_recipes_found());
    }
    ListView::Cards(
        recipes
            .iter()
            .map(|recipe| recipe_card(recipe, favorites))
            .collect(),
    )
}

pub fn recipe_detail(recipe: &Recipe, favorites: &Favorites) -> RecipeDetail {
    let badges = badges(recipe)
        .into_iter()
        .map(|badge| match badge {
            Badge::Spice(level) => Badge::Spice(format!("{} Spice", level)),
            other => other,
        })
        .collect();

    RecipeDetail {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        image_url: or_fallback(&recipe.image, DETAIL_PLACEHOLDER_IMAGE),
        country: or_fallback(&recipe.country, DEFAULT_COUNTRY),
        origin: present(&recipe.origin),
        cuisine_type: present(&recipe.cuisine_type),
        prep_time: or_fallback(&recipe.prep_time, DEFAULT_PREP_TIME),
        difficulty: or_fallback(&recipe.difficulty, DEFAULT_DIFFICULTY),
        badges,
        health_benefits: or_fallback(&recipe.health_benefits, DEFAULT_HEALTH_BENEFITS),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        rating: rating_row(&recipe.id, &recipe.rating, recipe.user_rating),
        is_favorite: favorites.contains(&recipe.id),
        favorite: Action::ToggleFavorite(recipe.id.clone()),
        close: Action::CloseDetails,
    }
}

pub fn generated_card(recipe: &Recipe, favorites: &Favorites) -> GeneratedCard {
    GeneratedCard {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        cuisine_type: present(&recipe.cuisine_type),
        description: recipe.description.clone(),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        is_favorite: favorites.contains(&recipe.id),
        favorite: Action::ToggleFavorite(recipe.id.clone()),
        open: Action::OpenDetails(recipe.id.clone()),
    }
}

pub const GENERATING_MESSAGE: &str = "AI is cooking up something special...";

pub fn generating(ingredients: &[String]) -> GeneratedPanel {
    GeneratedPanel::Generating {
        message: GENERATING_MESSAGE.to_string(),
        detail: format!("Using your ingredients: {}", ingredients.join(", ")),
    }
}

pub fn ingredient_panel(ingredients: &Ingredients) -> IngredientPanel {
    let placeholder = ingredients.is_empty().then(|| {
        "No ingredients added yet. Start by adding some ingredients above!".to_string()
    });

    IngredientPanel {
        tags: ingredients
            .as_slice()
            .iter()
            .map(|ingredient| IngredientTag {
                label: ingredient.clone(),
                remove: Action::RemoveIngredient(ingredient.clone()),
            })
            .collect(),
        placeholder,
        can_generate: ingredients.can_generate(),
    }
}

pub fn profile(user: &UserSession) -> ProfileView {
    ProfileView {
        initials: user.initials(),
        full_name: user.full_name(),
        email: user.email.clone(),
    }
}
