//! Recipe Collection - in-memory recipe state and its derived views
//!
//! No I/O happens here. The app layer fetches, persists and locks; this
//! module decides what each view contains and which responses may be shown.

use crate::models::{FilterState, Id, RatingSummary, Recipe, Tab};

/// Minimum number of ingredients before generation is allowed
pub const MIN_INGREDIENTS: usize = 2;

/// Favorite recipe ids in the order they were marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites(Vec<Id>);

impl Favorites {
    pub fn from_ids(ids: Vec<Id>) -> Self {
        let mut favorites = Favorites::default();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.0.push(id);
            }
        }
        favorites
    }

    /// Add when absent, remove when present. Returns whether `id` is now a favorite.
    pub fn toggle(&mut self, id: &Id) -> bool {
        if let Some(pos) = self.0.iter().position(|f| f == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id.clone());
            true
        }
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.0.contains(id)
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lowercased, case-insensitively unique ingredient list for generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingredients(Vec<String>);

impl Ingredients {
    /// Returns false for blank input and duplicates
    pub fn add(&mut self, text: &str) -> bool {
        let ingredient = text.trim().to_lowercase();
        if ingredient.is_empty() || self.0.contains(&ingredient) {
            return false;
        }
        self.0.push(ingredient);
        true
    }

    pub fn remove(&mut self, text: &str) -> bool {
        let ingredient = text.trim().to_lowercase();
        match self.0.iter().position(|i| *i == ingredient) {
            Some(pos) => {
                self.0.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn can_generate(&self) -> bool {
        self.0.len() >= MIN_INGREDIENTS
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Generation number handed out when a list request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic counter deciding which in-flight response may be displayed.
/// Only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// What the recipe list area currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Recipes(Vec<Recipe>),
    /// The generated tab has nothing to show yet
    NoGeneratedRecipes,
    Failed(String),
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Recipes(Vec::new())
    }
}

#[derive(Debug, Default)]
pub struct RecipeCollection {
    recipes: Vec<Recipe>,
    favorites: Favorites,
    ai_recipes: Vec<Recipe>,
    filters: FilterState,
    tab: Tab,
    ingredients: Ingredients,
    listing: Listing,
    requests: RequestTracker,
}

impl RecipeCollection {
    /// Restore persisted favorites and generated recipes
    pub fn restore(favorites: Vec<Id>, ai_recipes: Vec<Recipe>) -> Self {
        Self {
            favorites: Favorites::from_ids(favorites),
            ai_recipes,
            ..Default::default()
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn ai_recipes(&self) -> &[Recipe] {
        &self.ai_recipes
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn ingredients(&self) -> &Ingredients {
        &self.ingredients
    }

    pub fn ingredients_mut(&mut self) -> &mut Ingredients {
        &mut self.ingredients
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn begin_request(&mut self) -> Ticket {
        self.requests.issue()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.requests.is_current(ticket)
    }

    /// Show `listing` if `ticket` is still current. Returns whether it was applied.
    pub fn show(&mut self, ticket: Ticket, listing: Listing) -> bool {
        if !self.requests.is_current(ticket) {
            tracing::debug!("Discarding stale list response {:?}", ticket);
            return false;
        }
        self.listing = listing;
        true
    }

    /// Replace the authoritative catalogue
    pub fn replace_recipes(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Catalogue narrowed by the active filters
    pub fn filtered(&self) -> Vec<Recipe> {
        self.filters.apply(&self.recipes)
    }

    /// Favorited recipes from the catalogue followed by favorited generated ones
    pub fn favorites_view(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .chain(self.ai_recipes.iter())
            .filter(|recipe| self.favorites.contains(&recipe.id))
            .cloned()
            .collect()
    }

    pub fn view_for(&self, tab: Tab) -> Listing {
        match tab {
            Tab::All => Listing::Recipes(self.recipes.clone()),
            Tab::Favorites => Listing::Recipes(self.favorites_view()),
            Tab::AiGenerated if self.ai_recipes.is_empty() => Listing::NoGeneratedRecipes,
            Tab::AiGenerated => Listing::Recipes(self.ai_recipes.clone()),
        }
    }

    pub fn toggle_favorite(&mut self, id: &Id) -> bool {
        self.favorites.toggle(id)
    }

    pub fn prepend_ai_recipe(&mut self, recipe: Recipe) {
        self.ai_recipes.insert(0, recipe);
    }

    /// Unused `ai_<millis>` id, bumping the timestamp on collision
    pub fn next_ai_id(&self, unix_millis: i64) -> Id {
        let mut millis = unix_millis;
        loop {
            let id = Id::generated(millis);
            if !self.ai_recipes.iter().any(|r| r.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Locate a recipe by id among the catalogue, generated recipes and current listing
    pub fn find(&self, id: &Id) -> Option<&Recipe> {
        let listed: &[Recipe] = match &self.listing {
            Listing::Recipes(recipes) => recipes.as_slice(),
            _ => &[],
        };
        self.recipes
            .iter()
            .chain(self.ai_recipes.iter())
            .chain(listed.iter())
            .find(|r| r.id == *id)
    }

    /// Apply a server-confirmed rating to every copy of the recipe held in memory.
    /// Returns true when the recipe was found in a generated recipe.
    pub fn apply_rating(&mut self, id: &Id, summary: RatingSummary, stars: u8) -> bool {
        if let Listing::Recipes(listed) = &mut self.listing {
            listed
                .iter_mut()
                .filter(|r| r.id == *id)
                .for_each(|r| r.apply_rating(summary, stars));
        }
        self.recipes
            .iter_mut()
            .filter(|r| r.id == *id)
            .for_each(|r| r.apply_rating(summary, stars));

        let mut touched_generated = false;
        for recipe in self.ai_recipes.iter_mut().filter(|r| r.id == *id) {
            recipe.apply_rating(summary, stars);
            touched_generated = true;
        }
        touched_generated
    }
}
