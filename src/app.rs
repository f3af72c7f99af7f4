//! Application state and operations
//!
//! `App` owns every piece of client state. Presentation layers call the
//! operations below, read a `Screen` from `view()`, drain `take_notices()`
//! and feed the `Action`s bound to rendered elements back into `dispatch`.
//!
//! Locks are never held across an `.await`: each operation takes a ticket
//! or a snapshot, releases the state, awaits the gateway and re-locks to
//! apply the result.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;

use crate::domain::{ClientError, RecipeGateway, SessionGateway};
use crate::models::{
    FilterState, GenerationPreferences, GenerationRequest, Id, RatingSummary, RatingsOverview,
    Recipe, Tab, UserSession,
};
use crate::services::{
    AuthManager, Listing, PreferenceStore, RecipeCollection, RequestTracker, SessionStatus,
};
use crate::validation::{LoginForm, SignupForm};
use crate::view::{render, Action, GeneratedPanel, ListView, Notice, Screen};

pub const LOAD_FAILED: &str = "Failed to load recipes. Please try again.";
pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const SURPRISE_FAILED: &str = "Failed to get surprise recipes. Please try again.";
pub const DETAIL_FAILED: &str = "Failed to load recipe details. Please try again.";
pub const LOGIN_TO_RATE: &str = "Please log in to rate recipes.";
pub const RATING_FAILED: &str = "Failed to save your rating. Please try again.";
pub const NEED_INGREDIENTS: &str = "Please add at least 2 ingredients to generate a recipe.";
pub const LOGOUT_FAILED: &str = "Logout failed. Please try again.";
pub const LOGGED_OUT: &str = "Successfully logged out!";

/// Choices for the cuisine and country filter selects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cuisines: Vec<String>,
    pub countries: Vec<String>,
}

enum Generation {
    InFlight(Vec<String>),
    Ready(Recipe),
    Failed,
}

#[derive(Default)]
struct UiState {
    collection: RecipeCollection,
    detail: Option<Recipe>,
    details: RequestTracker,
    generation: Option<Generation>,
}

/// Keeps the loading indicator up for as long as it lives.
/// Dropping on every exit path keeps show/hide symmetric.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn stars_notice(stars: u8) -> String {
    if stars == 1 {
        "Rated 1 star!".to_string()
    } else {
        format!("Rated {} stars!", stars)
    }
}

pub struct App {
    recipes: Arc<dyn RecipeGateway>,
    auth: AuthManager,
    preferences: PreferenceStore,
    state: Mutex<UiState>,
    notices: Mutex<Vec<Notice>>,
    loading: AtomicUsize,
}

impl App {
    /// Restores favorites and generated recipes from `preferences`.
    /// Nothing is fetched until `start`.
    pub fn new(
        recipes: Arc<dyn RecipeGateway>,
        sessions: Arc<dyn SessionGateway>,
        preferences: PreferenceStore,
    ) -> Self {
        let favorites = preferences.load_favorites();
        let ai_recipes = preferences.load_ai_recipes();
        tracing::debug!(
            "Restored {} favorites and {} generated recipes",
            favorites.len(),
            ai_recipes.len()
        );

        Self {
            recipes,
            auth: AuthManager::new(sessions, preferences.clone()),
            preferences,
            state: Mutex::new(UiState {
                collection: RecipeCollection::restore(favorites, ai_recipes),
                ..Default::default()
            }),
            notices: Mutex::new(Vec::new()),
            loading: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(notice);
    }

    /// Session check and catalogue load, run concurrently
    pub async fn start(&self) -> SessionStatus {
        let (status, ()) = futures::join!(self.auth.bootstrap(), self.load_all());
        status
    }

    // ---- Recipe list ----

    /// Fetch the full catalogue. Failures end up in the list panel.
    pub async fn load_all(&self) {
        let ticket = self.state().collection.begin_request();
        let _loading = LoadingGuard::begin(&self.loading);

        match self.recipes.list().await {
            Ok(recipes) => {
                tracing::info!("Loaded {} recipes", recipes.len());
                let mut state = self.state();
                state.collection.replace_recipes(recipes.clone());
                state.collection.show(ticket, Listing::Recipes(recipes));
            }
            Err(e) => {
                tracing::error!("Failed to load recipes: {}", e);
                self.state()
                    .collection
                    .show(ticket, Listing::Failed(LOAD_FAILED.to_string()));
            }
        }
    }

    /// Server-side search. A blank query re-displays the catalogue without a request.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            let mut state = self.state();
            let ticket = state.collection.begin_request();
            let recipes = state.collection.recipes().to_vec();
            state.collection.show(ticket, Listing::Recipes(recipes));
            return;
        }

        let ticket = self.state().collection.begin_request();
        let _loading = LoadingGuard::begin(&self.loading);
        tracing::debug!("Searching for '{}'", query);

        let listing = match self.recipes.search(query).await {
            Ok(results) => {
                tracing::info!("Search '{}' returned {} recipes", query, results.len());
                Listing::Recipes(results)
            }
            Err(e) => {
                tracing::warn!("Search '{}' failed: {}", query, e);
                Listing::Failed(SEARCH_FAILED.to_string())
            }
        };
        self.state().collection.show(ticket, listing);
    }

    pub async fn surprise(&self) {
        let ticket = self.state().collection.begin_request();
        let _loading = LoadingGuard::begin(&self.loading);

        let listing = match self.recipes.surprise().await {
            Ok(picks) => {
                tracing::info!("Surprise returned {} recipes", picks.len());
                Listing::Recipes(picks)
            }
            Err(e) => {
                tracing::warn!("Surprise failed: {}", e);
                Listing::Failed(SURPRISE_FAILED.to_string())
            }
        };
        self.state().collection.show(ticket, listing);
    }

    /// Filter the catalogue locally; search and surprise results are never filtered
    pub fn apply_filters(&self, filters: FilterState) {
        let mut state = self.state();
        state.collection.set_filters(filters);
        let ticket = state.collection.begin_request();
        let filtered = state.collection.filtered();
        tracing::debug!("Filters matched {} recipes", filtered.len());
        state.collection.show(ticket, Listing::Recipes(filtered));
    }

    pub fn clear_filters(&self) {
        self.apply_filters(FilterState::default());
    }

    pub fn filters(&self) -> FilterState {
        self.state().collection.filters().clone()
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, ClientError> {
        let (cuisines, countries) =
            futures::try_join!(self.recipes.cuisines(), self.recipes.countries())?;
        Ok(FilterOptions {
            cuisines,
            countries,
        })
    }

    pub fn switch_tab(&self, tab: Tab) {
        let mut state = self.state();
        state.collection.set_tab(tab);
        let ticket = state.collection.begin_request();
        let listing = state.collection.view_for(tab);
        state.collection.show(ticket, listing);
    }

    pub fn tab(&self) -> Tab {
        self.state().collection.tab()
    }

    // ---- Favorites ----

    /// Returns whether `id` is now a favorite. Persisted immediately.
    pub fn toggle_favorite(&self, id: &Id) -> bool {
        let (now_favorite, persisted) = {
            let mut state = self.state();
            let now_favorite = state.collection.toggle_favorite(id);
            if state.collection.tab() == Tab::Favorites {
                let ticket = state.collection.begin_request();
                let listing = state.collection.view_for(Tab::Favorites);
                state.collection.show(ticket, listing);
            }
            // Written under the state lock so the store sees mutations in order
            let persisted = self
                .preferences
                .save_favorites(state.collection.favorites().as_slice());
            (now_favorite, persisted)
        };

        if let Err(e) = persisted {
            tracing::error!("Failed to persist favorites: {}", e);
            self.notify(Notice::error(e.user_message()));
        }
        now_favorite
    }

    pub fn favorites(&self) -> Vec<Id> {
        self.state().collection.favorites().as_slice().to_vec()
    }

    // ---- Generation ----

    pub fn add_ingredient(&self, text: &str) -> bool {
        self.state().collection.ingredients_mut().add(text)
    }

    pub fn remove_ingredient(&self, text: &str) -> bool {
        self.state().collection.ingredients_mut().remove(text)
    }

    pub fn ingredients(&self) -> Vec<String> {
        self.state().collection.ingredients().as_slice().to_vec()
    }

    pub fn can_generate(&self) -> bool {
        self.state().collection.ingredients().can_generate()
    }

    pub fn ai_recipes(&self) -> Vec<Recipe> {
        self.state().collection.ai_recipes().to_vec()
    }

    /// Generate a recipe from the current ingredients and keep it locally
    pub async fn generate_recipe(
        &self,
        preferences: GenerationPreferences,
    ) -> Result<Recipe, ClientError> {
        let ingredients = {
            let mut state = self.state();
            if !state.collection.ingredients().can_generate() {
                drop(state);
                self.notify(Notice::error(NEED_INGREDIENTS));
                return Err(ClientError::Guard(NEED_INGREDIENTS.to_string()));
            }
            let ingredients = state.collection.ingredients().as_slice().to_vec();
            state.generation = Some(Generation::InFlight(ingredients.clone()));
            ingredients
        };

        let _loading = LoadingGuard::begin(&self.loading);
        tracing::info!("Generating recipe from {} ingredients", ingredients.len());
        let request = GenerationRequest {
            ingredients,
            preferences,
        };

        let generated = match self.recipes.generate(&request).await {
            Ok(generated) => generated,
            Err(e) => {
                tracing::warn!("Recipe generation failed: {}", e);
                self.state().generation = Some(Generation::Failed);
                return Err(e);
            }
        };

        let (recipe, persisted) = {
            let mut state = self.state();
            let id = state
                .collection
                .next_ai_id(Utc::now().timestamp_millis());
            let recipe = generated.into_recipe(id);
            state.collection.prepend_ai_recipe(recipe.clone());
            state.generation = Some(Generation::Ready(recipe.clone()));
            if state.collection.tab() == Tab::AiGenerated {
                let ticket = state.collection.begin_request();
                let listing = state.collection.view_for(Tab::AiGenerated);
                state.collection.show(ticket, listing);
            }
            let persisted = self.preferences.save_ai_recipes(state.collection.ai_recipes());
            (recipe, persisted)
        };

        if let Err(e) = persisted {
            tracing::error!("Failed to persist generated recipes: {}", e);
        }
        tracing::info!("Generated '{}' as {}", recipe.name, recipe.id);
        Ok(recipe)
    }

    // ---- Detail ----

    /// Open the detail view. Generated recipes resolve from local state.
    /// Only the most recently requested detail is ever shown.
    pub async fn show_details(&self, id: &Id) -> Result<(), ClientError> {
        let ticket = {
            let mut state = self.state();
            let ticket = state.details.issue();
            if id.is_generated() {
                let found = state
                    .collection
                    .ai_recipes()
                    .iter()
                    .find(|r| r.id == *id)
                    .cloned();
                let opened = found.is_some();
                state.detail = found;
                drop(state);

                if opened {
                    return Ok(());
                }
                tracing::warn!("Generated recipe {} not found", id);
                self.notify(Notice::error(DETAIL_FAILED));
                return Err(ClientError::Guard(format!("Recipe {} not found", id)));
            }
            ticket
        };

        let _loading = LoadingGuard::begin(&self.loading);
        let fetched = self.recipes.detail(id).await;

        let mut state = self.state();
        if !state.details.is_current(ticket) {
            tracing::debug!("Discarding stale detail response for {}", id);
            return fetched.map(|_| ());
        }

        match fetched {
            Ok(mut detail) => {
                if let Some(known) = state.collection.find(id) {
                    if detail.user_rating.is_none() {
                        detail.user_rating = known.user_rating;
                    }
                    if detail.rating.count == 0 {
                        detail.rating = known.rating;
                    }
                }
                state.detail = Some(detail);
                Ok(())
            }
            Err(e) => {
                state.detail = None;
                drop(state);
                tracing::warn!("Failed to load recipe {}: {}", id, e);
                self.notify(Notice::error(DETAIL_FAILED));
                Err(e)
            }
        }
    }

    /// Also invalidates any detail fetch still in flight
    pub fn close_details(&self) {
        let mut state = self.state();
        state.details.issue();
        state.detail = None;
    }

    pub fn detail(&self) -> Option<Recipe> {
        self.state().detail.clone()
    }

    /// Fetch the ratings breakdown and apply it to the open detail, if it is this recipe
    pub async fn load_reviews(&self, id: &Id) -> Result<RatingsOverview, ClientError> {
        let overview = self.recipes.ratings(id).await.inspect_err(|e| {
            tracing::warn!("Failed to load ratings for {}: {}", id, e);
        })?;

        let mut state = self.state();
        if let Some(detail) = state.detail.as_mut().filter(|d| d.id == *id) {
            if let Some(average) = overview.average_rating {
                detail.rating = RatingSummary::new(average, overview.total_ratings);
            }
            if let Some(own) = &overview.user_rating {
                detail.user_rating = Some(own.rating);
            }
        }
        Ok(overview)
    }

    // ---- Rating ----

    /// Submit a rating. The displayed aggregate is always the server's.
    pub async fn rate(&self, id: &Id, stars: u8) -> Result<RatingSummary, ClientError> {
        if self.auth.current_user().is_none() {
            self.notify(Notice::info(LOGIN_TO_RATE));
            return Err(ClientError::Guard(LOGIN_TO_RATE.to_string()));
        }
        if !(1..=render::MAX_STARS).contains(&stars) {
            return Err(ClientError::Guard(format!(
                "Rating must be between 1 and {}",
                render::MAX_STARS
            )));
        }

        let summary: RatingSummary = match self.recipes.rate(id, stars).await {
            Ok(resp) => resp.into(),
            Err(e) => {
                tracing::warn!("Rating {} failed: {}", id, e);
                self.notify(Notice::error(RATING_FAILED));
                return Err(e);
            }
        };

        let persisted = {
            let mut state = self.state();
            let touched_generated = state.collection.apply_rating(id, summary, stars);
            if let Some(detail) = state.detail.as_mut().filter(|d| d.id == *id) {
                detail.apply_rating(summary, stars);
            }
            if let Some(Generation::Ready(recipe)) = state.generation.as_mut() {
                if recipe.id == *id {
                    recipe.apply_rating(summary, stars);
                }
            }
            touched_generated
                .then(|| self.preferences.save_ai_recipes(state.collection.ai_recipes()))
        };

        if let Some(Err(e)) = persisted {
            tracing::error!("Failed to persist generated recipes: {}", e);
        }

        tracing::info!(
            "Rated {} with {} stars, now {:.1} over {}",
            id,
            stars,
            summary.average,
            summary.count
        );
        self.notify(Notice::success(stars_notice(stars)));
        Ok(summary)
    }

    // ---- Session ----

    pub fn session_status(&self) -> SessionStatus {
        self.auth.status()
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.auth.current_user()
    }

    pub async fn login(&self, form: &LoginForm) -> Result<UserSession, ClientError> {
        self.auth.login(form).await
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<UserSession, ClientError> {
        self.auth.signup(form).await
    }

    /// The session survives a failed logout
    pub async fn logout(&self) -> Result<(), ClientError> {
        match self.auth.logout().await {
            Ok(()) => {
                self.notify(Notice::success(LOGGED_OUT));
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(LOGOUT_FAILED));
                Err(e)
            }
        }
    }

    // ---- Presentation ----

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|p| p.into_inner()))
    }

    /// Build the display model for the current state
    pub fn view(&self) -> Screen {
        let user = self.auth.current_user();
        let session = self.auth.status();
        let state = self.state();
        let collection = &state.collection;
        let favorites = collection.favorites();

        let list = match collection.listing() {
            Listing::Recipes(recipes) => render::recipe_list(recipes, favorites),
            Listing::NoGeneratedRecipes => ListView::Empty(render::no_generated_recipes()),
            Listing::Failed(message) => ListView::Empty(render::failure(message)),
        };

        let generated = state.generation.as_ref().map(|generation| match generation {
            Generation::InFlight(ingredients) => render::generating(ingredients),
            Generation::Ready(recipe) => {
                GeneratedPanel::Ready(render::generated_card(recipe, favorites))
            }
            Generation::Failed => GeneratedPanel::Failed(render::generation_failed()),
        });

        Screen {
            tab: collection.tab(),
            list,
            detail: state
                .detail
                .as_ref()
                .map(|recipe| render::recipe_detail(recipe, favorites)),
            loading: self.is_loading(),
            session,
            profile: user.as_ref().map(render::profile),
            ingredients: render::ingredient_panel(collection.ingredients()),
            generated,
            filters: collection.filters().clone(),
        }
    }

    /// Run the operation bound to a rendered element
    pub async fn dispatch(&self, action: Action) -> Result<(), ClientError> {
        tracing::debug!("Dispatching {:?}", action);
        match action {
            Action::ToggleFavorite(id) => {
                self.toggle_favorite(&id);
                Ok(())
            }
            Action::OpenDetails(id) => self.show_details(&id).await,
            Action::CloseDetails => {
                self.close_details();
                Ok(())
            }
            Action::Rate(id, stars) => self.rate(&id, stars).await.map(|_| ()),
            Action::RemoveIngredient(ingredient) => {
                self.remove_ingredient(&ingredient);
                Ok(())
            }
            Action::SwitchTab(tab) => {
                self.switch_tab(tab);
                Ok(())
            }
        }
    }
}
