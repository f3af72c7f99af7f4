use serde::Serialize;

use crate::models::{FilterState, Id, Tab};
use crate::services::SessionStatus;

/// Interaction bound to a rendered element. Dispatched back through `App::dispatch`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleFavorite(Id),
    OpenDetails(Id),
    CloseDetails,
    Rate(Id, u8),
    RemoveIngredient(String),
    SwitchTab(Tab),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum Badge {
    Vegan,
    Vegetarian,
    GlutenFree,
    /// Spice level text, e.g. "Hot"
    Spice(String),
    AiGenerated,
}

impl Badge {
    pub fn label(&self) -> String {
        match self {
            Badge::Vegan => "Vegan".to_string(),
            Badge::Vegetarian => "Vegetarian".to_string(),
            Badge::GlutenFree => "Gluten-Free".to_string(),
            Badge::Spice(level) => level.clone(),
            Badge::AiGenerated => "AI Generated".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Star {
    pub value: u8,
    /// Highlighted by the average rating
    pub active: bool,
    /// Highlighted by the signed-in user's own rating
    pub user_rated: bool,
    pub action: Action,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RatingRow {
    pub stars: Vec<Star>,
    pub caption: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RecipeCard {
    pub id: Id,
    pub name: String,
    pub image_url: String,
    pub country: String,
    pub origin: Option<String>,
    pub cuisine_type: Option<String>,
    pub description: String,
    pub prep_time: String,
    pub difficulty: String,
    pub is_favorite: bool,
    pub badges: Vec<Badge>,
    pub rating: RatingRow,
    pub open: Action,
    pub favorite: Action,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RecipeDetail {
    pub id: Id,
    pub name: String,
    pub image_url: String,
    pub country: String,
    pub origin: Option<String>,
    pub cuisine_type: Option<String>,
    pub prep_time: String,
    pub difficulty: String,
    pub badges: Vec<Badge>,
    pub health_benefits: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub rating: RatingRow,
    pub is_favorite: bool,
    pub favorite: Action,
    pub close: Action,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum ListView {
    Cards(Vec<RecipeCard>),
    Empty(EmptyState),
}

impl ListView {
    pub fn cards(&self) -> &[RecipeCard] {
        match self {
            ListView::Cards(cards) => cards,
            ListView::Empty(_) => &[],
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IngredientTag {
    pub label: String,
    pub remove: Action,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IngredientPanel {
    pub tags: Vec<IngredientTag>,
    /// Shown instead of tags when the list is empty
    pub placeholder: Option<String>,
    pub can_generate: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GeneratedCard {
    pub id: Id,
    pub name: String,
    pub cuisine_type: Option<String>,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub is_favorite: bool,
    pub favorite: Action,
    pub open: Action,
}

/// State of the generator output area
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum GeneratedPanel {
    Generating { message: String, detail: String },
    Ready(GeneratedCard),
    Failed(EmptyState),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub initials: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Transient user message (toast or alert)
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Screen {
    pub tab: Tab,
    pub list: ListView,
    pub detail: Option<RecipeDetail>,
    pub loading: bool,
    pub session: SessionStatus,
    pub profile: Option<ProfileView>,
    pub ingredients: IngredientPanel,
    pub generated: Option<GeneratedPanel>,
    pub filters: FilterState,
}
