//! Core domain model for Barcart cocktail recommendations.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Item`: A cocktail record as supplied by the catalog
//! - `FlavorFamily`: The closed set of ingredient flavor families
//! - `IngredientFamily`: A classified ingredient (known family or raw text)
//! - `ScoredRecommendation`: A recommended item with score and breakdown

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Reason attached to curated picks.
pub const BARTENDERS_CHOICE: &str = "Bartender's Choice";

/// Coarse flavor bucket for ingredients.
///
/// Variants are declared in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlavorFamily {
    AmaroAperitif,
    HerbalLiqueur,
    Anise,
    CherryLiqueur,
    OrangeLiqueur,
    NutLiqueur,
    CoffeeLiqueur,
    VermouthFortified,
    Sweetener,
    Acid,
    Carbonated,
    Bitter,
    Dairy,
    BaseSpirit,
}

impl FlavorFamily {
    /// All families, in precedence order.
    pub const ALL: [FlavorFamily; 14] = [
        Self::AmaroAperitif,
        Self::HerbalLiqueur,
        Self::Anise,
        Self::CherryLiqueur,
        Self::OrangeLiqueur,
        Self::NutLiqueur,
        Self::CoffeeLiqueur,
        Self::VermouthFortified,
        Self::Sweetener,
        Self::Acid,
        Self::Carbonated,
        Self::Bitter,
        Self::Dairy,
        Self::BaseSpirit,
    ];

    /// Get the tag used in breakdown reasons and serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AmaroAperitif => "AMARO_APERITIF",
            Self::HerbalLiqueur => "HERBAL_LIQUEUR",
            Self::Anise => "ANISE",
            Self::CherryLiqueur => "CHERRY_LIQUEUR",
            Self::OrangeLiqueur => "ORANGE_LIQUEUR",
            Self::NutLiqueur => "NUT_LIQUEUR",
            Self::CoffeeLiqueur => "COFFEE_LIQUEUR",
            Self::VermouthFortified => "VERMOUTH_FORTIFIED",
            Self::Sweetener => "SWEETENER",
            Self::Acid => "ACID",
            Self::Carbonated => "CARBONATED",
            Self::Bitter => "BITTER",
            Self::Dairy => "DAIRY",
            Self::BaseSpirit => "BASE_SPIRIT",
        }
    }

    /// Whether this family supplies the sweet side of a sour.
    pub fn is_sweet_component(&self) -> bool {
        matches!(
            self,
            Self::Sweetener
                | Self::OrangeLiqueur
                | Self::NutLiqueur
                | Self::CherryLiqueur
                | Self::HerbalLiqueur
                | Self::CoffeeLiqueur
                | Self::AmaroAperitif
                | Self::VermouthFortified
        )
    }
}

impl fmt::Display for FlavorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Result of classifying a single ingredient.
///
/// Ingredients that match no rule act as their own family, keyed by the
/// normalized (lowercased, trimmed) text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientFamily {
    Flavor(FlavorFamily),
    Unclassified(String),
}

impl IngredientFamily {
    pub fn is(&self, family: FlavorFamily) -> bool {
        matches!(self, Self::Flavor(f) if *f == family)
    }

    /// The known family, if any.
    pub fn flavor(&self) -> Option<FlavorFamily> {
        match self {
            Self::Flavor(f) => Some(*f),
            Self::Unclassified(_) => None,
        }
    }
}

impl From<FlavorFamily> for IngredientFamily {
    fn from(family: FlavorFamily) -> Self {
        Self::Flavor(family)
    }
}

impl fmt::Display for IngredientFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flavor(family) => f.write_str(family.tag()),
            Self::Unclassified(raw) => f.write_str(raw),
        }
    }
}

/// A cocktail record from the catalog.
///
/// The engine only reads items; it never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// URL slug
    #[serde(default)]
    pub slug: String,

    /// Spirit category (e.g., "Gin"), may be empty
    #[serde(default)]
    pub base_spirit: String,

    /// Ingredients in recipe order
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Intensity label (e.g., "Light", "Medium", "Heavy")
    #[serde(default)]
    pub body_level: String,

    /// Preparation method (e.g., "Stir", "Shake")
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub glassware: String,

    #[serde(default)]
    pub story: String,

    /// Curated related item ids
    #[serde(default)]
    pub related_ids: Vec<String>,
}

impl Item {
    /// Create a minimal item with only id and name set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: String::new(),
            base_spirit: String::new(),
            ingredients: Vec::new(),
            body_level: String::new(),
            method: String::new(),
            glassware: String::new(),
            story: String::new(),
            related_ids: Vec::new(),
        }
    }

    pub fn with_base_spirit(mut self, base_spirit: impl Into<String>) -> Self {
        self.base_spirit = base_spirit.into();
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_body_level(mut self, body_level: impl Into<String>) -> Self {
        self.body_level = body_level.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_related_ids<I, S>(mut self, related_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_ids = related_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_glassware(mut self, glassware: impl Into<String>) -> Self {
        self.glassware = glassware.into();
        self
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = story.into();
        self
    }
}

/// One named contribution to a similarity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdownItem {
    pub reason: String,
    pub points: i32,
}

impl ScoreBreakdownItem {
    pub fn new(reason: impl Into<String>, points: i32) -> Self {
        Self {
            reason: reason.into(),
            points,
        }
    }
}

/// A recommended item with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    /// The recommended item
    pub item: Item,

    /// Total similarity score
    pub score: i32,

    /// Contributions in rule order
    #[serde(default)]
    pub breakdown: Vec<ScoreBreakdownItem>,

    /// Whether the item came from the curated related ids
    #[serde(default)]
    pub is_manual: bool,
}

/// Data model invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Item has an empty id")]
    EmptyId,

    #[error("Item {id} has an empty name")]
    EmptyName { id: String },

    #[error("Duplicate item id: {id}")]
    DuplicateId { id: String },
}

/// Check catalog invariants (non-empty id and name, unique ids).
///
/// Returns every violation found, in catalog order. The engine itself
/// tolerates violations; this is for callers that want to reject bad data.
pub fn validate_catalog(items: &[Item]) -> Vec<ModelError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for item in items {
        if item.id.trim().is_empty() {
            errors.push(ModelError::EmptyId);
            continue;
        }
        if item.name.trim().is_empty() {
            errors.push(ModelError::EmptyName {
                id: item.id.clone(),
            });
        }
        if !seen.insert(item.id.as_str()) {
            errors.push(ModelError::DuplicateId {
                id: item.id.clone(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_family_tags() {
        assert_eq!(FlavorFamily::AmaroAperitif.to_string(), "AMARO_APERITIF");
        assert_eq!(FlavorFamily::BaseSpirit.tag(), "BASE_SPIRIT");
        assert_eq!(
            serde_json::to_string(&FlavorFamily::VermouthFortified).unwrap(),
            "\"VERMOUTH_FORTIFIED\""
        );
    }

    #[test]
    fn test_sweet_components() {
        assert!(FlavorFamily::Sweetener.is_sweet_component());
        assert!(FlavorFamily::VermouthFortified.is_sweet_component());
        assert!(!FlavorFamily::Acid.is_sweet_component());
        assert!(!FlavorFamily::Bitter.is_sweet_component());
        assert!(!FlavorFamily::Anise.is_sweet_component());
    }

    #[test]
    fn test_unclassified_display() {
        let family = IngredientFamily::Unclassified("mint leaves".into());
        assert_eq!(family.to_string(), "mint leaves");
        assert_eq!(family.flavor(), None);
        assert!(IngredientFamily::from(FlavorFamily::Acid).is(FlavorFamily::Acid));
    }

    #[test]
    fn test_item_deserialize_defaults() {
        let item: Item = serde_json::from_str(r#"{"id": "101", "name": "Old Fashioned"}"#).unwrap();
        assert_eq!(item.id, "101");
        assert!(item.ingredients.is_empty());
        assert!(item.related_ids.is_empty());
        assert_eq!(item.body_level, "");
    }

    #[test]
    fn test_validate_catalog() {
        let items = vec![
            Item::new("101", "Old Fashioned"),
            Item::new("", "Nameless"),
            Item::new("102", " "),
            Item::new("101", "Duplicate"),
        ];

        assert_eq!(
            validate_catalog(&items),
            vec![
                ModelError::EmptyId,
                ModelError::EmptyName { id: "102".into() },
                ModelError::DuplicateId { id: "101".into() },
            ]
        );
    }

    #[test]
    fn test_validate_clean_catalog() {
        let items = vec![Item::new("101", "Old Fashioned"), Item::new("102", "Negroni")];
        assert!(validate_catalog(&items).is_empty());
    }
}
