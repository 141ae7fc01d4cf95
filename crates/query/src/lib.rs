//! Catalog browsing queries.
//!
//! Filters the catalog for the browse and "vibe" views:
//! - `CatalogFilter`: attribute filters plus free-text search
//! - `Vibe`: intensity and flavor profile selection
//! - `FilterOptions`: distinct values available for each filter

use barcart_features::{has_family, normalize};
use barcart_model::{FlavorFamily, Item};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown intensity: {0}")]
    UnknownIntensity(String),
    #[error("Unknown flavor profile: {0}")]
    UnknownFlavor(String),
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Any-of matching; an empty selection matches everything.
fn matches_any(selected: &[String], value: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| eq_ignore_case(value, s))
}

/// Attribute filters for browsing the catalog.
///
/// Each list matches if the item equals any selected value
/// (case-insensitive). Empty lists are inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub base: Vec<String>,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub method: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub glassware: Vec<String>,
    /// Free-text search over name, story, base spirit and ingredients
    #[serde(default)]
    pub query: Option<String>,
}

impl CatalogFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Whether any attribute list is non-empty.
    pub fn has_active_filters(&self) -> bool {
        [&self.base, &self.body, &self.method, &self.ingredients, &self.glassware]
            .iter()
            .any(|values| !values.is_empty())
    }

    pub fn matches(&self, item: &Item) -> bool {
        let matches_ingredients = self.ingredients.is_empty()
            || self
                .ingredients
                .iter()
                .any(|wanted| item.ingredients.iter().any(|ing| eq_ignore_case(ing, wanted)));

        matches_any(&self.base, &item.base_spirit)
            && matches_any(&self.body, &item.body_level)
            && matches_any(&self.method, &item.method)
            && matches_ingredients
            && matches_any(&self.glassware, &item.glassware)
            && self.matches_query(item)
    }

    fn matches_query(&self, item: &Item) -> bool {
        let query = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        let ingredients = item.ingredients.join(" ");
        let haystack = [
            item.name.as_str(),
            item.story.as_str(),
            item.base_spirit.as_str(),
            ingredients.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        haystack.contains(&query)
    }

    /// Items that pass the filter, in catalog order.
    pub fn apply<'a>(&self, catalog: &'a [Item]) -> Vec<&'a Item> {
        catalog.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Drink intensity, matched against the body level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
    #[default]
    Any,
}

impl FromStr for Intensity {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            "any" | "" => Ok(Self::Any),
            _ => Err(QueryError::UnknownIntensity(s.to_string())),
        }
    }
}

impl Intensity {
    fn label(&self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Medium => Some("medium"),
            Self::Heavy => Some("heavy"),
            Self::Any => None,
        }
    }
}

/// Broad flavor profile, matched against ingredient families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlavorProfile {
    Fizzy,
    SourSweet,
    Bittersweet,
    #[default]
    Any,
}

impl FromStr for FlavorProfile {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fizzy" => Ok(Self::Fizzy),
            "sour/sweet" | "sour-sweet" | "soursweet" | "sour" => Ok(Self::SourSweet),
            "bittersweet" => Ok(Self::Bittersweet),
            "any" | "" => Ok(Self::Any),
            _ => Err(QueryError::UnknownFlavor(s.to_string())),
        }
    }
}

impl FlavorProfile {
    fn families(&self) -> &'static [FlavorFamily] {
        match self {
            Self::Fizzy => &[FlavorFamily::Carbonated],
            Self::SourSweet => &[FlavorFamily::Acid],
            Self::Bittersweet => &[FlavorFamily::AmaroAperitif, FlavorFamily::VermouthFortified],
            Self::Any => &[],
        }
    }
}

/// A mood selection for the vibe view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vibe {
    pub intensity: Intensity,
    pub flavor: FlavorProfile,
}

impl Vibe {
    pub fn new(intensity: Intensity, flavor: FlavorProfile) -> Self {
        Self { intensity, flavor }
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(label) = self.intensity.label() {
            if normalize(&item.body_level) != label {
                return false;
            }
        }

        let wanted = self.flavor.families();
        wanted.is_empty() || wanted.iter().any(|family| has_family(&item.ingredients, *family))
    }
}

/// Items matching the vibe, in catalog order.
pub fn filter_by_vibe<'a>(catalog: &'a [Item], vibe: &Vibe) -> Vec<&'a Item> {
    catalog.iter().filter(|item| vibe.matches(item)).collect()
}

/// Distinct values offered by each browse filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub base_spirit: Vec<String>,
    pub ingredients: Vec<String>,
    pub method: Vec<String>,
    pub body_level: Vec<String>,
}

impl FilterOptions {
    /// Collect trimmed, non-empty, de-duplicated and sorted values.
    pub fn from_catalog(catalog: &[Item]) -> Self {
        fn collect<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        Self {
            base_spirit: collect(catalog.iter().map(|i| i.base_spirit.as_str())),
            ingredients: collect(catalog.iter().flat_map(|i| i.ingredients.iter().map(String::as_str))),
            method: collect(catalog.iter().map(|i| i.method.as_str())),
            body_level: collect(catalog.iter().map(|i| i.body_level.as_str())),
        }
    }
}

pub fn find_by_id<'a>(catalog: &'a [Item], id: &str) -> Option<&'a Item> {
    catalog.iter().find(|item| item.id == id)
}

pub fn find_by_slug<'a>(catalog: &'a [Item], slug: &str) -> Option<&'a Item> {
    catalog.iter().find(|item| item.slug == slug)
}

/// Items whose id appears in `ids`, in catalog order.
pub fn related_items<'a, S: AsRef<str>>(catalog: &'a [Item], ids: &[S]) -> Vec<&'a Item> {
    let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    catalog
        .iter()
        .filter(|item| wanted.contains(item.id.as_str()))
        .collect()
}

/// Name used for alphabetical ordering, without a leading article.
pub fn sort_key(name: &str) -> &str {
    let trimmed = name.trim();
    for article in ["the ", "a ", "an "] {
        if let Some(prefix) = trimmed.get(..article.len()) {
            if prefix.eq_ignore_ascii_case(article) {
                return trimmed[article.len()..].trim();
            }
        }
    }
    trimmed
}

/// Sort items by name, ignoring leading articles and case.
pub fn sort_by_name(items: &mut [&Item]) {
    items.sort_by_key(|item| sort_key(&item.name).to_lowercase());
}
