//! Feature extraction for cocktail recommendations.
//!
//! Provides pure functions for computing features used in scoring:
//! - Ingredient classification into flavor families
//! - Per-item family sets
//! - Catalog-wide family distribution (rare vs common)

use barcart_model::{FlavorFamily, IngredientFamily, Item};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Default rarity threshold as a percentage of catalog size.
pub const DEFAULT_RARITY_PERCENT: usize = 10;

/// Ordered classification rules. First matching family wins, so the order
/// of this table is significant.
const FAMILY_RULES: &[(FlavorFamily, &[&str])] = &[
    (
        FlavorFamily::AmaroAperitif,
        &[
            "campari", "aperol", "amaro", "cynar", "fernet", "suze", "averna",
            "montenegro", "aperitivo", "picon", "gran classico",
        ],
    ),
    (
        FlavorFamily::HerbalLiqueur,
        &[
            "chartreuse", "benedictine", "bénédictine", "galliano", "strega",
            "drambuie", "jägermeister", "jagermeister", "elderflower",
            "st-germain", "st germain", "falernum",
        ],
    ),
    (
        FlavorFamily::Anise,
        &[
            "absinthe", "pastis", "pernod", "ricard", "anise", "anisette",
            "sambuca", "ouzo", "herbsaint",
        ],
    ),
    (
        FlavorFamily::CherryLiqueur,
        &["maraschino", "cherry", "kirsch", "heering"],
    ),
    (
        FlavorFamily::OrangeLiqueur,
        &[
            "triple sec", "cointreau", "grand marnier", "curaçao", "curacao",
            "orange liqueur",
        ],
    ),
    (
        FlavorFamily::NutLiqueur,
        &["amaretto", "orgeat", "frangelico", "nocino", "hazelnut", "almond"],
    ),
    (
        FlavorFamily::CoffeeLiqueur,
        &["kahlua", "kahlúa", "coffee", "espresso", "tia maria"],
    ),
    (
        FlavorFamily::VermouthFortified,
        &[
            "vermouth", "lillet", "cocchi", "dubonnet", "sherry", "port wine",
            "ruby port", "tawny port", "madeira", "marsala", "byrrh",
            "punt e mes", "quinquina",
        ],
    ),
    (
        FlavorFamily::Sweetener,
        &["syrup", "sugar", "honey", "agave", "grenadine", "demerara", "maple", "gomme"],
    ),
    (
        FlavorFamily::Acid,
        &["lime", "lemon", "grapefruit", "yuzu", "citric", "verjus"],
    ),
    (
        FlavorFamily::Carbonated,
        &[
            "soda", "tonic", "ginger beer", "ginger ale", "sparkling",
            "champagne", "prosecco", "cava", "cola", "seltzer",
        ],
    ),
    (FlavorFamily::Bitter, &["bitter", "angostura", "peychaud"]),
    (FlavorFamily::Dairy, &["cream", "milk", "egg", "butter", "yogurt"]),
    (
        FlavorFamily::BaseSpirit,
        &[
            "gin", "vodka", "rum", "whisky", "whiskey", "bourbon", "rye",
            "scotch", "tequila", "mezcal", "brandy", "cognac", "pisco",
            "cachaça", "cachaca", "armagnac", "calvados", "genever", "applejack",
        ],
    ),
];

/// Short triggers that only match as whole words ("cola" is not "chocolate",
/// "gin" is not "ginger").
const WHOLE_WORD_TRIGGERS: &[&str] = &["gin", "rum", "rye", "cola", "cava", "egg"];

/// Check for `word` in `text` bounded by non-alphanumeric characters.
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn matches_trigger(text: &str, trigger: &str) -> bool {
    if WHOLE_WORD_TRIGGERS.contains(&trigger) {
        contains_word(text, trigger)
    } else {
        text.contains(trigger)
    }
}

/// Normalize free text for comparison (lowercase, trimmed).
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Classify an ingredient into its flavor family.
///
/// Falls back to the normalized text itself when no rule matches.
pub fn classify(ingredient: &str) -> IngredientFamily {
    let normalized = normalize(ingredient);

    FAMILY_RULES
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| matches_trigger(&normalized, t)))
        .map(|(family, _)| IngredientFamily::Flavor(*family))
        .unwrap_or(IngredientFamily::Unclassified(normalized))
}

/// Distinct families of an ingredient list, in first-seen order.
pub fn family_set<S: AsRef<str>>(ingredients: &[S]) -> Vec<IngredientFamily> {
    let mut families: Vec<IngredientFamily> = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        let family = classify(ingredient.as_ref());
        if !families.contains(&family) {
            families.push(family);
        }
    }
    families
}

/// Check whether any ingredient belongs to the given family.
pub fn has_family<S: AsRef<str>>(ingredients: &[S], family: FlavorFamily) -> bool {
    ingredients
        .iter()
        .any(|ing| classify(ing.as_ref()).is(family))
}

/// Item counts per family across a catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientDistribution {
    counts: BTreeMap<IngredientFamily, usize>,
    total_items: usize,
    threshold: usize,
    rare: BTreeSet<IngredientFamily>,
    common: BTreeSet<IngredientFamily>,
}

/// A single row of the distribution, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyCount {
    pub family: IngredientFamily,
    pub count: usize,
    pub rare: bool,
}

/// Compute the family distribution with the default rarity threshold.
pub fn analyze(catalog: &[Item]) -> IngredientDistribution {
    IngredientDistribution::with_rarity_percent(catalog, DEFAULT_RARITY_PERCENT)
}

/// Rarity threshold for a catalog size: `max(1, floor(total * percent / 100))`.
pub fn rarity_threshold(total_items: usize, rarity_percent: usize) -> usize {
    (total_items * rarity_percent / 100).max(1)
}

impl IngredientDistribution {
    /// Compute the distribution, treating families present in fewer than
    /// `rarity_percent` percent of items as rare.
    pub fn with_rarity_percent(catalog: &[Item], rarity_percent: usize) -> Self {
        let counts = catalog
            .iter()
            .fold(BTreeMap::new(), |mut counts, item| {
                for family in family_set(&item.ingredients) {
                    *counts.entry(family).or_insert(0usize) += 1;
                }
                counts
            });

        let total_items = catalog.len();
        let threshold = rarity_threshold(total_items, rarity_percent);

        let mut rare = BTreeSet::new();
        let mut common = BTreeSet::new();
        for (family, count) in &counts {
            if *count < threshold {
                rare.insert(family.clone());
            } else {
                common.insert(family.clone());
            }
        }

        Self {
            counts,
            total_items,
            threshold,
            rare,
            common,
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of items containing the family (0 if never seen).
    pub fn count(&self, family: &IngredientFamily) -> usize {
        self.counts.get(family).copied().unwrap_or(0)
    }

    pub fn is_rare(&self, family: &IngredientFamily) -> bool {
        self.rare.contains(family)
    }

    pub fn is_common(&self, family: &IngredientFamily) -> bool {
        self.common.contains(family)
    }

    pub fn rare_families(&self) -> impl Iterator<Item = &IngredientFamily> {
        self.rare.iter()
    }

    pub fn common_families(&self) -> impl Iterator<Item = &IngredientFamily> {
        self.common.iter()
    }

    /// All families, most frequent first.
    pub fn entries(&self) -> Vec<FamilyCount> {
        let mut entries: Vec<FamilyCount> = self
            .counts
            .iter()
            .map(|(family, count)| FamilyCount {
                family: family.clone(),
                count: *count,
                rare: self.rare.contains(family),
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flavor(family: FlavorFamily) -> IngredientFamily {
        IngredientFamily::Flavor(family)
    }

    fn item(id: &str, ingredients: &[&str]) -> Item {
        Item::new(id, format!("Cocktail {}", id)).with_ingredients(ingredients.iter().copied())
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify("Maraschino Cherry"), flavor(FlavorFamily::CherryLiqueur));
        assert_eq!(classify("Cherry Bitters"), flavor(FlavorFamily::CherryLiqueur));
        assert_eq!(classify("Orange Bitters"), flavor(FlavorFamily::Bitter));
        assert_eq!(classify("Ginger Ale"), flavor(FlavorFamily::Carbonated));
        assert_eq!(classify("Lemonade"), flavor(FlavorFamily::Acid));
    }

    #[test]
    fn test_classify_families() {
        assert_eq!(classify("Campari"), flavor(FlavorFamily::AmaroAperitif));
        assert_eq!(classify("Aperol"), flavor(FlavorFamily::AmaroAperitif));
        assert_eq!(classify("Green Chartreuse"), flavor(FlavorFamily::HerbalLiqueur));
        assert_eq!(classify("Absinthe rinse"), flavor(FlavorFamily::Anise));
        assert_eq!(classify("Triple Sec"), flavor(FlavorFamily::OrangeLiqueur));
        assert_eq!(classify("Orgeat"), flavor(FlavorFamily::NutLiqueur));
        assert_eq!(classify("Kahlúa"), flavor(FlavorFamily::CoffeeLiqueur));
        assert_eq!(classify("Sweet Vermouth"), flavor(FlavorFamily::VermouthFortified));
        assert_eq!(classify("Simple Syrup"), flavor(FlavorFamily::Sweetener));
        assert_eq!(classify("Fresh Lime Juice"), flavor(FlavorFamily::Acid));
        assert_eq!(classify("Club Soda"), flavor(FlavorFamily::Carbonated));
        assert_eq!(classify("Angostura"), flavor(FlavorFamily::Bitter));
        assert_eq!(classify("Egg White"), flavor(FlavorFamily::Dairy));
        assert_eq!(classify("Rye Whisky"), flavor(FlavorFamily::BaseSpirit));
    }

    #[test]
    fn test_classify_short_triggers_need_whole_words() {
        assert_eq!(classify("Chocolate Bitters"), flavor(FlavorFamily::Bitter));
        assert_eq!(
            classify("Chocolate Liqueur"),
            IngredientFamily::Unclassified("chocolate liqueur".to_string())
        );
        assert_eq!(
            classify("Fresh Ginger"),
            IngredientFamily::Unclassified("fresh ginger".to_string())
        );
        assert_eq!(classify("Coca-Cola"), flavor(FlavorFamily::Carbonated));
        assert_eq!(classify("Old Tom Gin"), flavor(FlavorFamily::BaseSpirit));
        assert_eq!(classify("Dark Rum"), flavor(FlavorFamily::BaseSpirit));
        assert_eq!(classify("Whole Egg"), flavor(FlavorFamily::Dairy));
    }

    #[test]
    fn test_classify_fallback_normalizes() {
        assert_eq!(
            classify("  Mint Leaves "),
            IngredientFamily::Unclassified("mint leaves".to_string())
        );
        assert_eq!(classify(""), IngredientFamily::Unclassified(String::new()));
    }

    #[test]
    fn test_family_set_dedupes_in_order() {
        let families = family_set(&["Lime", "Gin", "Lemon", "Simple Syrup", "Lime"]);
        assert_eq!(
            families,
            vec![
                flavor(FlavorFamily::Acid),
                flavor(FlavorFamily::BaseSpirit),
                flavor(FlavorFamily::Sweetener),
            ]
        );
    }

    #[test]
    fn test_has_family() {
        assert!(has_family(&["Gin", "Tonic Water"], FlavorFamily::Carbonated));
        assert!(!has_family(&["Gin", "Campari"], FlavorFamily::Carbonated));
        assert!(!has_family::<&str>(&[], FlavorFamily::Acid));
    }

    #[test]
    fn test_distribution_counts_items_once_per_family() {
        let catalog = vec![
            item("1", &["Lime", "Lemon", "Gin"]),
            item("2", &["Lime", "Vodka"]),
            item("3", &["Campari"]),
        ];
        let dist = analyze(&catalog);

        assert_eq!(dist.total_items(), 3);
        assert_eq!(dist.count(&flavor(FlavorFamily::Acid)), 2);
        assert_eq!(dist.count(&flavor(FlavorFamily::BaseSpirit)), 2);
        assert_eq!(dist.count(&flavor(FlavorFamily::AmaroAperitif)), 1);
        assert_eq!(dist.count(&flavor(FlavorFamily::Dairy)), 0);
    }

    #[test]
    fn test_rarity_boundary() {
        // 10 items -> threshold 1; a family seen once is common, not rare.
        let mut catalog: Vec<Item> = (0..9).map(|i| item(&i.to_string(), &["Gin"])).collect();
        catalog.push(item("9", &["Gin", "Campari"]));
        let dist = analyze(&catalog);

        assert_eq!(dist.threshold(), 1);
        assert!(dist.is_common(&flavor(FlavorFamily::AmaroAperitif)));
        assert!(!dist.is_rare(&flavor(FlavorFamily::AmaroAperitif)));
    }

    #[test]
    fn test_rare_below_threshold() {
        // 20 items -> threshold 2; a family seen once is rare, twice is common.
        let mut catalog: Vec<Item> = (0..17).map(|i| item(&i.to_string(), &["Gin"])).collect();
        catalog.push(item("17", &["Gin", "Campari"]));
        catalog.push(item("18", &["Gin", "Lime"]));
        catalog.push(item("19", &["Gin", "Lime"]));
        let dist = analyze(&catalog);

        assert_eq!(dist.threshold(), 2);
        assert!(dist.is_rare(&flavor(FlavorFamily::AmaroAperitif)));
        assert!(dist.is_common(&flavor(FlavorFamily::Acid)));
        assert!(dist.is_common(&flavor(FlavorFamily::BaseSpirit)));
        assert_eq!(dist.rare_families().count(), 1);
    }

    #[test]
    fn test_empty_catalog() {
        let dist = analyze(&[]);
        assert!(dist.is_empty());
        assert_eq!(dist.total_items(), 0);
        assert_eq!(dist.threshold(), 1);
        assert_eq!(dist.common_families().count(), 0);
    }

    #[test]
    fn test_custom_rarity_percent() {
        let catalog: Vec<Item> = (0..10).map(|i| item(&i.to_string(), &["Gin"])).collect();
        assert_eq!(IngredientDistribution::with_rarity_percent(&catalog, 50).threshold(), 5);
        assert_eq!(rarity_threshold(3, 10), 1);
        assert_eq!(rarity_threshold(45, 10), 4);
    }

    #[test]
    fn test_entries_sorted_by_count() {
        let catalog = vec![
            item("1", &["Gin", "Lime"]),
            item("2", &["Gin"]),
        ];
        let entries = analyze(&catalog).entries();
        assert_eq!(entries[0].family, flavor(FlavorFamily::BaseSpirit));
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[1].count, 1);
    }
}
