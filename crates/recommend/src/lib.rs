//! Similarity scoring and hybrid selection for cocktail recommendations.
//!
//! Takes a target item and the catalog and produces a short ranked list:
//! curated picks first, then the best-scoring catalog items, each with a
//! breakdown of the rules that contributed to its score.

use barcart_features::{family_set, normalize, IngredientDistribution};
use barcart_model::{
    FlavorFamily, IngredientFamily, Item, ScoreBreakdownItem, ScoredRecommendation,
    BARTENDERS_CHOICE,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Point values for each scoring rule.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Fixed score for curated picks
    pub manual_pick: i32,
    /// Both items share a Sour/Daisy or Highball structure
    pub structure_synergy: i32,
    /// Shared family that few catalog items contain
    pub rare_family_match: i32,
    /// Shared family that many catalog items contain
    pub common_family_match: i32,
    /// Same base spirit
    pub base_spirit_match: i32,
    /// Applied (as a negative number) when body levels differ
    pub body_level_mismatch: i32,
    /// Complexity points at zero ingredient-count difference
    pub complexity_base: i32,
    /// Complexity points lost per ingredient of difference
    pub complexity_step: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            manual_pick: 10_000,
            structure_synergy: 20,
            rare_family_match: 30,
            common_family_match: 5,
            base_spirit_match: 15,
            body_level_mismatch: -10,
            complexity_base: 20,
            complexity_step: 7,
        }
    }
}

/// Configuration for the recommender.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    pub weights: ScoringWeights,
    /// Maximum number of recommendations returned
    pub max_results: usize,
    /// Algorithmic picks scoring below this are dropped
    pub min_score: i32,
    /// Families in fewer than this percentage of items count as rare
    pub rarity_percent: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_results: 6,
            min_score: 40,
            rarity_percent: barcart_features::DEFAULT_RARITY_PERCENT,
        }
    }
}

/// Score and breakdown for a single target/candidate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairScore {
    pub score: i32,
    pub breakdown: Vec<ScoreBreakdownItem>,
}

impl PairScore {
    fn push(&mut self, reason: impl Into<String>, points: i32) {
        self.score += points;
        self.breakdown.push(ScoreBreakdownItem::new(reason, points));
    }
}

/// Drink archetype signals for one item.
#[derive(Debug, Clone, Copy)]
struct Structure {
    has_base_spirit: bool,
    has_acid: bool,
    has_sweet: bool,
    has_carbonated: bool,
}

impl Structure {
    fn of(item: &Item, families: &[IngredientFamily]) -> Self {
        let has = |family: FlavorFamily| families.iter().any(|f| f.is(family));

        Self {
            has_base_spirit: !item.base_spirit.trim().is_empty(),
            has_acid: has(FlavorFamily::Acid),
            has_sweet: families
                .iter()
                .filter_map(IngredientFamily::flavor)
                .any(|f| f.is_sweet_component()),
            has_carbonated: has(FlavorFamily::Carbonated),
        }
    }

    fn is_sour(&self) -> bool {
        self.has_base_spirit && self.has_acid && self.has_sweet
    }

    fn is_highball(&self) -> bool {
        self.has_base_spirit && self.has_carbonated
    }
}

/// Score how similar `candidate` is to `target`.
///
/// Rules are applied in a fixed order and each contributes at most one
/// breakdown entry, except family matches which add one entry per shared
/// family. Curated picks short-circuit with the manual score.
pub fn score(
    target: &Item,
    candidate: &Item,
    distribution: &IngredientDistribution,
    is_manual_pick: bool,
    weights: &ScoringWeights,
) -> PairScore {
    let mut result = PairScore {
        score: 0,
        breakdown: Vec::new(),
    };

    if is_manual_pick {
        result.score = weights.manual_pick;
        result.breakdown.push(ScoreBreakdownItem::new(BARTENDERS_CHOICE, 0));
        return result;
    }

    let target_families = family_set(&target.ingredients);
    let candidate_families = family_set(&candidate.ingredients);

    // Structure synergy; a pair that is both sour and highball only gets the sour bonus
    let target_structure = Structure::of(target, &target_families);
    let candidate_structure = Structure::of(candidate, &candidate_families);
    if target_structure.is_sour() && candidate_structure.is_sour() {
        result.push("Structure Synergy (Sour/Daisy)", weights.structure_synergy);
    } else if target_structure.is_highball() && candidate_structure.is_highball() {
        result.push("Structure Synergy (Highball)", weights.structure_synergy);
    }

    // Family overlap, base spirit is scored on its own below
    for family in &target_families {
        if family.is(FlavorFamily::BaseSpirit) || !candidate_families.contains(family) {
            continue;
        }
        if distribution.is_rare(family) {
            result.push(format!("Rare Family Match: {}", family), weights.rare_family_match);
        } else if distribution.is_common(family) {
            result.push(format!("Common Family Match: {}", family), weights.common_family_match);
        } else {
            result.push(format!("Family Match: {}", family), weights.common_family_match);
        }
    }

    let target_spirit = normalize(&target.base_spirit);
    if !target_spirit.is_empty() && target_spirit == normalize(&candidate.base_spirit) {
        result.push("Base Spirit Match", weights.base_spirit_match);
    }

    if normalize(&target.body_level) != normalize(&candidate.body_level) {
        result.push("Body Level Mismatch", weights.body_level_mismatch);
    }

    let diff = target.ingredients.len().abs_diff(candidate.ingredients.len());
    let diff_points = i32::try_from(diff).unwrap_or(i32::MAX).saturating_mul(weights.complexity_step);
    result.push(
        format!("Complexity Adjustment (diff: {})", diff),
        weights.complexity_base.saturating_sub(diff_points),
    );

    result
}

/// Recommendation engine over a borrowed catalog snapshot.
///
/// Holds the catalog's id index and family distribution so they can be
/// reused across targets. Rebuild it when the catalog changes.
#[derive(Debug)]
pub struct Recommender<'a> {
    catalog: &'a [Item],
    index: HashMap<&'a str, &'a Item>,
    distribution: IngredientDistribution,
    config: RecommendConfig,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a [Item], config: RecommendConfig) -> Self {
        let mut index = HashMap::with_capacity(catalog.len());
        for item in catalog {
            index.entry(item.id.as_str()).or_insert(item);
        }
        let distribution = IngredientDistribution::with_rarity_percent(catalog, config.rarity_percent);

        Self {
            catalog,
            index,
            distribution,
            config,
        }
    }

    pub fn distribution(&self) -> &IngredientDistribution {
        &self.distribution
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&'a Item> {
        self.index.get(id).copied()
    }

    /// Recommend using the target's own curated related ids.
    pub fn recommend_for(&self, target: &Item) -> Vec<ScoredRecommendation> {
        self.recommend(target, &target.related_ids)
    }

    /// Recommend items similar to `target`.
    ///
    /// Curated ids are taken first in the order given, then the remaining
    /// slots are filled by score. Algorithmic picks under `min_score` are
    /// dropped afterwards without backfilling, so fewer than `max_results`
    /// may be returned.
    pub fn recommend<S: AsRef<str>>(
        &self,
        target: &Item,
        manual_related_ids: &[S],
    ) -> Vec<ScoredRecommendation> {
        let max_results = self.config.max_results;
        let weights = &self.config.weights;

        let mut used: HashSet<&str> = HashSet::new();
        used.insert(target.id.as_str());
        let mut result: Vec<ScoredRecommendation> = Vec::with_capacity(max_results);

        for id in manual_related_ids {
            if result.len() >= max_results {
                break;
            }
            let Some(item) = self.get(id.as_ref()) else {
                continue;
            };
            if !used.insert(item.id.as_str()) {
                continue;
            }
            let pair = score(target, item, &self.distribution, true, weights);
            result.push(ScoredRecommendation {
                item: item.clone(),
                score: pair.score,
                breakdown: pair.breakdown,
                is_manual: true,
            });
        }
        let manual_count = result.len();

        if result.len() < max_results {
            let mut scored: Vec<(&Item, PairScore)> = self
                .catalog
                .iter()
                .filter(|item| !used.contains(item.id.as_str()))
                .map(|item| (item, score(target, item, &self.distribution, false, weights)))
                .collect();
            scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));

            for (item, pair) in scored {
                if result.len() >= max_results {
                    break;
                }
                if !used.insert(item.id.as_str()) {
                    continue;
                }
                trace!(id = %item.id, score = pair.score, "algorithmic pick");
                result.push(ScoredRecommendation {
                    item: item.clone(),
                    score: pair.score,
                    breakdown: pair.breakdown,
                    is_manual: false,
                });
            }
        }

        result.sort_by(|a, b| b.score.cmp(&a.score));
        let before_filter = result.len();
        let min_score = self.config.min_score;
        result.retain(|rec| rec.is_manual || rec.score >= min_score);

        debug!(
            target_id = %target.id,
            manual = manual_count,
            selected = before_filter,
            returned = result.len(),
            "recommendations computed"
        );

        result
    }
}

/// Recommend items similar to `target` from `catalog`.
///
/// Builds a fresh [`Recommender`] for the call; use the struct directly to
/// reuse the distribution across several targets.
pub fn recommend<S: AsRef<str>>(
    target: &Item,
    catalog: &[Item],
    manual_related_ids: &[S],
    config: &RecommendConfig,
) -> Vec<ScoredRecommendation> {
    Recommender::new(catalog, config.clone()).recommend(target, manual_related_ids)
}
