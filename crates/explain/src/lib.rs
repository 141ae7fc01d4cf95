//! Explanation generation for cocktail recommendations.
//!
//! Converts score breakdowns into human-readable text suitable for
//! tooltips and badges in the catalog views.

use barcart_model::{ScoredRecommendation, BARTENDERS_CHOICE};
use serde::{Deserialize, Serialize};

/// A structured explanation for one recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Short title (1 line)
    pub headline: String,

    /// Secondary line under the headline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// One line per scoring rule, in rule order
    pub lines: Vec<ExplanationLine>,

    /// Formatted total, absent for curated picks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// A single scoring rule and its formatted contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationLine {
    pub reason: String,
    pub points: String,
    /// Whether the rule added points (zero counts as positive)
    pub positive: bool,
}

/// Whether a recommendation is a curated pick.
///
/// True when flagged manual or when the breakdown carries the
/// "Bartender's Choice" reason.
pub fn is_bartenders_choice(rec: &ScoredRecommendation) -> bool {
    rec.is_manual || rec.breakdown.iter().any(|b| b.reason == BARTENDERS_CHOICE)
}

/// Format a point delta with an explicit sign for non-negative values.
pub fn format_points(points: i32) -> String {
    if points >= 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

/// Short badge text shown next to a recommendation.
pub fn badge(rec: &ScoredRecommendation) -> String {
    if is_bartenders_choice(rec) {
        BARTENDERS_CHOICE.to_string()
    } else {
        format!("{} pts", rec.score)
    }
}

/// Generate the explanation for a recommendation.
pub fn explain_recommendation(rec: &ScoredRecommendation) -> Explanation {
    if is_bartenders_choice(rec) {
        return Explanation {
            headline: BARTENDERS_CHOICE.to_string(),
            subtitle: Some("Classic Pairing".to_string()),
            lines: Vec::new(),
            total: None,
        };
    }

    Explanation {
        headline: "Score Breakdown".to_string(),
        subtitle: None,
        lines: rec
            .breakdown
            .iter()
            .map(|b| ExplanationLine {
                reason: b.reason.clone(),
                points: format_points(b.points),
                positive: b.points >= 0,
            })
            .collect(),
        total: Some(format!("{} pts", rec.score)),
    }
}

/// Render an explanation as plain text, one rule per line.
pub fn render_text(explanation: &Explanation) -> String {
    let mut out = explanation.headline.clone();
    if let Some(subtitle) = &explanation.subtitle {
        out.push_str(&format!(" ({})", subtitle));
    }

    let width = explanation
        .lines
        .iter()
        .map(|l| l.reason.chars().count())
        .max()
        .unwrap_or(0);
    for line in &explanation.lines {
        out.push_str(&format!("\n  {:<width$}  {:>5}", line.reason, line.points, width = width));
    }
    if let Some(total) = &explanation.total {
        out.push_str(&format!("\n  Total: {}", total));
    }

    out
}
