//! Score engine: derives per-category and total scores from checked items.
//!
//! Scores are always regenerated in full from the checked-item set. Weights
//! are summed as-is; a category may exceed its maximum only if the rubric
//! itself is malformed, which is an authoring concern.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{CategoryScores, CheckedItem};
use crate::rubric::{CategoryKey, Rubric};

/// Computed per-category totals at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub scores: CategoryScores,
    pub max_scores: CategoryScores,
}

impl ScoreSnapshot {
    /// All categories at zero.
    pub fn zero(rubric: &Rubric) -> Self {
        Self {
            scores: rubric.categories().iter().map(|c| (c.key, 0)).collect(),
            max_scores: max_scores(rubric),
        }
    }

    pub fn score(&self, key: CategoryKey) -> u32 {
        self.scores.get(&key).copied().unwrap_or(0)
    }

    /// Saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.scores.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    pub fn max_total(&self) -> u32 {
        self.max_scores.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.total(), self.max_total())
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }

    pub fn color_band(&self) -> ColorBand {
        ColorBand::from_percentage(self.percentage())
    }
}

/// The static max-score map for a rubric.
pub fn max_scores(rubric: &Rubric) -> CategoryScores {
    rubric
        .categories()
        .iter()
        .map(|c| (c.key, c.max_score))
        .collect()
}

/// Sum checked-item weights into a fresh snapshot.
///
/// Items naming an unknown category are ignored. Order of `items` does not
/// affect the result.
pub fn compute_scores(rubric: &Rubric, items: &[CheckedItem]) -> ScoreSnapshot {
    let mut snapshot = ScoreSnapshot::zero(rubric);
    for item in items {
        let Some(category) = rubric.find(&item.category) else {
            tracing::debug!(category = %item.category, "ignoring item with unknown category");
            continue;
        };
        if let Some(score) = snapshot.scores.get_mut(&category.key) {
            *score = score.saturating_add(item.weight);
        }
    }
    snapshot
}

/// `round(100 * value / max)`, with halves rounded up. Zero when `max` is zero.
pub fn percentage(value: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let value = u64::from(value);
    let max = u64::from(max);
    u32::try_from((200 * value + max) / (2 * max)).unwrap_or(u32::MAX)
}

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            90.. => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::BPlus,
            60..=69 => Grade::B,
            50..=59 => Grade::CPlus,
            40..=49 => Grade::C,
            30..=39 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentational classification of a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    Green,
    Amber,
    Red,
}

impl ColorBand {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            80.. => ColorBand::Green,
            60..=79 => ColorBand::Amber,
            _ => ColorBand::Red,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ColorBand::Green => "#28a745",
            ColorBand::Amber => "#ffc107",
            ColorBand::Red => "#dc3545",
        }
    }
}

impl fmt::Display for ColorBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorBand::Green => write!(f, "green"),
            ColorBand::Amber => write!(f, "amber"),
            ColorBand::Red => write!(f, "red"),
        }
    }
}

/// One row of the per-category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: CategoryKey,
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

/// Summary statistics for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStatistics {
    pub total_score: u32,
    pub max_total_score: u32,
    pub percentage: u32,
    pub color_band: ColorBand,
    pub breakdown: Vec<CategoryBreakdown>,
    pub grade: Grade,
}

/// Per-category breakdown in rubric order.
pub fn breakdown(rubric: &Rubric, snapshot: &ScoreSnapshot) -> Vec<CategoryBreakdown> {
    rubric
        .categories()
        .iter()
        .map(|c| {
            let score = snapshot.score(c.key);
            let max_score = snapshot
                .max_scores
                .get(&c.key)
                .copied()
                .unwrap_or(c.max_score);
            CategoryBreakdown {
                category: c.key,
                name: c.name.to_string(),
                score,
                max_score,
                percentage: percentage(score, max_score),
            }
        })
        .collect()
}

/// Full statistics for a snapshot.
pub fn statistics(rubric: &Rubric, snapshot: &ScoreSnapshot) -> ScoreStatistics {
    let pct = snapshot.percentage();
    ScoreStatistics {
        total_score: snapshot.total(),
        max_total_score: snapshot.max_total(),
        percentage: pct,
        color_band: ColorBand::from_percentage(pct),
        breakdown: breakdown(rubric, snapshot),
        grade: Grade::from_percentage(pct),
    }
}

/// Stateful holder of the current snapshot, owned by the session.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    rubric: &'static Rubric,
    snapshot: ScoreSnapshot,
}

impl ScoreEngine {
    pub fn new(rubric: &'static Rubric) -> Self {
        Self {
            rubric,
            snapshot: ScoreSnapshot::zero(rubric),
        }
    }

    pub fn rubric(&self) -> &'static Rubric {
        self.rubric
    }

    /// Recompute from scratch and return a copy of the new snapshot.
    pub fn compute(&mut self, items: &[CheckedItem]) -> ScoreSnapshot {
        self.snapshot = compute_scores(self.rubric, items);
        tracing::debug!(
            total = self.snapshot.total(),
            items = items.len(),
            "scores recomputed"
        );
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> &ScoreSnapshot {
        &self.snapshot
    }

    pub fn reset(&mut self) {
        self.snapshot = ScoreSnapshot::zero(self.rubric);
    }

    /// Adopt stored per-category scores. Only known categories are taken;
    /// categories absent from `scores` are zero and values above a
    /// category's maximum are clamped to it.
    pub fn set_scores(&mut self, scores: &CategoryScores) {
        self.reset();
        for (key, value) in scores {
            let max = self.rubric.category(*key).max_score;
            if let Some(slot) = self.snapshot.scores.get_mut(key) {
                if *value > max {
                    tracing::warn!(category = %key, value, max, "stored score above maximum");
                }
                *slot = (*value).min(max);
            }
        }
    }

    pub fn statistics(&self) -> ScoreStatistics {
        statistics(self.rubric, &self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(category: &str, weight: u32, text: &str) -> CheckedItem {
        CheckedItem {
            id: None,
            category: category.into(),
            weight,
            text: text.into(),
        }
    }

    fn sample_items() -> Vec<CheckedItem> {
        vec![
            checked("code-quality", 3, "Estrutura de código limpa e legível"),
            checked("code-quality", 2, "Convenções de nomenclatura adequadas"),
            checked("architecture", 4, "Componentização/modularização adequada"),
        ]
    }

    #[test]
    fn scenario_three_items() {
        let snapshot = compute_scores(Rubric::reference(), &sample_items());
        assert_eq!(snapshot.score(CategoryKey::CodeQuality), 5);
        assert_eq!(snapshot.score(CategoryKey::Architecture), 4);
        assert_eq!(snapshot.score(CategoryKey::ProblemSolving), 0);
        assert_eq!(snapshot.score(CategoryKey::Technical), 0);
        assert_eq!(snapshot.score(CategoryKey::Communication), 0);
        assert_eq!(snapshot.total(), 9);
        assert_eq!(snapshot.max_total(), 65);
        assert_eq!(snapshot.percentage(), 14);
        assert_eq!(snapshot.grade(), Grade::F);
        assert_eq!(snapshot.color_band(), ColorBand::Red);
    }

    #[test]
    fn compute_is_order_independent() {
        let rubric = Rubric::reference();
        let items = sample_items();
        let expected = compute_scores(rubric, &items);

        let mut reversed = items.clone();
        reversed.reverse();
        assert_eq!(compute_scores(rubric, &reversed), expected);

        let rotated = [items[1].clone(), items[2].clone(), items[0].clone()];
        assert_eq!(compute_scores(rubric, &rotated), expected);
    }

    #[test]
    fn unknown_categories_are_ignored() {
        let items = vec![checked("design", 5, "x"), checked("technical", 2, "y")];
        let snapshot = compute_scores(Rubric::reference(), &items);
        assert_eq!(snapshot.total(), 2);
        assert_eq!(snapshot.scores.len(), 5);
    }

    #[test]
    fn every_item_checked_reaches_maximum() {
        let rubric = Rubric::reference();
        let items: Vec<_> = rubric
            .items()
            .filter_map(|(id, _)| rubric.checked_item(id))
            .collect();
        let snapshot = compute_scores(rubric, &items);
        assert_eq!(snapshot.total(), 65);
        assert_eq!(snapshot.percentage(), 100);
        assert_eq!(snapshot.grade(), Grade::APlus);
        assert_eq!(snapshot.scores, snapshot.max_scores);
    }

    #[test]
    fn reset_matches_empty_compute() {
        let mut engine = ScoreEngine::new(Rubric::reference());
        let initial = engine.snapshot().clone();
        engine.compute(&sample_items());
        engine.reset();
        assert_eq!(engine.snapshot(), &initial);
        assert_eq!(engine.compute(&[]), initial);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 65), 0);
        assert_eq!(percentage(65, 65), 100);
        // 100 * 1 / 8 = 12.5
        assert_eq!(percentage(1, 8), 13);
        // 100 * 13 / 65 = 20
        assert_eq!(percentage(13, 65), 20);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn grade_thresholds() {
        let cases = [
            (100, "A+"),
            (90, "A+"),
            (89, "A"),
            (80, "A"),
            (79, "B+"),
            (70, "B+"),
            (60, "B"),
            (50, "C+"),
            (40, "C"),
            (30, "D"),
            (29, "F"),
            (0, "F"),
        ];
        for (pct, grade) in cases {
            assert_eq!(Grade::from_percentage(pct).as_str(), grade, "pct {pct}");
        }
    }

    #[test]
    fn color_band_thresholds() {
        assert_eq!(ColorBand::from_percentage(80), ColorBand::Green);
        assert_eq!(ColorBand::from_percentage(79), ColorBand::Amber);
        assert_eq!(ColorBand::from_percentage(60), ColorBand::Amber);
        assert_eq!(ColorBand::from_percentage(59), ColorBand::Red);
        assert_eq!(ColorBand::Green.hex(), "#28a745");
    }

    #[test]
    fn set_scores_only_touches_known_categories() {
        let mut engine = ScoreEngine::new(Rubric::reference());
        let mut stored = CategoryScores::new();
        stored.insert(CategoryKey::Technical, 7);
        engine.compute(&sample_items());
        engine.set_scores(&stored);
        assert_eq!(engine.snapshot().score(CategoryKey::Technical), 7);
        assert_eq!(engine.snapshot().total(), 7);
    }

    #[test]
    fn set_scores_clamps_to_category_maximum() {
        let mut engine = ScoreEngine::new(Rubric::reference());
        let stored: CategoryScores = [
            (CategoryKey::CodeQuality, 1000),
            (CategoryKey::Technical, u32::MAX),
            (CategoryKey::Communication, u32::MAX),
        ]
        .into_iter()
        .collect();
        engine.set_scores(&stored);

        let stats = engine.statistics();
        assert_eq!(engine.snapshot().score(CategoryKey::CodeQuality), 16);
        assert_eq!(stats.total_score, 16 + 15 + 10);
        assert!(stats.percentage <= 100);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut snapshot = ScoreSnapshot::zero(Rubric::reference());
        snapshot.scores.insert(CategoryKey::Technical, u32::MAX);
        snapshot.scores.insert(CategoryKey::Communication, u32::MAX);
        assert_eq!(snapshot.total(), u32::MAX);
        assert_eq!(percentage(u32::MAX, 1), u32::MAX);

        let heavy = vec![checked("technical", u32::MAX, "a"), checked("technical", 1, "b")];
        let snapshot = compute_scores(Rubric::reference(), &heavy);
        assert_eq!(snapshot.score(CategoryKey::Technical), u32::MAX);
    }

    #[test]
    fn statistics_breakdown_in_rubric_order() {
        let mut engine = ScoreEngine::new(Rubric::reference());
        engine.compute(&sample_items());
        let stats = engine.statistics();
        assert_eq!(stats.total_score, 9);
        assert_eq!(stats.max_total_score, 65);
        assert_eq!(stats.breakdown.len(), 5);
        assert_eq!(stats.breakdown[0].category, CategoryKey::CodeQuality);
        assert_eq!(stats.breakdown[0].percentage, 31);
        assert_eq!(stats.breakdown[1].name, "Arquitetura");

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["grade"], "F");
        assert_eq!(json["colorBand"], "red");
    }
}
