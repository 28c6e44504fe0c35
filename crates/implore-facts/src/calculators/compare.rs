//! Comparisons within a series, within a category, and between opposite trends.
//!
//! Value comparisons are scored by log relative difference and dropped below
//! the configured threshold. Max-vs-min comparisons are damped since they
//! restate the extremes already covered by aggregates. Opposite-trend
//! comparisons carry no score and are never filtered.

use implore_io::{category_label, TabularData};
use std::collections::HashSet;
use tracing::debug;

use super::FactCalculator;
use crate::config::CompareConfig;
use crate::error::FactResult;
use crate::fact::{CompareFact, CompareSign, Fact, FactKind, TrendFact};
use crate::repository::FactRepository;

/// Guards the relative difference against division by zero
const SCORE_EPSILON: f64 = 1e-6;

/// A labelled value taking part in a comparison
#[derive(Debug, Clone, PartialEq)]
struct Labelled {
    label: String,
    value: f64,
}

/// Builds comparison facts
#[derive(Debug, Clone, Default)]
pub struct CompareFactCalculator {
    config: CompareConfig,
}

impl CompareFactCalculator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    /// All three comparison families for one chart.
    ///
    /// `repo` must already hold the chart's trend facts.
    pub fn calculate_optimized_comparisons(
        &self,
        repo: &FactRepository,
        table: &TabularData,
    ) -> Vec<CompareFact> {
        let mut facts = Vec::new();
        if table.has_series_data() {
            facts.extend(self.within_series(table));
            facts.extend(self.within_category(table));
        }
        facts.extend(self.opposite_trends(&repo.trend_facts));
        facts
    }

    /// Each series compared across its categories
    pub fn within_series(&self, table: &TabularData) -> Vec<CompareFact> {
        let mut facts = Vec::new();
        for series in table.series_names() {
            let values: Vec<Labelled> = table
                .series_points(series)
                .into_iter()
                .map(|p| Labelled {
                    label: format!("{} @ {}", series, category_label(&p.category)),
                    value: p.value,
                })
                .collect();
            facts.extend(self.ranked_comparisons(values));
        }
        facts
    }

    /// Each category compared across its series
    pub fn within_category(&self, table: &TabularData) -> Vec<CompareFact> {
        let mut facts = Vec::new();
        for row in 0..table.num_rows() {
            let category = category_label(&table.category(row));
            let values: Vec<Labelled> = table
                .row_values(row)
                .into_iter()
                .map(|(series, value)| Labelled {
                    label: format!("{} @ {}", series, category),
                    value,
                })
                .collect();
            facts.extend(self.ranked_comparisons(values));
        }
        facts
    }

    /// Trend pairs over an identical range with opposite directions
    pub fn opposite_trends(&self, trends: &[TrendFact]) -> Vec<CompareFact> {
        let mut seen = HashSet::new();
        let mut facts = Vec::new();

        for (i, first) in trends.iter().enumerate() {
            for second in &trends[i + 1..] {
                if first.range != second.range || first.trend_type == second.trend_type {
                    continue;
                }

                let ref1 = format!("{} ({})", first.series, first.trend_type);
                let ref2 = format!("{} ({})", second.series, second.trend_type);
                let mut key = [ref1.clone(), ref2.clone()];
                key.sort();
                let range_key = serde_json::to_string(&first.range).unwrap_or_default();
                if !seen.insert((key, range_key)) {
                    continue;
                }

                facts.push(CompareFact {
                    degree: format!("{} vs {}", first.trend_type, second.trend_type),
                    ref1,
                    ref2,
                    sign: CompareSign::Opposite,
                    score: None,
                });
            }
        }
        facts
    }

    /// Max-vs-min plus every adjacent pair of the values sorted high to low.
    ///
    /// With only two values the extremes are the single adjacent pair, which
    /// is emitted once, undamped.
    fn ranked_comparisons(&self, mut values: Vec<Labelled>) -> Vec<CompareFact> {
        if values.len() < 2 {
            return Vec::new();
        }
        values.sort_by(|a, b| b.value.total_cmp(&a.value));

        let mut facts = Vec::new();
        if values.len() > 2 {
            if let (Some(max), Some(min)) = (values.first(), values.last()) {
                facts.extend(self.make_fact(max, min, true));
            }
        }
        for pair in values.windows(2) {
            facts.extend(self.make_fact(&pair[0], &pair[1], false));
        }
        facts
    }

    fn make_fact(&self, a: &Labelled, b: &Labelled, is_max_min: bool) -> Option<CompareFact> {
        let (sign, degree) = self.get_comparison(Some(a.value), Some(b.value))?;
        let score = self.compute_score(a.value, b.value, is_max_min);
        if score < self.config.min_score {
            return None;
        }
        Some(CompareFact {
            ref1: a.label.clone(),
            ref2: b.label.clone(),
            sign,
            degree,
            score: Some(score),
        })
    }

    /// Sign and formatted degree of `v1` relative to `v2`.
    ///
    /// Ratios far from one are phrased as a multiplier ("4.00x"), the rest as
    /// a signed percentage change ("+12.5%").
    pub fn get_comparison(&self, v1: Option<f64>, v2: Option<f64>) -> Option<(CompareSign, String)> {
        let (v1, v2) = (v1?, v2?);

        let sign = if (v1 - v2).abs() < self.config.similar_epsilon {
            CompareSign::Similar
        } else if v1 > v2 {
            CompareSign::Larger
        } else {
            CompareSign::Smaller
        };

        let ratio = if v2 == 0.0 { f64::INFINITY } else { v1 / v2 };
        let degree = if ratio >= self.config.multiplier_upper || ratio <= self.config.multiplier_lower
        {
            format!("{:.2}x", ratio)
        } else {
            format!("{:+.1}%", (v1 - v2) / v2 * 100.0)
        };

        Some((sign, degree))
    }

    /// Magnitude score: `ln(1 + |v1 - v2| / min(|v1|, |v2|))` squashed into [0, 1)
    pub fn compute_score(&self, v1: f64, v2: f64, is_max_min: bool) -> f64 {
        let base = v1.abs().min(v2.abs()) + SCORE_EPSILON;
        let raw = (1.0 + (v1 - v2).abs() / base).ln();
        let score = raw / (1.0 + raw);
        if is_max_min {
            score * self.config.max_min_damping
        } else {
            score
        }
    }
}

impl FactCalculator for CompareFactCalculator {
    fn kind(&self) -> FactKind {
        FactKind::Compare
    }

    fn calculate(&self, table: &TabularData, repo: &FactRepository) -> FactResult<Vec<Fact>> {
        let facts = self.calculate_optimized_comparisons(repo, table);
        debug!(count = facts.len(), "compare facts retained");
        Ok(facts.into_iter().map(Fact::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::TrendType;
    use rstest::rstest;
    use serde_json::json;

    fn calc() -> CompareFactCalculator {
        CompareFactCalculator::default()
    }

    #[rstest]
    #[case(80.0, 20.0, CompareSign::Larger, "4.00x")]
    #[case(20.0, 80.0, CompareSign::Smaller, "0.25x")]
    #[case(110.0, 100.0, CompareSign::Larger, "+10.0%")]
    #[case(90.0, 100.0, CompareSign::Smaller, "-10.0%")]
    #[case(150.0, 100.0, CompareSign::Larger, "1.50x")]
    #[case(5.0, 0.0, CompareSign::Larger, "infx")]
    #[case(3.0, 3.0, CompareSign::Similar, "+0.0%")]
    fn test_get_comparison(
        #[case] v1: f64,
        #[case] v2: f64,
        #[case] sign: CompareSign,
        #[case] degree: &str,
    ) {
        assert_eq!(
            calc().get_comparison(Some(v1), Some(v2)),
            Some((sign, degree.to_string()))
        );
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(calc().get_comparison(None, Some(1.0)), None);
        assert_eq!(calc().get_comparison(Some(1.0), None), None);
    }

    #[test]
    fn test_compute_score() {
        let score = calc().compute_score(80.0, 20.0, false);
        assert!((score - 0.581).abs() < 1e-3);
        let damped = calc().compute_score(80.0, 20.0, true);
        assert!((damped - score * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_within_category_scenario() {
        let table = TabularData::from_records(
            &["Year", "EV", "Gas"],
            vec![vec![json!("2020"), json!(80), json!(20)]],
        );
        let facts = calc().within_category(&table);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].ref1, "EV @ 2020");
        assert_eq!(facts[0].ref2, "Gas @ 2020");
        assert_eq!(facts[0].sign, CompareSign::Larger);
        assert_eq!(facts[0].degree, "4.00x");
        assert!(facts[0].score.unwrap() >= 0.5);
    }

    #[test]
    fn test_two_values_compared_once() {
        let table = TabularData::from_records(
            &["Year", "A", "B"],
            vec![vec![json!("2020"), json!(100), json!(1)]],
        );
        let facts = calc().within_category(&table);

        // damped, this pair would still clear 0.5
        assert!(calc().compute_score(100.0, 1.0, true) >= 0.5);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].degree, "100.00x");
        let score = facts[0].score.unwrap();
        assert!((score - calc().compute_score(100.0, 1.0, false)).abs() < 1e-12);
    }

    #[test]
    fn test_within_series_sorted_pairs() {
        let table = TabularData::from_records(
            &["Month", "Sales"],
            vec![
                vec![json!("Jan"), json!(10)],
                vec![json!("Feb"), json!(1000)],
                vec![json!("Mar"), json!(100)],
            ],
        );
        let facts = calc().within_series(&table);
        let pairs: Vec<(&str, &str)> = facts
            .iter()
            .map(|f| (f.ref1.as_str(), f.ref2.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("Sales @ Feb", "Sales @ Jan"),
                ("Sales @ Feb", "Sales @ Mar"),
                ("Sales @ Mar", "Sales @ Jan"),
            ]
        );
        assert!(facts.iter().all(|f| f.score.unwrap() >= 0.5));
    }

    #[test]
    fn test_small_differences_filtered() {
        let table = TabularData::from_records(
            &["Month", "Sales"],
            vec![
                vec![json!("Jan"), json!(100)],
                vec![json!("Feb"), json!(101)],
            ],
        );
        assert!(calc().within_series(&table).is_empty());
    }

    fn trend(series: &str, trend_type: TrendType) -> TrendFact {
        TrendFact {
            series: series.to_string(),
            range: vec![json!(2010), json!(2011), json!(2012)],
            trend_type,
            score: 0.6,
        }
    }

    #[test]
    fn test_opposite_trends() {
        let trends = vec![
            trend("EV", TrendType::Increase),
            trend("Gas", TrendType::Decrease),
            trend("Hybrid", TrendType::Increase),
        ];
        let facts = calc().opposite_trends(&trends);

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].ref1, "EV (increase)");
        assert_eq!(facts[0].ref2, "Gas (decrease)");
        assert_eq!(facts[0].sign, CompareSign::Opposite);
        assert_eq!(facts[0].degree, "increase vs decrease");
        assert_eq!(facts[0].score, None);
        assert_eq!(facts[1].ref1, "Gas (decrease)");
        assert_eq!(facts[1].ref2, "Hybrid (increase)");
    }

    #[test]
    fn test_opposite_trends_deduplicated() {
        let trends = vec![
            trend("EV", TrendType::Increase),
            trend("Gas", TrendType::Decrease),
            trend("EV", TrendType::Increase),
        ];
        assert_eq!(calc().opposite_trends(&trends).len(), 1);
    }

    #[test]
    fn test_different_ranges_not_opposed() {
        let mut gas = trend("Gas", TrendType::Decrease);
        gas.range.pop();
        let trends = vec![trend("EV", TrendType::Increase), gas];
        assert!(calc().opposite_trends(&trends).is_empty());
    }
}
