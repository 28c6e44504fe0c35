//! Global aggregates per series, scored against the series' own spread.

use implore_io::TabularData;
use implore_stats::SummaryStats;
use tracing::debug;

use super::FactCalculator;
use crate::error::FactResult;
use crate::fact::{AggregateFact, AggregateType, Fact, FactKind};
use crate::repository::FactRepository;

/// Range label of aggregates over the whole axis
pub const GLOBAL_RANGE: &str = "all";

/// Computes max/min/avg/sum for each series
#[derive(Debug, Clone, Default)]
pub struct AggregateFactCalculator {
    clamp_scores: bool,
}

impl AggregateFactCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp min scores into [0, 1]
    pub fn with_clamped_scores(mut self, clamp: bool) -> Self {
        self.clamp_scores = clamp;
        self
    }

    /// One fact per aggregate type for every series with a convertible value
    pub fn calculate_global_aggregates(&self, table: &TabularData) -> Vec<AggregateFact> {
        if !table.has_series_data() {
            return Vec::new();
        }

        let mut facts = Vec::new();
        for series in table.series_names() {
            let values = table.series_values(series);
            if values.is_empty() {
                continue;
            }
            let stats = SummaryStats::from_data(&values);

            for aggregate_type in AggregateType::ALL {
                let value = match aggregate_type {
                    AggregateType::Max => stats.max,
                    AggregateType::Min => stats.min,
                    AggregateType::Avg => stats.mean,
                    AggregateType::Sum => stats.sum,
                };
                let score = self.compute_score(
                    aggregate_type,
                    value,
                    &values,
                    values.len(),
                    values.len(),
                );
                facts.push(AggregateFact {
                    obj: series.to_string(),
                    aggregate_type,
                    range: GLOBAL_RANGE.to_string(),
                    value,
                    score,
                });
            }
        }
        facts
    }

    /// Score an aggregate value against the full series.
    ///
    /// Extremes and the mean are scored by their z-score; sums by their
    /// relative departure from `mean * range_length`, weighted by the share of
    /// the axis the range covers.
    pub fn compute_score(
        &self,
        aggregate_type: AggregateType,
        value: f64,
        full_series: &[f64],
        range_length: usize,
        total_length: usize,
    ) -> f64 {
        if full_series.len() < 2 {
            return 0.0;
        }
        let stats = SummaryStats::from_data(full_series);

        match aggregate_type {
            AggregateType::Max => match stats.zscore(value) {
                Some(z) => z / (1.0 + z),
                None => 0.0,
            },
            AggregateType::Min => match stats.zscore(value) {
                Some(z) => {
                    let score = -z / (1.0 - z);
                    if self.clamp_scores {
                        score.clamp(0.0, 1.0)
                    } else {
                        score
                    }
                }
                None => 0.0,
            },
            AggregateType::Avg => match stats.zscore(value) {
                Some(z) => z.abs() / (1.0 + z.abs()),
                None => 0.0,
            },
            AggregateType::Sum => {
                if total_length < 2 {
                    return 0.0;
                }
                let ratio = range_length as f64 / total_length as f64;
                let expected_sum = stats.mean * range_length as f64;
                let rel_change = (value - expected_sum).abs() / (expected_sum.abs() + 1e-8);
                rel_change * ratio
            }
        }
    }
}

impl FactCalculator for AggregateFactCalculator {
    fn kind(&self) -> FactKind {
        FactKind::Aggregate
    }

    fn calculate(&self, table: &TabularData, _repo: &FactRepository) -> FactResult<Vec<Fact>> {
        let facts = self.calculate_global_aggregates(table);
        debug!(count = facts.len(), "aggregate facts computed");
        Ok(facts.into_iter().map(Fact::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn find(facts: &[AggregateFact], series: &str, kind: AggregateType) -> AggregateFact {
        facts
            .iter()
            .find(|f| f.obj == series && f.aggregate_type == kind)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_zero_variance_scores_zero() {
        let table = TabularData::from_records(
            &["x", "flat"],
            vec![
                vec![json!("A"), json!(100)],
                vec![json!("B"), json!(100)],
                vec![json!("C"), json!(100)],
            ],
        );
        let facts = AggregateFactCalculator::new().calculate_global_aggregates(&table);
        assert_eq!(facts.len(), 4);

        for kind in [AggregateType::Max, AggregateType::Min, AggregateType::Avg] {
            assert_eq!(find(&facts, "flat", kind).score, 0.0);
        }
        let sum = find(&facts, "flat", AggregateType::Sum);
        assert_eq!(sum.value, 300.0);
        assert_eq!(sum.range, "all");
        assert!(sum.score.abs() < 1e-9);
    }

    #[test]
    fn test_max_and_min_scores() {
        let calc = AggregateFactCalculator::new();
        let series = [2.0, 4.0, 6.0];
        // mean 4, sample std 2: z(max) = 1, z(min) = -1
        assert!((calc.compute_score(AggregateType::Max, 6.0, &series, 3, 3) - 0.5).abs() < 1e-12);
        assert!((calc.compute_score(AggregateType::Min, 2.0, &series, 3, 3) - 0.5).abs() < 1e-12);
        assert_eq!(calc.compute_score(AggregateType::Avg, 4.0, &series, 3, 3), 0.0);
    }

    #[test]
    fn test_avg_is_symmetric() {
        let calc = AggregateFactCalculator::new();
        let series = [2.0, 4.0, 6.0];
        let above = calc.compute_score(AggregateType::Avg, 6.0, &series, 3, 3);
        let below = calc.compute_score(AggregateType::Avg, 2.0, &series, 3, 3);
        assert!((above - below).abs() < 1e-12);
    }

    #[test]
    fn test_sum_partial_range() {
        let calc = AggregateFactCalculator::new();
        let series = [1.0, 1.0, 1.0, 9.0];
        // mean 3, range of 2 expected 6, observed 10: rel 2/3, ratio 1/2
        let score = calc.compute_score(AggregateType::Sum, 10.0, &series, 2, 4);
        assert!((score - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(calc.compute_score(AggregateType::Sum, 10.0, &series, 1, 1), 0.0);
    }

    #[test]
    fn test_fewer_than_two_values() {
        let calc = AggregateFactCalculator::new();
        assert_eq!(calc.compute_score(AggregateType::Max, 5.0, &[5.0], 1, 1), 0.0);
    }

    #[test]
    fn test_min_score_clamping() {
        let series = [2.0, 4.0, 6.0];
        // a value above the mean passed as "min" gives a negative raw score
        let raw = AggregateFactCalculator::new().compute_score(AggregateType::Min, 5.0, &series, 3, 3);
        assert!(raw < 0.0);
        let clamped = AggregateFactCalculator::new()
            .with_clamped_scores(true)
            .compute_score(AggregateType::Min, 5.0, &series, 3, 3);
        assert_eq!(clamped, 0.0);
    }

    #[test]
    fn test_unparsable_values_discarded() {
        let table = TabularData::from_records(
            &["x", "y"],
            vec![
                vec![json!("A"), json!("1,000")],
                vec![json!("B"), json!("oops")],
                vec![json!("C"), json!("50%")],
            ],
        );
        let facts = AggregateFactCalculator::new().calculate_global_aggregates(&table);
        assert_eq!(find(&facts, "y", AggregateType::Sum).value, 1050.0);
        assert_eq!(find(&facts, "y", AggregateType::Avg).value, 525.0);
    }

    #[test]
    fn test_series_without_values_skipped() {
        let table = TabularData::from_records(
            &["x", "y", "z"],
            vec![vec![json!("A"), json!(null), json!(3)]],
        );
        let facts = AggregateFactCalculator::new().calculate_global_aggregates(&table);
        assert_eq!(facts.len(), 4);
        assert!(facts.iter().all(|f| f.obj == "z"));
    }
}
