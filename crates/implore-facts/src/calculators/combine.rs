//! Sequential opposite trends within one series ("rose, then fell").

use implore_io::TabularData;
use tracing::debug;

use super::{round_to, FactCalculator};
use crate::config::CombineConfig;
use crate::error::FactResult;
use crate::fact::{CombineFact, Fact, FactKind, TrendFact};
use crate::ordering::strictly_before;
use crate::repository::FactRepository;

/// Pairs time-ordered opposite trends of the same series
#[derive(Debug, Clone, Default)]
pub struct CombineFactCalculator {
    config: CombineConfig,
}

impl CombineFactCalculator {
    pub fn new(config: CombineConfig) -> Self {
        Self { config }
    }

    /// Combined facts over every ordered trend pair of each series.
    ///
    /// A pair qualifies when the first range ends strictly before the second
    /// starts and the directions differ. Pairs whose endpoints cannot be
    /// ordered are skipped.
    pub fn combine_trends(&self, trends: &[TrendFact]) -> Vec<CombineFact> {
        let mut facts = Vec::new();

        for (series, group) in group_by_series(trends) {
            for first in &group {
                for second in &group {
                    if first.trend_type == second.trend_type {
                        continue;
                    }
                    let ordered = match (first.end(), second.start()) {
                        (Some(end), Some(start)) => strictly_before(end, start),
                        _ => false,
                    };
                    if !ordered {
                        continue;
                    }

                    let score = self.compute_score(&[first.score, second.score]);
                    if score < self.config.min_score {
                        continue;
                    }
                    facts.push(CombineFact {
                        series: series.to_string(),
                        contents: vec![first.describe(), second.describe()],
                        score,
                    });
                }
            }
        }
        facts
    }

    /// `max_weight * max(scores) + base`, rounded to three decimals
    pub fn compute_score(&self, scores: &[f64]) -> f64 {
        let best = scores.iter().copied().fold(0.0, f64::max);
        round_to(self.config.max_weight * best + self.config.base, 3)
    }
}

impl FactCalculator for CombineFactCalculator {
    fn kind(&self) -> FactKind {
        FactKind::Combine
    }

    fn calculate(&self, _table: &TabularData, repo: &FactRepository) -> FactResult<Vec<Fact>> {
        let facts = self.combine_trends(&repo.trend_facts);
        debug!(count = facts.len(), "combine facts retained");
        Ok(facts.into_iter().map(Fact::from).collect())
    }
}

/// Trends grouped by series, groups in first-seen order
fn group_by_series(trends: &[TrendFact]) -> Vec<(&str, Vec<&TrendFact>)> {
    let mut groups: Vec<(&str, Vec<&TrendFact>)> = Vec::new();
    for trend in trends {
        match groups.iter_mut().find(|(series, _)| *series == trend.series) {
            Some((_, members)) => members.push(trend),
            None => groups.push((trend.series.as_str(), vec![trend])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::TrendType;
    use serde_json::{json, Value};

    fn trend(series: &str, range: Vec<Value>, trend_type: TrendType, score: f64) -> TrendFact {
        TrendFact {
            series: series.to_string(),
            range,
            trend_type,
            score,
        }
    }

    fn years(from: i64, to: i64) -> Vec<Value> {
        (from..=to).map(|y| json!(y)).collect()
    }

    #[test]
    fn test_rise_then_fall() {
        let trends = vec![
            trend("Tesla", years(2010, 2015), TrendType::Increase, 0.8),
            trend("Tesla", years(2016, 2020), TrendType::Decrease, 0.3),
        ];
        let facts = CombineFactCalculator::default().combine_trends(&trends);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].series, "Tesla");
        assert_eq!(
            facts[0].contents,
            vec!["increase from 2010 to 2015", "decrease from 2016 to 2020"]
        );
        assert_eq!(facts[0].score, 0.92);
    }

    #[test]
    fn test_same_direction_not_combined() {
        let trends = vec![
            trend("A", years(2010, 2012), TrendType::Increase, 0.5),
            trend("A", years(2014, 2016), TrendType::Increase, 0.5),
        ];
        assert!(CombineFactCalculator::default().combine_trends(&trends).is_empty());
    }

    #[test]
    fn test_different_series_not_combined() {
        let trends = vec![
            trend("A", years(2010, 2012), TrendType::Increase, 0.5),
            trend("B", years(2014, 2016), TrendType::Decrease, 0.5),
        ];
        assert!(CombineFactCalculator::default().combine_trends(&trends).is_empty());
    }

    #[test]
    fn test_touching_ranges_not_combined() {
        let trends = vec![
            trend("A", years(2010, 2012), TrendType::Increase, 0.5),
            trend("A", years(2012, 2014), TrendType::Decrease, 0.5),
        ];
        assert!(CombineFactCalculator::default().combine_trends(&trends).is_empty());
    }

    #[test]
    fn test_unorderable_endpoints_skipped() {
        let trends = vec![
            trend("A", vec![json!("Jan"), json!("Feb")], TrendType::Increase, 0.5),
            trend("A", vec![json!("Mar"), json!("Apr")], TrendType::Decrease, 0.5),
        ];
        assert!(CombineFactCalculator::default().combine_trends(&trends).is_empty());
    }

    #[test]
    fn test_fiscal_year_labels() {
        let trends = vec![
            trend(
                "Revenue",
                vec![json!("FY 2015"), json!("FY 2016")],
                TrendType::Decrease,
                0.2,
            ),
            trend(
                "Revenue",
                vec![json!("FY 2017"), json!("FY 2019")],
                TrendType::Increase,
                0.2,
            ),
        ];
        let facts = CombineFactCalculator::default().combine_trends(&trends);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].contents[0], "decrease from FY 2015 to FY 2016");
    }

    #[test]
    fn test_compute_score_floor() {
        let calc = CombineFactCalculator::default();
        assert_eq!(calc.compute_score(&[0.0, 0.0]), 0.6);
        assert_eq!(calc.compute_score(&[1.0, 0.2]), 1.0);
        assert_eq!(calc.compute_score(&[0.123456, 0.1]), 0.649);
    }
}
