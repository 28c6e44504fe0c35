//! Trend detection
//!
//! A single left-to-right scan splits each series into maximal monotonic
//! runs. Flat steps extend the current run; a reversal closes it and the
//! next run starts at the point after the turn, so runs never share points.

use implore_io::{SeriesPoint, TabularData};
use implore_stats::SummaryStats;
use tracing::debug;

use super::FactCalculator;
use crate::error::FactResult;
use crate::fact::{Fact, FactKind, TrendFact, TrendType};
use crate::ordering::order_key;
use crate::repository::FactRepository;

/// Detects increase/decrease runs per series
#[derive(Debug, Clone, Default)]
pub struct TrendFactCalculator;

/// Inclusive point span of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub trend_type: TrendType,
}

impl Run {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

impl TrendFactCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Trend facts for every series of the table
    pub fn calculate_trends(&self, table: &TabularData) -> Vec<TrendFact> {
        if !table.has_series_data() {
            return Vec::new();
        }

        table
            .series_names()
            .into_iter()
            .flat_map(|series| {
                let points = ordered_points(table, series);
                self.series_trends(series, &points)
            })
            .collect()
    }

    /// Trend facts for one series given its points in axis order
    pub fn series_trends(&self, series: &str, points: &[SeriesPoint]) -> Vec<TrendFact> {
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let stats = SummaryStats::from_data(&values);

        segment_runs(&values)
            .into_iter()
            .map(|run| {
                let delta = values[run.end] - values[run.start];
                TrendFact {
                    series: series.to_string(),
                    range: points[run.start..=run.end]
                        .iter()
                        .map(|p| p.category.clone())
                        .collect(),
                    trend_type: run.trend_type,
                    score: Self::compute_score(delta, &stats, run.len(), values.len()),
                }
            })
            .collect()
    }

    /// Salience of a run: change in standard deviations, weighted by the
    /// share of the axis it covers, squashed into [0, 1).
    pub fn compute_score(
        delta: f64,
        stats: &SummaryStats,
        run_length: usize,
        total_length: usize,
    ) -> f64 {
        if total_length == 0 || stats.is_degenerate() {
            return 0.0;
        }
        let magnitude = delta.abs() / stats.sample_std_dev();
        let coverage = run_length as f64 / total_length as f64;
        let raw = magnitude * coverage;
        (raw / (1.0 + raw)).clamp(0.0, 1.0)
    }
}

impl FactCalculator for TrendFactCalculator {
    fn kind(&self) -> FactKind {
        FactKind::Trend
    }

    fn calculate(&self, table: &TabularData, _repo: &FactRepository) -> FactResult<Vec<Fact>> {
        let trends = self.calculate_trends(table);
        debug!(count = trends.len(), "trend facts detected");
        Ok(trends.into_iter().map(Fact::from).collect())
    }
}

/// Series points in axis order.
///
/// Rows are sorted by category when every category has an ordering key
/// (years, numbers); otherwise the row order is the axis order.
pub fn ordered_points(table: &TabularData, series: &str) -> Vec<SeriesPoint> {
    let points = table.series_points(series);
    let keys: Option<Vec<f64>> = points.iter().map(|p| order_key(&p.category)).collect();

    match keys {
        Some(keys) => {
            let mut keyed: Vec<(f64, SeriesPoint)> = keys.into_iter().zip(points).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            keyed.into_iter().map(|(_, p)| p).collect()
        }
        None => points,
    }
}

/// Split values into maximal non-overlapping monotonic runs of length >= 2
pub fn segment_runs(values: &[f64]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut direction: Option<TrendType> = None;

    for i in 1..values.len() {
        let step = if values[i] > values[i - 1] {
            Some(TrendType::Increase)
        } else if values[i] < values[i - 1] {
            Some(TrendType::Decrease)
        } else {
            None
        };

        match (direction, step) {
            (_, None) => {}
            (None, Some(d)) => direction = Some(d),
            (Some(current), Some(d)) if current == d => {}
            (Some(current), Some(_)) => {
                runs.push(Run {
                    start,
                    end: i - 1,
                    trend_type: current,
                });
                start = i;
                direction = None;
            }
        }
    }

    if let Some(trend_type) = direction {
        runs.push(Run {
            start,
            end: values.len() - 1,
            trend_type,
        });
    }

    runs
}
