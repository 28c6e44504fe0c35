//! One trend pattern shared by several series.
//!
//! Trends are grouped by identical (range, direction). Every subset of two or
//! more members of a group is a merge candidate.

use implore_io::TabularData;
use tracing::debug;

use super::FactCalculator;
use crate::config::MergeConfig;
use crate::error::FactResult;
use crate::fact::{Fact, FactKind, MergeFact, TrendFact};
use crate::repository::FactRepository;

/// Merges identical trends across series
#[derive(Debug, Clone, Default)]
pub struct MergeFactCalculator {
    config: MergeConfig,
    clamp_scores: bool,
}

impl MergeFactCalculator {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            clamp_scores: false,
        }
    }

    /// Clamp scores into [0, 1]
    pub fn with_clamped_scores(mut self, clamp: bool) -> Self {
        self.clamp_scores = clamp;
        self
    }

    /// Merge candidates for the table's trends.
    ///
    /// Groups larger than `max_group_size` are cut down to their highest
    /// scoring members before subsets are enumerated.
    pub fn merge_trends(&self, table: &TabularData, trends: &[TrendFact]) -> Vec<MergeFact> {
        let total_series = table.num_series();
        let mut facts = Vec::new();

        for group in group_by_pattern(trends) {
            if group.len() < 2 {
                continue;
            }
            let content = group[0].describe();
            let group = self.strongest_members(group);

            for size in 2..=group.len() {
                for subset in combinations(group.len(), size) {
                    let best = subset.iter().map(|&i| group[i].score).fold(0.0, f64::max);
                    let score = self.compute_score(best, subset.len(), total_series);
                    if score < self.config.min_score {
                        continue;
                    }
                    facts.push(MergeFact {
                        merged_obj: subset.iter().map(|&i| group[i].series.clone()).collect(),
                        content: content.clone(),
                        score,
                    });
                }
            }
        }
        facts
    }

    /// At most `max_group_size` members by descending score, in series order
    fn strongest_members<'a>(&self, group: Vec<&'a TrendFact>) -> Vec<&'a TrendFact> {
        let limit = self.config.max_group_size.max(2);
        if group.len() <= limit {
            return group;
        }
        debug!(
            members = group.len(),
            limit, "merge group truncated to strongest trends"
        );

        let mut by_score: Vec<usize> = (0..group.len()).collect();
        by_score.sort_by(|&a, &b| group[b].score.total_cmp(&group[a].score));
        by_score.truncate(limit);
        by_score.sort_unstable();
        by_score.into_iter().map(|i| group[i]).collect()
    }

    /// `base_weight * best + coverage_weight * count / (total_series - 1)`
    pub fn compute_score(&self, best: f64, count: usize, total_series: usize) -> f64 {
        let max_possible = total_series.saturating_sub(1).max(1) as f64;
        let score = self.config.base_weight * best
            + self.config.coverage_weight * (count as f64 / max_possible);
        if self.clamp_scores {
            score.clamp(0.0, 1.0)
        } else {
            score
        }
    }
}

impl FactCalculator for MergeFactCalculator {
    fn kind(&self) -> FactKind {
        FactKind::Merge
    }

    fn calculate(&self, table: &TabularData, repo: &FactRepository) -> FactResult<Vec<Fact>> {
        let facts = self.merge_trends(table, &repo.trend_facts);
        debug!(count = facts.len(), "merge facts retained");
        Ok(facts.into_iter().map(Fact::from).collect())
    }
}

/// Trends sharing (range, direction), groups in first-seen order
fn group_by_pattern(trends: &[TrendFact]) -> Vec<Vec<&TrendFact>> {
    let mut groups: Vec<Vec<&TrendFact>> = Vec::new();
    for trend in trends {
        let existing = groups
            .iter_mut()
            .find(|g| g[0].range == trend.range && g[0].trend_type == trend.trend_type);
        match existing {
            Some(group) => group.push(trend),
            None => groups.push(vec![trend]),
        }
    }
    groups
}

/// All `k`-element index subsets of `0..n`, in lexicographic order
pub fn combinations(n: usize, k: usize) -> Combinations {
    Combinations {
        n,
        indices: (0..k).collect(),
        done: k == 0 || k > n,
    }
}

/// Lazy iterator over index subsets, see [`combinations`]
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        // rightmost index that can still advance
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(pos) => {
                self.indices[pos] += 1;
                for i in pos + 1..k {
                    self.indices[i] = self.indices[i - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}
