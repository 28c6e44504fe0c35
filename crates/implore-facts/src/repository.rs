//! Per-chart fact collection
//!
//! A `FactRepository` lives for exactly one controller run. Later
//! calculators read the trends earlier ones stored here.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fact::{AggregateFact, CombineFact, CompareFact, Fact, FactKind, MergeFact, TrendFact};

/// Facts collected for one chart, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactRepository {
    pub trend_facts: Vec<TrendFact>,
    pub aggregate_facts: Vec<AggregateFact>,
    pub compare_facts: Vec<CompareFact>,
    pub combine_facts: Vec<CombineFact>,
    pub merge_facts: Vec<MergeFact>,
}

impl FactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one fact under its kind
    pub fn push(&mut self, fact: Fact) {
        match fact {
            Fact::Trend(f) => self.trend_facts.push(f),
            Fact::Aggregate(f) => self.aggregate_facts.push(f),
            Fact::Compare(f) => self.compare_facts.push(f),
            Fact::Combine(f) => self.combine_facts.push(f),
            Fact::Merge(f) => self.merge_facts.push(f),
        }
    }

    /// Store a batch of facts
    pub fn extend(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.push(fact);
        }
    }

    /// Number of facts of one kind
    pub fn count(&self, kind: FactKind) -> usize {
        match kind {
            FactKind::Trend => self.trend_facts.len(),
            FactKind::Aggregate => self.aggregate_facts.len(),
            FactKind::Compare => self.compare_facts.len(),
            FactKind::Combine => self.combine_facts.len(),
            FactKind::Merge => self.merge_facts.len(),
        }
    }

    /// Total number of facts
    pub fn len(&self) -> usize {
        FactKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Facts of one kind, wrapped
    pub fn facts_of(&self, kind: FactKind) -> Vec<Fact> {
        match kind {
            FactKind::Trend => self.trend_facts.iter().cloned().map(Fact::from).collect(),
            FactKind::Aggregate => self.aggregate_facts.iter().cloned().map(Fact::from).collect(),
            FactKind::Compare => self.compare_facts.iter().cloned().map(Fact::from).collect(),
            FactKind::Combine => self.combine_facts.iter().cloned().map(Fact::from).collect(),
            FactKind::Merge => self.merge_facts.iter().cloned().map(Fact::from).collect(),
        }
    }

    /// Every kind mapped to its facts, in emission order.
    ///
    /// Kinds with no facts are present with an empty list.
    pub fn get_all_facts(&self) -> BTreeMap<FactKind, Vec<Fact>> {
        FactKind::ALL
            .iter()
            .map(|kind| (*kind, self.facts_of(*kind)))
            .collect()
    }
}
