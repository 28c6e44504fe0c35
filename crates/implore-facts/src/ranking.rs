//! Top-K fact ranking handed to text conversion.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fact::{Fact, FactKind};

/// A scored fact selected for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFact {
    pub score: f64,
    pub kind: FactKind,
    pub fact: Fact,
}

/// Flatten, drop unscored facts, sort by descending score, keep `top_k`.
///
/// The sort is stable: equal scores keep kind order, then emission order.
pub fn rank_facts(all: &BTreeMap<FactKind, Vec<Fact>>, top_k: usize) -> Vec<RankedFact> {
    let mut ranked: Vec<RankedFact> = all
        .iter()
        .flat_map(|(kind, facts)| {
            facts.iter().filter_map(move |fact| {
                let score = fact.score().filter(|s| s.is_finite())?;
                Some(RankedFact {
                    score,
                    kind: *kind,
                    fact: fact.clone(),
                })
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}
