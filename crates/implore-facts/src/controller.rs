//! Fact controller
//!
//! Runs every calculator over one chart and collects what they retain.
//! Calculators run in dependency order (trends first). A calculator that
//! fails is logged and skipped; the others still run.

use implore_io::TabularData;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::calculators::{
    AggregateFactCalculator, CombineFactCalculator, CompareFactCalculator, FactCalculator,
    MergeFactCalculator, TrendFactCalculator,
};
use crate::config::FactConfig;
use crate::fact::{Fact, FactKind};
use crate::ranking::{rank_facts, RankedFact};
use crate::repository::FactRepository;

/// Orchestrates fact detection for one chart
pub struct FactController {
    config: FactConfig,
    calculators: Vec<Box<dyn FactCalculator>>,
    repository: FactRepository,
}

impl FactController {
    /// Create a controller with the built-in calculators
    pub fn new(config: FactConfig) -> Self {
        let calculators: Vec<Box<dyn FactCalculator>> = vec![
            Box::new(TrendFactCalculator::new()),
            Box::new(AggregateFactCalculator::new().with_clamped_scores(config.clamp_scores)),
            Box::new(CompareFactCalculator::new(config.compare.clone())),
            Box::new(CombineFactCalculator::new(config.combine.clone())),
            Box::new(
                MergeFactCalculator::new(config.merge.clone())
                    .with_clamped_scores(config.clamp_scores),
            ),
        ];
        Self::with_calculators(config, calculators)
    }

    /// Create a controller with a custom calculator pipeline
    pub fn with_calculators(config: FactConfig, calculators: Vec<Box<dyn FactCalculator>>) -> Self {
        Self {
            config,
            calculators,
            repository: FactRepository::new(),
        }
    }

    /// Detect facts for one chart, replacing the results of any earlier run
    pub fn run(&mut self, table: &TabularData) -> &FactRepository {
        self.repository = FactRepository::new();

        if let Err(e) = table.validate() {
            warn!("Skipping chart with invalid table: {}", e);
            return &self.repository;
        }

        for calculator in &self.calculators {
            let kind = calculator.kind();
            match calculator.calculate(table, &self.repository) {
                Ok(facts) => {
                    debug!(kind = kind.name(), count = facts.len(), "calculator finished");
                    self.repository.extend(facts);
                }
                Err(e) => warn!("{} calculator failed: {}", kind, e),
            }
        }

        &self.repository
    }

    /// Facts of the last run, keyed by kind
    pub fn get_all_facts(&self) -> BTreeMap<FactKind, Vec<Fact>> {
        self.repository.get_all_facts()
    }

    /// Highest scoring facts of the last run
    pub fn top_facts(&self, top_k: usize) -> Vec<RankedFact> {
        rank_facts(&self.get_all_facts(), top_k)
    }

    /// Highest scoring facts using the configured `top_k`
    pub fn ranked(&self) -> Vec<RankedFact> {
        self.top_facts(self.config.ranking.top_k)
    }

    pub fn repository(&self) -> &FactRepository {
        &self.repository
    }

    pub fn config(&self) -> &FactConfig {
        &self.config
    }
}

impl Default for FactController {
    fn default() -> Self {
        Self::new(FactConfig::default())
    }
}

/// Run a fresh controller over one chart
pub fn analyze(table: &TabularData, config: &FactConfig) -> FactRepository {
    let mut controller = FactController::new(config.clone());
    controller.run(table);
    controller.repository
}
