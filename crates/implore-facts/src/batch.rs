//! Batch processing across charts
//!
//! Each chart gets its own controller and repository; nothing is shared
//! between charts. A chart whose analysis panics is recorded with an empty
//! fact list and the batch moves on.

use implore_io::{read_table, TabularData};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

use crate::config::FactConfig;
use crate::controller::FactController;
use crate::error::FactResult;
use crate::ranking::RankedFact;
use crate::text::FactTextConverter;

/// One chart to analyze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartJob {
    /// Caller-chosen identifier (file name, chart id)
    pub id: String,
    pub table: TabularData,
}

impl ChartJob {
    pub fn new(id: impl Into<String>, table: TabularData) -> Self {
        Self {
            id: id.into(),
            table,
        }
    }

    /// Load a chart from a JSON or CSV file; the path becomes the id
    pub fn from_file(path: &str) -> FactResult<Self> {
        Ok(Self::new(path, read_table(path)?))
    }
}

/// Ranked facts and their rendered text for one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInsights {
    pub id: String,
    pub facts: Vec<RankedFact>,
    pub texts: Vec<String>,
    /// Set when the chart failed and its facts were dropped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartInsights {
    fn failed(id: &str, error: String) -> Self {
        Self {
            id: id.to_string(),
            facts: Vec::new(),
            texts: Vec::new(),
            error: Some(error),
        }
    }
}

/// Analyze one chart: detect, rank, render
pub fn analyze_chart<C>(job: &ChartJob, config: &FactConfig, converter: &C) -> ChartInsights
where
    C: FactTextConverter + ?Sized,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut controller = FactController::new(config.clone());
        controller.run(&job.table);
        let facts = controller.ranked();
        let texts = converter.convert(&facts);
        (facts, texts)
    }));

    match outcome {
        Ok((facts, texts)) if facts.len() == texts.len() => ChartInsights {
            id: job.id.clone(),
            facts,
            texts,
            error: None,
        },
        Ok((facts, texts)) => {
            let message = format!(
                "text converter returned {} strings for {} facts",
                texts.len(),
                facts.len()
            );
            warn!(chart = %job.id, "{}", message);
            ChartInsights::failed(&job.id, message)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(chart = %job.id, "Chart analysis failed: {}", message);
            ChartInsights::failed(&job.id, message)
        }
    }
}

/// Analyze every chart; output order matches input order
pub fn process_batch<C>(jobs: &[ChartJob], config: &FactConfig, converter: &C) -> Vec<ChartInsights>
where
    C: FactTextConverter + Sync + ?Sized,
{
    info!(charts = jobs.len(), "Processing chart batch");

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter()
            .map(|job| analyze_chart(job, config, converter))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter()
            .map(|job| analyze_chart(job, config, converter))
            .collect()
    }
}

/// Load and analyze chart files.
///
/// A file that cannot be loaded is reported as a failed chart at its own
/// position, so output order matches `paths`.
pub fn process_files<C>(paths: &[String], config: &FactConfig, converter: &C) -> Vec<ChartInsights>
where
    C: FactTextConverter + Sync + ?Sized,
{
    let mut jobs = Vec::new();
    let mut slots = Vec::with_capacity(paths.len());
    for path in paths {
        match ChartJob::from_file(path) {
            Ok(job) => {
                jobs.push(job);
                slots.push(None);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path, e);
                slots.push(Some(ChartInsights::failed(path, e.to_string())));
            }
        }
    }

    let mut analyzed = process_batch(&jobs, config, converter).into_iter();
    slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| analyzed.next()))
        .collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
