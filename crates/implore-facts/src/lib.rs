//! implore-facts - Statistical fact detection and ranking for charts
//!
//! Given a chart table (one category axis plus numeric series), this crate
//! enumerates candidate data facts, scores each by statistical salience, and
//! ranks them for automatic chart titles and insights.
//!
//! # Fact Kinds
//!
//! - **Trend**: maximal increase/decrease runs of a series
//! - **Aggregate**: global max/min/avg/sum, scored against the series spread
//! - **Compare**: pairs across categories, across series, and opposite trends
//! - **Combine**: a series rising then falling (or the reverse) in time order
//! - **Merge**: one trend pattern shared by several series
//!
//! # Pipeline
//!
//! `FactController` runs the calculators for one chart, `rank_facts` keeps
//! the top K, and a `FactTextConverter` renders them. `process_batch` drives
//! many charts with per-chart failure isolation.

pub mod batch;
pub mod calculators;
pub mod config;
pub mod controller;
pub mod error;
pub mod fact;
pub mod ordering;
pub mod ranking;
pub mod repository;
pub mod text;

pub use batch::{analyze_chart, process_batch, process_files, ChartInsights, ChartJob};
pub use calculators::{
    AggregateFactCalculator, CombineFactCalculator, CompareFactCalculator, FactCalculator,
    MergeFactCalculator, TrendFactCalculator,
};
pub use config::{CombineConfig, CompareConfig, FactConfig, MergeConfig, RankingConfig};
pub use controller::{analyze, FactController};
pub use error::{FactError, FactResult};
pub use fact::*;
pub use ranking::{rank_facts, RankedFact};
pub use repository::FactRepository;
pub use text::{FactTextConverter, TemplateTextConverter};

pub use implore_io::TabularData;
