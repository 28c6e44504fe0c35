//! Fact calculators.
//!
//! Each calculator is a strategy keyed by the fact kind it produces. The
//! controller runs them in dependency order: trends first, since the
//! compare, combine and merge calculators read trends from the repository.

use implore_io::TabularData;

use crate::error::FactResult;
use crate::fact::{Fact, FactKind};
use crate::repository::FactRepository;

pub mod aggregate;
pub mod combine;
pub mod compare;
pub mod merge;
pub mod trend;

pub use aggregate::AggregateFactCalculator;
pub use combine::CombineFactCalculator;
pub use compare::CompareFactCalculator;
pub use merge::MergeFactCalculator;
pub use trend::TrendFactCalculator;

/// A detector for one kind of fact.
pub trait FactCalculator {
    /// Kind of fact produced
    fn kind(&self) -> FactKind;

    /// Detect and score facts for one chart.
    ///
    /// `repo` holds the facts of every calculator that ran earlier.
    fn calculate(&self, table: &TabularData, repo: &FactRepository) -> FactResult<Vec<Fact>>;
}

/// Round to a fixed number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.923456, 3), 0.923);
        assert_eq!(round_to(0.6, 3), 0.6);
        assert_eq!(round_to(0.99951, 3), 1.0);
    }
}
