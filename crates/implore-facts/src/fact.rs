//! Fact model
//!
//! Every detector emits one of five fact variants. Facts are plain values:
//! built and scored by the calculator that found them, then handed to the
//! repository unchanged.

use implore_io::category_label;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Direction of a monotonic run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendType {
    Increase,
    Decrease,
}

impl TrendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendType::Increase => "increase",
            TrendType::Decrease => "decrease",
        }
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global aggregate kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateType {
    Max,
    Min,
    Avg,
    Sum,
}

impl AggregateType {
    /// All aggregates, in emission order
    pub const ALL: [AggregateType; 4] = [
        AggregateType::Max,
        AggregateType::Min,
        AggregateType::Avg,
        AggregateType::Sum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateType::Max => "max",
            AggregateType::Min => "min",
            AggregateType::Avg => "avg",
            AggregateType::Sum => "sum",
        }
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareSign {
    Larger,
    Smaller,
    Similar,
    Opposite,
}

impl CompareSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareSign::Larger => "larger",
            CompareSign::Smaller => "smaller",
            CompareSign::Similar => "similar",
            CompareSign::Opposite => "opposite",
        }
    }
}

impl fmt::Display for CompareSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A maximal monotonic run of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFact {
    /// Series name
    #[serde(rename = "ref")]
    pub series: String,
    /// Category values spanned by the run, in axis order
    pub range: Vec<Value>,
    pub trend_type: TrendType,
    pub score: f64,
}

impl TrendFact {
    /// First category of the run
    pub fn start(&self) -> Option<&Value> {
        self.range.first()
    }

    /// Last category of the run
    pub fn end(&self) -> Option<&Value> {
        self.range.last()
    }

    /// "increase from 2010 to 2015"
    pub fn describe(&self) -> String {
        format!(
            "{} from {} to {}",
            self.trend_type,
            self.start().map(category_label).unwrap_or_default(),
            self.end().map(category_label).unwrap_or_default()
        )
    }
}

/// A global aggregate of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFact {
    /// Series name
    pub obj: String,
    pub aggregate_type: AggregateType,
    /// Span of categories covered ("all" for global aggregates)
    pub range: String,
    pub value: f64,
    pub score: f64,
}

/// A comparison between two values, or two opposite trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareFact {
    pub ref1: String,
    pub ref2: String,
    pub sign: CompareSign,
    /// "4.00x", "+12.5%", or "increase vs decrease"
    pub degree: String,
    /// Opposite-direction facts are not scored
    pub score: Option<f64>,
}

/// Two opposite trends of the same series in time order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineFact {
    /// Series name
    #[serde(rename = "ref")]
    pub series: String,
    /// Earlier trend description, then the later one
    pub contents: Vec<String>,
    pub score: f64,
}

/// One trend shared by several series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeFact {
    /// Series names, at least two
    pub merged_obj: Vec<String>,
    pub content: String,
    pub score: f64,
}

/// Fact discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactKind {
    #[serde(rename = "TrendFact")]
    Trend,
    #[serde(rename = "AggregateFact")]
    Aggregate,
    #[serde(rename = "CompareFact")]
    Compare,
    #[serde(rename = "CombineFact")]
    Combine,
    #[serde(rename = "MergeFact")]
    Merge,
}

impl FactKind {
    /// All kinds, in controller order
    pub const ALL: [FactKind; 5] = [
        FactKind::Trend,
        FactKind::Aggregate,
        FactKind::Compare,
        FactKind::Combine,
        FactKind::Merge,
    ];

    /// Stable type name used in output documents
    pub fn name(&self) -> &'static str {
        match self {
            FactKind::Trend => "TrendFact",
            FactKind::Aggregate => "AggregateFact",
            FactKind::Compare => "CompareFact",
            FactKind::Combine => "CombineFact",
            FactKind::Merge => "MergeFact",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any scored observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Fact {
    #[serde(rename = "TrendFact")]
    Trend(TrendFact),
    #[serde(rename = "AggregateFact")]
    Aggregate(AggregateFact),
    #[serde(rename = "CompareFact")]
    Compare(CompareFact),
    #[serde(rename = "CombineFact")]
    Combine(CombineFact),
    #[serde(rename = "MergeFact")]
    Merge(MergeFact),
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Fact::Trend(_) => FactKind::Trend,
            Fact::Aggregate(_) => FactKind::Aggregate,
            Fact::Compare(_) => FactKind::Compare,
            Fact::Combine(_) => FactKind::Combine,
            Fact::Merge(_) => FactKind::Merge,
        }
    }

    /// Salience score; `None` for unscored facts
    pub fn score(&self) -> Option<f64> {
        match self {
            Fact::Trend(f) => Some(f.score),
            Fact::Aggregate(f) => Some(f.score),
            Fact::Compare(f) => f.score,
            Fact::Combine(f) => Some(f.score),
            Fact::Merge(f) => Some(f.score),
        }
    }

    /// What the fact is about
    pub fn reference(&self) -> String {
        match self {
            Fact::Trend(f) => f.series.clone(),
            Fact::Aggregate(f) => f.obj.clone(),
            Fact::Compare(f) => format!("{} vs {}", f.ref1, f.ref2),
            Fact::Combine(f) => f.series.clone(),
            Fact::Merge(f) => f.merged_obj.join(", "),
        }
    }
}

impl From<TrendFact> for Fact {
    fn from(fact: TrendFact) -> Self {
        Fact::Trend(fact)
    }
}

impl From<AggregateFact> for Fact {
    fn from(fact: AggregateFact) -> Self {
        Fact::Aggregate(fact)
    }
}

impl From<CompareFact> for Fact {
    fn from(fact: CompareFact) -> Self {
        Fact::Compare(fact)
    }
}

impl From<CombineFact> for Fact {
    fn from(fact: CombineFact) -> Self {
        Fact::Combine(fact)
    }
}

impl From<MergeFact> for Fact {
    fn from(fact: MergeFact) -> Self {
        Fact::Merge(fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trend() -> TrendFact {
        TrendFact {
            series: "Tesla".to_string(),
            range: vec![json!(2010), json!(2011), json!(2012)],
            trend_type: TrendType::Increase,
            score: 0.8,
        }
    }

    #[test]
    fn test_trend_describe() {
        assert_eq!(trend().describe(), "increase from 2010 to 2012");
    }

    #[test]
    fn test_fact_kind_and_score() {
        let fact = Fact::from(trend());
        assert_eq!(fact.kind(), FactKind::Trend);
        assert_eq!(fact.score(), Some(0.8));
        assert_eq!(fact.reference(), "Tesla");

        let opposite = Fact::from(CompareFact {
            ref1: "A (increase)".to_string(),
            ref2: "B (decrease)".to_string(),
            sign: CompareSign::Opposite,
            degree: "increase vs decrease".to_string(),
            score: None,
        });
        assert_eq!(opposite.score(), None);
        assert_eq!(opposite.reference(), "A (increase) vs B (decrease)");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(Fact::from(trend())).unwrap();
        assert_eq!(value["type"], "TrendFact");
        assert_eq!(value["ref"], "Tesla");
        assert_eq!(value["trend_type"], "increase");
    }

    #[test]
    fn test_kind_order_matches_controller_order() {
        let mut kinds = FactKind::ALL.to_vec();
        kinds.sort();
        assert_eq!(kinds, FactKind::ALL.to_vec());
        assert_eq!(FactKind::Merge.name(), "MergeFact");
    }
}
