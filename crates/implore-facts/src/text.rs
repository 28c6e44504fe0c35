//! Text conversion boundary
//!
//! Ranked facts are handed to a `FactTextConverter`, which returns one
//! sentence per fact in the same order. `TemplateTextConverter` is a plain
//! template renderer; richer phrasing lives behind the same trait.

use crate::fact::{AggregateType, CompareSign, Fact};
use crate::ranking::RankedFact;

/// Renders ranked facts as natural-language text
pub trait FactTextConverter {
    /// One string per input fact, in input order
    fn convert(&self, ranked: &[RankedFact]) -> Vec<String>;
}

/// Fixed sentence templates per fact kind
#[derive(Debug, Clone, Default)]
pub struct TemplateTextConverter;

impl TemplateTextConverter {
    pub fn new() -> Self {
        Self
    }

    /// Sentence for one fact
    pub fn render(&self, fact: &Fact) -> String {
        match fact {
            Fact::Trend(f) => format!("{} shows {}.", f.series, with_article(&f.describe())),
            Fact::Aggregate(f) => {
                let label = match f.aggregate_type {
                    AggregateType::Max => "highest value",
                    AggregateType::Min => "lowest value",
                    AggregateType::Avg => "average",
                    AggregateType::Sum => "total",
                };
                format!("The {} of {} is {}.", label, f.obj, format_number(f.value))
            }
            Fact::Compare(f) => match f.sign {
                CompareSign::Similar => format!("{} is similar to {}.", f.ref1, f.ref2),
                CompareSign::Opposite => {
                    format!("{} and {} move in opposite directions.", f.ref1, f.ref2)
                }
                CompareSign::Larger | CompareSign::Smaller => {
                    format!("{} is {} than {} ({}).", f.ref1, f.sign, f.ref2, f.degree)
                }
            },
            Fact::Combine(f) => match f.contents.as_slice() {
                [first, second] => format!(
                    "{} had {}, then {}.",
                    f.series,
                    with_article(first),
                    with_article(second)
                ),
                other => format!("{}: {}.", f.series, other.join(", then ")),
            },
            Fact::Merge(f) => format!(
                "{} all show {}.",
                join_names(&f.merged_obj),
                with_article(&f.content)
            ),
        }
    }
}

impl FactTextConverter for TemplateTextConverter {
    fn convert(&self, ranked: &[RankedFact]) -> Vec<String> {
        ranked.iter().map(|r| self.render(&r.fact)).collect()
    }
}

/// Whole numbers without decimals, everything else with two
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// "an increase ...", "a decrease ..."
fn with_article(phrase: &str) -> String {
    let article = match phrase.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    };
    format!("{} {}", article, phrase)
}

/// "A and B", "A, B and C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
