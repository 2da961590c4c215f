//! Rule set construction and evaluation order.
//!
//! # Design Decisions
//! - Ordered ascending by `order` only
//! - Stable sort: equal orders keep TXT enumeration order
//! - Immutable after construction

use crate::rules::parser::{parse_rule, Rule};

/// Parsed rules for one hostname in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Order already-parsed rules.
    pub fn from_rules(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(Rule::order);
        Self { rules }
    }

    /// Parse every record, silently dropping the ones that are not rules.
    pub fn parse<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = records
            .into_iter()
            .filter_map(|record| {
                let parsed = parse_rule(record.as_ref());
                if parsed.is_none() {
                    tracing::debug!(record = %record.as_ref(), "Discarding TXT record that is not a rule");
                }
                parsed
            })
            .collect();
        Self::from_rules(rules)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
