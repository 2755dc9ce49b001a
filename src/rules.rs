//! Rule table
//!
//! Named game events and the points they award (or cost). Seeded from
//! [`DEFAULT_RULES`](crate::consts::DEFAULT_RULES) on first run; afterwards the
//! stored table is used verbatim, without merging in newer defaults.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RULES;
use crate::error::{Result, TrackerError};
use crate::ordered::OrderedMap;
use crate::persistence::{Collection, StorageBackend, StorageError, Store, Stored};

/// Rule name → point delta, in configured order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: OrderedMap<i64>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.iter().copied().collect(),
        }
    }
}

impl RuleTable {
    /// Load the stored table (or the default seed) and write it back immediately
    pub fn initialize<B: StorageBackend>(
        store: &mut Store<B>,
    ) -> std::result::Result<Self, StorageError> {
        let rules = store.load(Self::default());
        store.save(&rules)?;
        log::info!("{} rules active", rules.len());
        Ok(rules)
    }

    /// Point delta of a rule
    pub fn points(&self, rule: &str) -> Result<i64> {
        self.rules
            .get(rule)
            .copied()
            .ok_or_else(|| TrackerError::UnknownRule(rule.to_string()))
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.rules.iter().map(|(name, points)| (name, *points))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys()
    }
}

impl FromIterator<(String, i64)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Stored for RuleTable {
    const COLLECTION: Collection = Collection::Rules;

    fn validate(&self) -> std::result::Result<(), String> {
        match self.rules.keys().find(|name| name.trim().is_empty()) {
            Some(_) => Err("blank rule name".into()),
            None => Ok(()),
        }
    }
}
