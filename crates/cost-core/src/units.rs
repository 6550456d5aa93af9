use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{NormalizedUsage, ResourceType};

/// Synthetic units charged per one average instance of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticUnitRule {
    #[serde(rename = "unitsPerInstance")]
    pub units_per_instance: i64,
}

impl SyntheticUnitRule {
    pub fn new(units_per_instance: i64) -> Self {
        Self { units_per_instance }
    }
}

/// Immutable multiplier table used to score normalized usage.
///
/// Types without a rule score zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticUnitRules {
    rules: BTreeMap<ResourceType, SyntheticUnitRule>,
}

impl SyntheticUnitRules {
    /// Build a table from typed rules.
    pub fn new(rules: impl IntoIterator<Item = (ResourceType, SyntheticUnitRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Build a table from the string-keyed rules in the configuration file.
    ///
    /// Keys that do not name a [`ResourceType`] can never match a billed type,
    /// so they are dropped with a debug log.
    pub fn from_config(raw: &HashMap<String, SyntheticUnitRule>) -> Self {
        let mut rules = BTreeMap::new();
        for (key, rule) in raw {
            match key.parse::<ResourceType>() {
                Ok(resource_type) => {
                    rules.insert(resource_type, *rule);
                }
                Err(_) => tracing::debug!("Ignoring synthetic unit rule for unknown type {key}"),
            }
        }
        Self { rules }
    }

    /// The rule for `resource_type`, if one is configured.
    pub fn get(&self, resource_type: ResourceType) -> Option<&SyntheticUnitRule> {
        self.rules.get(&resource_type)
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Score `avg_instances_per_hour` for `resource_type`.
    ///
    /// `round(avg × unitsPerInstance)`, with halves rounded away from zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_core::models::ResourceType;
    /// use cost_core::units::{SyntheticUnitRule, SyntheticUnitRules};
    ///
    /// let rules = SyntheticUnitRules::new([(ResourceType::VM, SyntheticUnitRule::new(5))]);
    /// assert_eq!(rules.score(ResourceType::VM, 4.76), 24);
    /// assert_eq!(rules.score(ResourceType::Other, 4.76), 0);
    /// ```
    pub fn score(&self, resource_type: ResourceType, avg_instances_per_hour: f64) -> i64 {
        match self.get(resource_type) {
            Some(rule) => (avg_instances_per_hour * rule.units_per_instance as f64).round() as i64,
            None => 0,
        }
    }

    /// Score every entry of a normalized usage map.
    pub fn convert_all(&self, usage: &NormalizedUsage) -> BTreeMap<ResourceType, i64> {
        usage
            .iter()
            .map(|(&resource_type, &avg)| (resource_type, self.score(resource_type, avg)))
            .collect()
    }
}
