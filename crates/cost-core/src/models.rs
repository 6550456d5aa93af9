use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::CostError;

/// The fixed taxonomy every billed service is mapped onto.
///
/// Declaration order doubles as the report ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    VM,
    Database,
    Container,
    Storage,
    Function,
    Other,
}

impl ResourceType {
    /// Every variant, in report order.
    pub const ALL: [ResourceType; 6] = [
        ResourceType::VM,
        ResourceType::Database,
        ResourceType::Container,
        ResourceType::Storage,
        ResourceType::Function,
        ResourceType::Other,
    ];

    /// The label used in configuration keys and report cells.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::VM => "VM",
            ResourceType::Database => "Database",
            ResourceType::Container => "Container",
            ResourceType::Storage => "Storage",
            ResourceType::Function => "Function",
            ResourceType::Other => "Other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    /// Exact match on the label; configuration keys are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown resource type: {s}"))
    }
}

/// A cloud provider whose billing export can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    /// Processing order for a multi-source run.
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    /// Lowercase tag used in configuration and project tags.
    pub fn tag(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }

    /// Human-readable name for progress output.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Aws => "AWS",
            Provider::Azure => "Azure",
            Provider::Gcp => "GCP",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" => Ok(Provider::Gcp),
            _ => Err(CostError::UnknownProvider(s.to_string())),
        }
    }
}

/// One usage line from a provider billing export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Raw service name as exported by the provider, e.g. `"Amazon EC2"`.
    pub service_name: String,
    /// Taxonomy bucket derived from `service_name`.
    pub resource_type: ResourceType,
    pub resource_id: String,
    /// Instance-hours billed for the period; unparseable input reads as `0.0`.
    pub instance_hours: f64,
    /// Billing period, expected as `YYYY-MM`.
    pub period: String,
    pub region: String,
    /// Source project tag, `"<provider>-default"` for CSV input.
    pub project: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Average instances per hour, keyed by resource type.
pub type NormalizedUsage = BTreeMap<ResourceType, f64>;

/// Where an inventory asset was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Inventory,
    Billing,
}

/// A deployed asset from a live inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryAsset {
    pub id: String,
    pub resource_type: ResourceType,
    pub name: String,
    pub provider: Provider,
    pub project: String,
    pub current_instance_count: u32,
    pub source: SourceKind,
}

/// A resource type after merging inventory counts with billing averages.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub resource_type: ResourceType,
    /// Number of inventory assets of this type.
    pub current_count: u32,
    /// Average instances per hour from billing.
    pub avg_instances_per_hour: f64,
    /// Billed usage with nothing in the inventory.
    pub ephemeral: bool,
    pub synthetic_units: i64,
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub resource_type: ResourceType,
    pub current_count: u32,
    /// `1` when the type is ephemeral, otherwise `0`.
    pub ephemeral_count: u32,
    pub avg_instances_per_hour: f64,
    pub synthetic_units: i64,
}

/// Column sums across a set of report rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTotals {
    pub current_count: u64,
    pub ephemeral_count: u64,
    pub avg_instances_per_hour: f64,
    pub synthetic_units: i64,
}

impl ReportTotals {
    /// Sum every column of `rows`.
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.current_count += u64::from(row.current_count);
            acc.ephemeral_count += u64::from(row.ephemeral_count);
            acc.avg_instances_per_hour += row.avg_instances_per_hour;
            acc.synthetic_units += row.synthetic_units;
            acc
        })
    }
}
