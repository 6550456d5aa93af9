//! JSON configuration file.
//!
//! Every section is optional. Provider enable flags and the output flags are
//! read but do not change what the pipeline does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CostError, Result};
use crate::models::Provider;
use crate::units::{SyntheticUnitRule, SyntheticUnitRules};

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Providers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderToggle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aws: ProviderToggle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub azure: ProviderToggle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gcp: ProviderToggle,
}

// ── Billing ────────────────────────────────────────────────────────────────────

/// Location of one provider's billing export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSource {
    /// Empty means the provider is skipped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aws: BillingSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub azure: BillingSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gcp: BillingSource,
}

impl BillingConfig {
    pub fn source(&self, provider: Provider) -> &BillingSource {
        match provider {
            Provider::Aws => &self.aws,
            Provider::Azure => &self.azure,
            Provider::Gcp => &self.gcp,
        }
    }

    /// Providers with a billing file configured, in processing order.
    pub fn configured_sources(&self) -> Vec<(Provider, PathBuf)> {
        Provider::ALL
            .into_iter()
            .filter_map(|provider| {
                let source = self.source(provider);
                if source.file_path.is_empty() {
                    None
                } else {
                    Some((provider, PathBuf::from(&source.file_path)))
                }
            })
            .collect()
    }
}

// ── Synthetic units / output ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntheticUnitsConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: HashMap<String, SyntheticUnitRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub include_ephemeral_resources: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub include_billing_metrics: bool,
}

// ── Config ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub providers: ProvidersConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billing: BillingConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synthetic_units: SyntheticUnitsConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: OutputConfig,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    ///
    /// A missing file or malformed JSON is a [`CostError::Config`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CostError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read config file: {e}"),
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| CostError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse config file: {e}"),
        })?;

        tracing::debug!(
            "Loaded config from {} ({} synthetic unit rules)",
            path.display(),
            config.synthetic_units.rules.len()
        );

        Ok(config)
    }

    /// The typed multiplier table for the converter.
    pub fn synthetic_unit_rules(&self) -> SyntheticUnitRules {
        SyntheticUnitRules::from_config(&self.synthetic_units.rules)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
