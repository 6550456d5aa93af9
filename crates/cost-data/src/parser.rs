//! Provider billing CSV parsing.
//!
//! All three providers share one [`BillingParser`]; what differs between them
//! (service keywords, column positions, project tag) lives in a
//! [`ProviderProfile`] value.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use cost_core::error::{CostError, Result};
use cost_core::models::{BillingRecord, Provider, ResourceType};
use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

// ── Keyword tables ─────────────────────────────────────────────────────────────

/// Ordered `(type, keywords)` pairs; the first type with a matching keyword wins.
pub type KeywordTable = &'static [(ResourceType, &'static [&'static str])];

const AWS_KEYWORDS: KeywordTable = &[
    (ResourceType::VM, &["ec2"]),
    (ResourceType::Database, &["rds"]),
    (ResourceType::Function, &["lambda"]),
    (ResourceType::Container, &["ecs"]),
    (ResourceType::Storage, &["s3"]),
];

const AZURE_KEYWORDS: KeywordTable = &[
    (ResourceType::VM, &["virtual machine", "vm"]),
    (ResourceType::Database, &["sql"]),
    (ResourceType::Function, &["function"]),
    (ResourceType::Container, &["container"]),
    (ResourceType::Storage, &["storage"]),
];

const GCP_KEYWORDS: KeywordTable = &[
    (ResourceType::VM, &["compute engine"]),
    (ResourceType::Database, &["cloud sql"]),
    (ResourceType::Function, &["cloud functions"]),
    (ResourceType::Container, &["gke"]),
    (ResourceType::Storage, &["cloud storage"]),
];

// ── Column layout ──────────────────────────────────────────────────────────────

/// Zero-based column positions within a billing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub service: usize,
    pub resource_id: usize,
    pub instance_hours: usize,
    pub period: usize,
    pub region: usize,
    /// Rows with fewer fields are skipped.
    pub min_fields: usize,
}

impl ColumnLayout {
    /// `service,resourceType,resourceId,instanceHours,period,region`
    pub const STANDARD: ColumnLayout = ColumnLayout {
        service: 0,
        resource_id: 2,
        instance_hours: 3,
        period: 4,
        region: 5,
        min_fields: 6,
    };
}

// ── ProviderProfile ────────────────────────────────────────────────────────────

/// Everything provider-specific about reading a billing export.
#[derive(Debug, Clone, Copy)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub keywords: KeywordTable,
    pub layout: ColumnLayout,
}

impl ProviderProfile {
    /// The built-in profile for `provider`.
    pub fn for_provider(provider: Provider) -> Self {
        let keywords = match provider {
            Provider::Aws => AWS_KEYWORDS,
            Provider::Azure => AZURE_KEYWORDS,
            Provider::Gcp => GCP_KEYWORDS,
        };
        Self {
            provider,
            keywords,
            layout: ColumnLayout::STANDARD,
        }
    }

    /// Map a raw service name onto the resource taxonomy.
    ///
    /// Case-insensitive substring match; unmatched services are `Other`.
    pub fn map_service(&self, service: &str) -> ResourceType {
        let service = service.to_lowercase();
        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| service.contains(w)))
            .map(|(resource_type, _)| *resource_type)
            .unwrap_or(ResourceType::Other)
    }

    /// Project tag stamped on every record from this provider.
    pub fn project_tag(&self) -> String {
        format!("{}-default", self.provider.tag())
    }
}

// ── BillingParser ──────────────────────────────────────────────────────────────

/// Reads one provider's CSV export into [`BillingRecord`]s.
pub struct BillingParser {
    profile: ProviderProfile,
}

impl BillingParser {
    pub fn new(profile: ProviderProfile) -> Self {
        Self { profile }
    }

    /// Parser with the built-in profile for `provider`.
    pub fn for_provider(provider: Provider) -> Self {
        Self::new(ProviderProfile::for_provider(provider))
    }

    /// Parse the CSV file at `path`.
    ///
    /// Fails when the file cannot be opened or the CSV is malformed. Short
    /// rows are skipped and unparseable instance-hours read as zero.
    pub fn parse(&self, path: &Path) -> Result<Vec<BillingRecord>> {
        let file = std::fs::File::open(path).map_err(|e| self.parse_error(path, e))?;
        let records = self
            .parse_reader(file)
            .map_err(|e| self.parse_error(path, e))?;

        debug!(
            "Parsed {} {} billing records from {}",
            records.len(),
            self.profile.provider,
            path.display()
        );
        Ok(records)
    }

    /// Parse CSV from any reader. The first row is always treated as a header.
    ///
    /// Fields are decoded lossily, so invalid UTF-8 never rejects a row.
    pub fn parse_reader<R: Read>(&self, reader: R) -> std::result::Result<Vec<BillingRecord>, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let project = self.profile.project_tag();
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for result in reader.byte_records() {
            let row = result?;
            match self.record_from_row(&row, &project) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} short {} billing rows", skipped, self.profile.provider);
        }
        Ok(records)
    }

    fn record_from_row(&self, row: &ByteRecord, project: &str) -> Option<BillingRecord> {
        let layout = &self.profile.layout;
        if row.len() < layout.min_fields {
            return None;
        }

        let field = |idx: usize| {
            row.get(idx)
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .unwrap_or_default()
        };
        let service_name = field(layout.service);

        Some(BillingRecord {
            resource_type: self.profile.map_service(&service_name),
            service_name,
            resource_id: field(layout.resource_id),
            instance_hours: parse_instance_hours(&field(layout.instance_hours)),
            period: field(layout.period),
            region: field(layout.region),
            project: project.to_string(),
            metadata: HashMap::new(),
        })
    }

    fn parse_error(&self, path: &Path, err: impl std::fmt::Display) -> CostError {
        CostError::Parse {
            provider: self.profile.provider.name().to_string(),
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Lenient instance-hours parse: anything that is not a finite,
/// non-negative number reads as `0.0`.
fn parse_instance_hours(raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

// ── Public API ─────────────────────────────────────────────────────────────────

/// Parse the billing file at `path` using the provider named by `provider_tag`
/// (`"aws"`, `"azure"` or `"gcp"`, case-insensitive).
pub fn parse_billing_file(path: &Path, provider_tag: &str) -> Result<Vec<BillingRecord>> {
    let provider: Provider = provider_tag.parse()?;
    BillingParser::for_provider(provider).parse(path)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "service,resourceType,resourceId,instanceHours,period,region\n";

    fn write_csv(tmp: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = tmp.path().join(name);
        std::fs::write(&path, body).expect("write csv");
        path
    }

    // ── Service mapping ───────────────────────────────────────────────────────

    #[test]
    fn test_aws_service_mapping() {
        let profile = ProviderProfile::for_provider(Provider::Aws);
        assert_eq!(profile.map_service("Amazon EC2"), ResourceType::VM);
        assert_eq!(profile.map_service("AmazonRDS"), ResourceType::Database);
        assert_eq!(profile.map_service("AWS Lambda"), ResourceType::Function);
        assert_eq!(profile.map_service("Amazon ECS"), ResourceType::Container);
        assert_eq!(profile.map_service("Amazon S3"), ResourceType::Storage);
        assert_eq!(profile.map_service("Amazon CloudFront"), ResourceType::Other);
    }

    #[test]
    fn test_azure_service_mapping() {
        let profile = ProviderProfile::for_provider(Provider::Azure);
        assert_eq!(profile.map_service("Virtual Machines"), ResourceType::VM);
        assert_eq!(profile.map_service("VM Scale Sets"), ResourceType::VM);
        assert_eq!(profile.map_service("Azure SQL Database"), ResourceType::Database);
        assert_eq!(profile.map_service("Azure Functions"), ResourceType::Function);
        assert_eq!(profile.map_service("Container Instances"), ResourceType::Container);
        assert_eq!(profile.map_service("Storage Accounts"), ResourceType::Storage);
        assert_eq!(profile.map_service("Bandwidth"), ResourceType::Other);
    }

    #[test]
    fn test_gcp_service_mapping() {
        let profile = ProviderProfile::for_provider(Provider::Gcp);
        assert_eq!(profile.map_service("Compute Engine"), ResourceType::VM);
        assert_eq!(profile.map_service("Cloud SQL"), ResourceType::Database);
        assert_eq!(profile.map_service("Cloud Functions"), ResourceType::Function);
        assert_eq!(profile.map_service("GKE"), ResourceType::Container);
        assert_eq!(profile.map_service("Cloud Storage"), ResourceType::Storage);
        assert_eq!(profile.map_service("BigQuery"), ResourceType::Other);
    }

    #[test]
    fn test_first_matching_keyword_wins() {
        // Matches both "vm" and "sql"; VM is checked first.
        let profile = ProviderProfile::for_provider(Provider::Azure);
        assert_eq!(profile.map_service("SQL Server on VM"), ResourceType::VM);
    }

    #[test]
    fn test_project_tag() {
        assert_eq!(ProviderProfile::for_provider(Provider::Gcp).project_tag(), "gcp-default");
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_aws_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_csv(
            &tmp,
            "aws.csv",
            &format!(
                "{HEADER}EC2,VM,i-1,720,2024-01,us-east-1\nRDS,Database,db-1,744,2024-01,us-east-1\n"
            ),
        );

        let records = parse_billing_file(&path, "aws").expect("parse");
        assert_eq!(records.len(), 2);

        let vm = &records[0];
        assert_eq!(vm.service_name, "EC2");
        assert_eq!(vm.resource_type, ResourceType::VM);
        assert_eq!(vm.resource_id, "i-1");
        assert!((vm.instance_hours - 720.0).abs() < 1e-9);
        assert_eq!(vm.period, "2024-01");
        assert_eq!(vm.region, "us-east-1");
        assert_eq!(vm.project, "aws-default");
        assert!(vm.metadata.is_empty());

        assert_eq!(records[1].resource_type, ResourceType::Database);
    }

    #[test]
    fn test_resource_type_column_is_ignored() {
        let parser = BillingParser::for_provider(Provider::Aws);
        let csv = format!("{HEADER}CloudFront,VM,cf-1,10,2024-01,global\n");
        let records = parser.parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records[0].resource_type, ResourceType::Other);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let parser = BillingParser::for_provider(Provider::Aws);
        let csv = format!("{HEADER}EC2,VM,i-1,720,2024-01\nEC2,VM,i-2,10,2024-01,us-east-1\n");
        let records = parser.parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resource_id, "i-2");
    }

    #[test]
    fn test_extra_columns_are_tolerated() {
        let parser = BillingParser::for_provider(Provider::Gcp);
        let csv = format!("{HEADER}Compute Engine,VM,vm-1,24,2024-03,us-central1,extra,more\n");
        let records = parser.parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "us-central1");
    }

    #[test]
    fn test_unparseable_hours_default_to_zero() {
        let parser = BillingParser::for_provider(Provider::Azure);
        let csv = format!(
            "{HEADER}Virtual Machines,VM,vm-1,n/a,2024-01,westeurope\n\
             Virtual Machines,VM,vm-2,-5,2024-01,westeurope\n\
             Virtual Machines,VM,vm-3,NaN,2024-01,westeurope\n"
        );
        let records = parser.parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.instance_hours == 0.0));
    }

    #[test]
    fn test_header_only_file_yields_no_records() {
        let parser = BillingParser::for_provider(Provider::Aws);
        let records = parser.parse_reader(HEADER.as_bytes()).expect("parse");
        assert!(records.is_empty());
    }

    #[test]
    fn test_first_row_is_skipped_even_if_data() {
        let parser = BillingParser::for_provider(Provider::Aws);
        let csv = "EC2,VM,i-0,100,2024-01,us-east-1\nEC2,VM,i-1,200,2024-01,us-east-1\n";
        let records = parser.parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resource_id, "i-1");
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = parse_billing_file(&tmp.path().join("missing.csv"), "gcp").unwrap_err();
        match err {
            CostError::Parse { provider, .. } => assert_eq!(provider, "GCP"),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_keeps_rows() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("bad.csv");
        let mut body = HEADER.as_bytes().to_vec();
        body.extend_from_slice(b"EC2,VM,i-0,744,2024-01,us-east-1\n");
        body.extend_from_slice(b"EC2,VM,i-1,\xff\xfe,2024-01,us-east-1\n");
        body.extend_from_slice(b"RDS\xff,Database,db-1,10,2024-01,us-east-1\n");
        std::fs::write(&path, body).expect("write");

        let records = parse_billing_file(&path, "aws").expect("parse");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].resource_id, "i-0");
        assert!((records[0].instance_hours - 744.0).abs() < 1e-9);
        assert_eq!(records[1].resource_id, "i-1");
        assert_eq!(records[1].instance_hours, 0.0);
        assert_eq!(records[2].resource_type, ResourceType::Database);
        assert_eq!(records[2].service_name, "RDS\u{FFFD}");
    }

    #[test]
    fn test_unknown_provider_tag() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_csv(&tmp, "oci.csv", HEADER);
        let err = parse_billing_file(&path, "oracle").unwrap_err();
        assert!(matches!(err, CostError::UnknownProvider(_)));
    }

    #[test]
    fn test_provider_tag_is_case_insensitive() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_csv(
            &tmp,
            "azure.csv",
            &format!("{HEADER}Azure Functions,Function,fn-1,12.5,2024-06,eastus\n"),
        );
        let records = parse_billing_file(&path, "Azure").expect("parse");
        assert_eq!(records[0].resource_type, ResourceType::Function);
        assert_eq!(records[0].project, "azure-default");
    }
}
