//! Loading configuration documents from disk.
//!
//! A file holds either a bare autoscaler policy (it carries a top-level
//! `type` tag or any policy field) or a full worker behavior config (it
//! carries `selectStrategy` or `autoScaler`). Anything else is rejected.

use std::path::Path;

use anyhow::{Context, Result};
use hoist_provision::{AutoScalerPolicy, ProvisionError, WorkerBehaviorConfig};
use hoist_select::WorkerPool;
use tracing::debug;

use crate::error::CliError;

const POLICY_KEYS: &[&str] = &["type", "minNumWorkers", "maxNumWorkers", "envConfig"];
const BEHAVIOR_KEYS: &[&str] = &["selectStrategy", "autoScaler"];

/// A decoded configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Policy(AutoScalerPolicy),
    Behavior(WorkerBehaviorConfig),
}

impl Document {
    /// Decode `text`, detecting which kind of document it is.
    pub fn parse(text: &str) -> Result<Self, ProvisionError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let has_any = |keys: &[&str]| keys.iter().any(|key| value.get(key).is_some());

        // A policy without its tag still decodes as a policy, so the missing
        // `type` is reported instead of its fields being dropped.
        if has_any(POLICY_KEYS) {
            return AutoScalerPolicy::from_value(value).map(Self::Policy);
        }
        if has_any(BEHAVIOR_KEYS) {
            return WorkerBehaviorConfig::from_value(value).map(Self::Behavior);
        }

        Err(ProvisionError::InvalidConfiguration(format!(
            "expected an autoscaler policy (`type`) or a worker behavior config (`{}`)",
            BEHAVIOR_KEYS.join("`, `")
        )))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read(path)?;
        let doc =
            Self::parse(&text).with_context(|| format!("failed to decode {}", path.display()))?;
        debug!(path = %path.display(), kind = doc.kind(), "Loaded document");
        Ok(doc)
    }

    /// Human label for the document kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Policy(_) => "autoscaler policy",
            Self::Behavior(_) => "worker behavior config",
        }
    }

    /// The autoscaler policy, whether bare or nested in a behavior config.
    pub fn policy(&self) -> Result<&AutoScalerPolicy, CliError> {
        match self {
            Self::Policy(policy) => Ok(policy),
            Self::Behavior(config) => config.auto_scaler().ok_or(CliError::NoAutoScaler),
        }
    }

    /// Canonical indented JSON encoding.
    pub fn to_json_pretty(&self) -> Result<String, ProvisionError> {
        match self {
            Self::Policy(policy) => policy.to_json_pretty(),
            Self::Behavior(config) => config.to_json_pretty(),
        }
    }
}

/// Load a worker behavior config. Bare policies are rejected.
pub fn load_behavior(path: &Path) -> Result<WorkerBehaviorConfig> {
    match Document::load(path)? {
        Document::Behavior(config) => Ok(config),
        Document::Policy(_) => Err(CliError::NotABehaviorConfig(path.display().to_string()).into()),
    }
}

pub fn load_pool(path: &Path) -> Result<WorkerPool> {
    let text = read(path)?;
    let pool = WorkerPool::from_json(&text)
        .with_context(|| format!("failed to decode pool {}", path.display()))?;
    debug!(path = %path.display(), workers = pool.len(), "Loaded pool snapshot");
    Ok(pool)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = r#"{
        "type": "ec2",
        "minNumWorkers": 1,
        "maxNumWorkers": 4,
        "envConfig": {
            "region": "us-west-2",
            "availabilityZone": "us-west-2a",
            "nodeData": {
                "amiId": "ami-1",
                "instanceType": "m5.large",
                "minInstances": 1,
                "maxInstances": 1,
                "securityGroupIds": [],
                "keyName": "ops",
                "subnetId": "subnet-1"
            },
            "userData": {"impl": "string", "data": "v=%V%", "versionReplacementString": "%V%"}
        }
    }"#;

    #[test]
    fn test_detects_policy() {
        let doc = Document::parse(POLICY).unwrap();
        assert_eq!(doc.kind(), "autoscaler policy");
        assert_eq!(doc.policy().unwrap().max_num_workers(), 4);
    }

    #[test]
    fn test_detects_behavior() {
        let doc = Document::parse(&format!(r#"{{"autoScaler": {POLICY}}}"#)).unwrap();
        assert_eq!(doc.kind(), "worker behavior config");
        assert_eq!(doc.policy().unwrap().min_num_workers(), 1);
    }

    #[test]
    fn test_behavior_without_autoscaler() {
        let doc = Document::parse(r#"{"selectStrategy": {"type": "equalDistribution"}}"#).unwrap();
        assert!(matches!(doc.policy(), Err(CliError::NoAutoScaler)));

        let doc = Document::parse(r#"{"autoScaler": null}"#).unwrap();
        assert_eq!(doc.kind(), "worker behavior config");
    }

    #[test]
    fn test_policy_without_type_is_rejected() {
        let err =
            Document::parse(r#"{"minNumWorkers": 5, "maxNumWorkers": 2, "envConfig": {}}"#)
                .unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("`type` is missing"), "{err}");

        let untagged = POLICY.replace(r#""type": "ec2","#, "");
        let err = Document::parse(&untagged).unwrap_err();
        assert!(err.to_string().contains("`type` is missing"), "{err}");
    }

    #[test]
    fn test_unrecognized_document_is_rejected() {
        for text in ["{}", r#"{"workers": 3}"#, "[]"] {
            let err = Document::parse(text).unwrap_err();
            assert!(err.is_invalid_configuration(), "{text}: {err}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_load_behavior_rejects_bare_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, POLICY).unwrap();

        let err = load_behavior(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NotABehaviorConfig(_))
        ));
    }
}
