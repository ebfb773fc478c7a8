//! Validate command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::document::Document;
use crate::output::{print_info, print_json, print_success, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Policy or behavior document (JSON).
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateReport {
    valid: bool,
    kind: &'static str,
    document: serde_json::Value,
}

impl ValidateCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let doc = Document::load(&self.file)?;
        let canonical = doc.to_json_pretty()?;

        match ctx.format {
            OutputFormat::Json => {
                let report = ValidateReport {
                    valid: true,
                    kind: doc.kind(),
                    document: serde_json::from_str(&canonical)?,
                };
                print_json(&report);
            }
            OutputFormat::Text => {
                print_success(&format!("{} is a valid {}", self.file.display(), doc.kind()));
                if let Ok(policy) = doc.policy() {
                    print_info(&format!(
                        "{} workers: {}..={}",
                        policy.provider_type(),
                        policy.min_num_workers(),
                        policy.max_num_workers()
                    ));
                }
                println!("{canonical}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hoist_provision::ProvisionError;

    use super::super::testing::{write, POLICY};
    use super::*;

    #[test]
    fn test_validate_policy() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ValidateCommand {
            file: write(&dir, "policy.json", POLICY),
        };
        cmd.run(&CommandContext::default()).unwrap();
    }

    #[test]
    fn test_validate_unknown_provider() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ValidateCommand {
            file: write(&dir, "policy.json", &POLICY.replace("\"ec2\"", "\"gce\"")),
        };

        let err = cmd.run(&CommandContext::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProvisionError>(),
            Some(&ProvisionError::UnsupportedProviderType("gce".to_string()))
        );
    }

    #[test]
    fn test_validate_inverted_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ValidateCommand {
            file: write(
                &dir,
                "policy.json",
                &POLICY.replace("\"minNumWorkers\": 2", "\"minNumWorkers\": 5"),
            ),
        };

        let err = cmd.run(&CommandContext::default()).unwrap_err();
        assert!(err
            .downcast_ref::<ProvisionError>()
            .is_some_and(ProvisionError::is_invalid_configuration));
    }
}
