//! Bind-region command.
//!
//! Builds a provisioner over an in-memory client and reports what the
//! configured region would do to a real one.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use hoist_provision::{AutoScalerPolicy, BindOutcome, ClientHandle, DryRunClient, Provisioner};
use serde::Serialize;

use crate::document::Document;
use crate::output::{print_json, print_success, print_warning, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct BindRegionCommand {
    /// Policy or behavior document (JSON).
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct BindReport {
    configured: Option<String>,
    outcome: &'static str,
    region: Option<String>,
}

impl BindRegionCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let doc = Document::load(&self.file)?;
        let report = dry_run(doc.policy()?);

        match ctx.format {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Text => match (&report.region, &report.configured) {
                (Some(region), _) => print_success(&format!("client bound to {region}")),
                (None, Some(name)) => {
                    print_warning(&format!("unknown region {name:?}, keeping provider default"))
                }
                (None, None) => print_warning("no region configured, keeping provider default"),
            },
        }

        Ok(())
    }
}

fn dry_run(policy: &AutoScalerPolicy) -> BindReport {
    let client = Arc::new(ClientHandle::new(DryRunClient::new()));
    let provisioner = Provisioner::new(policy.clone(), Arc::clone(&client));

    let outcome = match provisioner.bind_region() {
        BindOutcome::NoRegion => "noRegion",
        BindOutcome::Bound(_) => "bound",
        BindOutcome::AlreadyBound => "alreadyBound",
        BindOutcome::InvalidRegion(_) => "invalidRegion",
    };

    BindReport {
        configured: policy.env_config().region().map(str::to_string),
        outcome,
        region: client.region().map(|r| r.to_string()),
    }
}
