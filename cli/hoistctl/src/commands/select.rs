//! Select command.
//!
//! Runs the behavior config's strategy over a pool snapshot. Finding no
//! eligible worker is a normal outcome, not an error.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hoist_provision::WorkerBehaviorConfig;
use hoist_select::{Selection, WorkerPool};
use serde::Serialize;

use crate::document::{load_behavior, load_pool};
use crate::output::{print_info, print_json, print_warning, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct SelectCommand {
    /// Worker behavior config (JSON).
    #[arg(value_name = "BEHAVIOR_FILE")]
    behavior: PathBuf,

    /// Pool snapshot: a JSON array of {host, capacity, currentLoad}.
    #[arg(long, value_name = "POOL_FILE")]
    pool: PathBuf,

    /// Affinity key of the task being placed.
    #[arg(long)]
    key: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectReport {
    host: Option<String>,
    free_capacity: Option<u32>,
}

impl From<Selection<'_>> for SelectReport {
    fn from(selection: Selection<'_>) -> Self {
        Self {
            host: selection.host().map(str::to_string),
            free_capacity: selection.worker().map(|w| w.free_capacity()),
        }
    }
}

impl SelectCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let config = load_behavior(&self.behavior)?;
        let pool = load_pool(&self.pool)?;
        let report = self.report(&config, &pool);

        match ctx.format {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Text => match (&report.host, report.free_capacity) {
                (Some(host), Some(free)) => {
                    println!("{host}");
                    print_info(&format!("{free} free slot(s)"));
                }
                _ => print_warning("no eligible worker"),
            },
        }

        Ok(())
    }

    fn report(&self, config: &WorkerBehaviorConfig, pool: &WorkerPool) -> SelectReport {
        config
            .select_strategy()
            .select(pool, self.key.as_deref())
            .into()
    }
}
