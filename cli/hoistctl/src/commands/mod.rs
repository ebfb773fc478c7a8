//! CLI commands.
//!
//! Every command works on local files only; nothing talks to a provider.

mod bind_region;
mod render;
mod select;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// hoistctl - Inspect and dry-run hoist worker configuration.
#[derive(Debug, Parser)]
#[command(name = "hoistctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, env = "HOIST_FORMAT")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a policy or behavior document and print its canonical form.
    Validate(validate::ValidateCommand),

    /// Render a document's user data for a worker version.
    Render(render::RenderCommand),

    /// Pick a worker for a task from a pool snapshot.
    Select(select::SelectCommand),

    /// Dry-run region binding against an in-memory client.
    BindRegion(bind_region::BindRegionCommand),
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self, config: &Config) -> Result<()> {
        let ctx = CommandContext {
            format: self.format,
            worker_version: config.worker_version.clone(),
        };

        match self.command {
            Commands::Validate(cmd) => cmd.run(&ctx),
            Commands::Render(cmd) => cmd.run(&ctx),
            Commands::Select(cmd) => cmd.run(&ctx),
            Commands::BindRegion(cmd) => cmd.run(&ctx),
        }
    }
}

/// Shared command context.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub worker_version: Option<String>,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use tempfile::TempDir;

    pub const POLICY: &str = r#"{
        "type": "ec2",
        "minNumWorkers": 2,
        "maxNumWorkers": 3,
        "envConfig": {
            "region": "us-west-2",
            "availabilityZone": "us-west-2a",
            "nodeData": {
                "amiId": "ami-abc",
                "instanceType": "t1.micro",
                "minInstances": 1,
                "maxInstances": 1,
                "securityGroupIds": ["kingsguard"],
                "keyName": "iron",
                "subnetId": "redkeep"
            },
            "userData": {"impl": "string", "data": "VERSION=:VERSION:\n", "versionReplacementString": ":VERSION:"}
        }
    }"#;

    pub fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
