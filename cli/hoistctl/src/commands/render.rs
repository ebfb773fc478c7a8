//! Render command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hoist_provision::RenderUserData;

use crate::document::Document;
use crate::error::CliError;

use super::CommandContext;

#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Policy or behavior document (JSON).
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Worker version substituted into the template.
    #[arg(long)]
    version: Option<String>,

    /// Print the base64 payload sent to the provider instead of the text.
    #[arg(long)]
    encoded: bool,
}

impl RenderCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        println!("{}", self.rendered(ctx)?);
        Ok(())
    }

    fn rendered(&self, ctx: &CommandContext) -> Result<String> {
        let version = self
            .version
            .as_deref()
            .or(ctx.worker_version.as_deref())
            .ok_or(CliError::MissingVersion)?;

        let doc = Document::load(&self.file)?;
        let user_data = doc.policy()?.env_config().user_data();

        if self.encoded {
            Ok(user_data.render(version))
        } else {
            Ok(user_data.with_version(version).text().into_owned())
        }
    }
}
