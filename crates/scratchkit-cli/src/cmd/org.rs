use crate::connect::ConnectionArgs;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use scratchkit_core::definition::BooleanFixup;
use scratchkit_core::extract::ShapeExtractor;
use scratchkit_core::paths::{definition_path, DEFAULT_OUTPUT_DIR};
use scratchkit_core::types::ExtractionScope;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum OrgSubcommand {
    /// Org shape commands
    Shape {
        #[command(subcommand)]
        subcommand: ShapeSubcommand,
    },
}

#[derive(Subcommand)]
pub enum ShapeSubcommand {
    /// Write a scratch org definition file describing the target org
    Extract {
        /// Directory for project-scratch-def.json, relative to the working directory
        #[arg(long = "outputdir", short = 'd', default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// What to extract: basic, full, or shaperepresentation
        #[arg(long, short = 's', default_value_t = ExtractionScope::Basic)]
        scope: ExtractionScope,
        /// Unquote every "true"/"false" in the output text, not just settings values
        #[arg(long)]
        legacy_boolean_fixup: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(connection: &ConnectionArgs, subcmd: OrgSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        OrgSubcommand::Shape {
            subcommand:
                ShapeSubcommand::Extract {
                    output_dir,
                    scope,
                    legacy_boolean_fixup,
                },
        } => {
            let fixup = if legacy_boolean_fixup {
                BooleanFixup::Legacy
            } else {
                BooleanFixup::Typed
            };
            extract(connection, &output_dir, scope, fixup, json)
        }
    }
}

// ---------------------------------------------------------------------------
// shape extract
// ---------------------------------------------------------------------------

fn extract(
    connection: &ConnectionArgs,
    output_dir: &Path,
    scope: ExtractionScope,
    fixup: BooleanFixup,
    json: bool,
) -> anyhow::Result<()> {
    warn!("org shape extract is a beta command; review the generated definition before use");

    let rt = tokio::runtime::Runtime::new()?;
    let extraction = rt.block_on(async {
        let client = connection.connect().await?;
        ShapeExtractor::new(&client, scope)
            .extract()
            .await
            .context("org shape extraction failed")
    })?;

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let path = definition_path(&cwd, output_dir);
    extraction.definition.write(&path, fixup)?;
    info!(path = %path.display(), "definition written");

    if json {
        // Legacy text replacement may not yield valid JSON, so the result
        // object always carries the typed rendering.
        let rendered: serde_json::Value =
            serde_json::from_str(&extraction.definition.render(BooleanFixup::Typed)?)?;
        print_json(&serde_json::json!({
            "org": extraction.org_id,
            "message": rendered,
        }))?;
    } else {
        println!(
            "Scratch org definition for {} written to {}",
            extraction.definition.org_name,
            path.display()
        );
    }
    Ok(())
}
