use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Wrap labelled groups into panels
    #[arg(long, default_value_t = false)]
    pub grouped: bool,
    /// Write the document here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

pub fn run(args: TranslateArgs, ctx: &Context) -> Result<()> {
    let form = ctx.load_form()?;
    let doc = form.translate(&ctx.config().survey, args.grouped);
    let json = doc
        .to_json_pretty()
        .context("failed to serialize survey document")?;
    match &args.out {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), elements = doc.elements().len(), "survey written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
