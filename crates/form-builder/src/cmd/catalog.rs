use anyhow::{Context, Result};
use clap::Args;
use form_spec::question_pool;

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Print the templates as JSON
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

pub fn run(args: CatalogArgs) -> Result<()> {
    let pool = question_pool();
    if args.json {
        let json = serde_json::to_string_pretty(pool).context("failed to serialize catalog")?;
        println!("{json}");
        return Ok(());
    }
    for template in pool {
        println!(
            "{:<18} {:<12} {}",
            template.id,
            template.kind.question_type().as_str(),
            template.label
        );
    }
    Ok(())
}
