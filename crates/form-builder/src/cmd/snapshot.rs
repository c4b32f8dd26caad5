use anyhow::{Context as _, Result, bail};
use clap::Args;
use form_spec::{Form, Overwrite, SnapshotStore, StoreError};
use time::format_description::well_known::Rfc3339;
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    pub name: String,
    /// Replace an existing snapshot with the same name
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub name: String,
}

pub fn save(args: SaveArgs, ctx: &Context) -> Result<()> {
    let form = ctx.load_form()?;
    let mut store = ctx.open_store()?;
    let overwrite = if args.overwrite {
        Overwrite::Allow
    } else {
        Overwrite::Deny
    };
    match store.save(&args.name, form.fields(), overwrite) {
        Ok(entry) => {
            println!("saved '{}'", entry.name);
            Ok(())
        }
        Err(StoreError::AlreadyExists(name)) => {
            bail!("a snapshot named '{name}' already exists; pass --overwrite to replace it")
        }
        Err(err) => Err(err).context("snapshot not saved"),
    }
}

pub fn load(args: LoadArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let Some(fields) = store.load(&args.name)? else {
        bail!("no snapshot named '{}'", args.name.trim());
    };
    let form = Form::new(fields);
    ctx.save_form(&form)?;
    info!(name = %args.name, fields = form.len(), path = %ctx.form_path().display(), "snapshot loaded");
    println!("loaded '{}' ({} questions)", args.name.trim(), form.len());
    Ok(())
}

pub fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let entries = store.list()?;
    if args.json {
        let json = serde_json::to_string_pretty(&entries).context("failed to serialize index")?;
        println!("{json}");
        return Ok(());
    }
    for entry in entries {
        let saved_at = entry
            .saved_at
            .format(&Rfc3339)
            .context("failed to format timestamp")?;
        println!("{}\t{saved_at}", entry.name);
    }
    Ok(())
}

pub fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    if !store.delete(&args.name)? {
        bail!("no snapshot named '{}'", args.name.trim());
    }
    println!("deleted '{}'", args.name.trim());
    Ok(())
}
