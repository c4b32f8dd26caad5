use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cmd::{
    self, Context,
    catalog::CatalogArgs,
    field::{AddArgs, CreateArgs, EditArgs, GroupArgs, MoveArgs, RemoveArgs},
    logic::LogicArgs,
    snapshot::{DeleteArgs, ListArgs, LoadArgs, SaveArgs},
    translate::TranslateArgs,
};
use crate::config::BuilderConfig;
use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "form-builder",
    about = "Assemble survey forms with conditional and repeat logic",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Working form file (a JSON list of fields)
    #[arg(long, value_name = "PATH", default_value = "form.json", global = true)]
    form: PathBuf,

    /// Config file; defaults to the per-user config.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Snapshot directory, overriding `[store] dir`
    #[arg(long = "store-dir", value_name = "DIR", global = true)]
    store_dir: Option<PathBuf>,

    /// Log at debug level unless FORM_BUILDER_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the question templates
    Catalog(CatalogArgs),
    /// Add a question from a catalog template
    Add(AddArgs),
    /// Add a custom question
    Create(CreateArgs),
    /// Change a question's title or options
    Edit(EditArgs),
    /// Remove a question
    Remove(RemoveArgs),
    /// Move a question to another position
    Move(MoveArgs),
    /// Set or clear a question's group label
    Group(GroupArgs),
    /// Replace a question's logic
    Logic(LogicArgs),
    /// Print the survey document for the rendering engine
    Translate(TranslateArgs),
    /// Save the form as a named snapshot
    Save(SaveArgs),
    /// Replace the form with a saved snapshot
    Load(LoadArgs),
    /// List saved snapshots
    List(ListArgs),
    /// Delete a saved snapshot
    Delete(DeleteArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let config = BuilderConfig::load(cli.config.as_deref())?;
    let ctx = Context::new(cli.form, config, cli.store_dir);
    match cli.command {
        Commands::Catalog(args) => cmd::catalog::run(args),
        Commands::Add(args) => cmd::field::add(args, &ctx),
        Commands::Create(args) => cmd::field::create(args, &ctx),
        Commands::Edit(args) => cmd::field::edit(args, &ctx),
        Commands::Remove(args) => cmd::field::remove(args, &ctx),
        Commands::Move(args) => cmd::field::move_field(args, &ctx),
        Commands::Group(args) => cmd::field::group(args, &ctx),
        Commands::Logic(args) => cmd::logic::run(args, &ctx),
        Commands::Translate(args) => cmd::translate::run(args, &ctx),
        Commands::Save(args) => cmd::snapshot::save(args, &ctx),
        Commands::Load(args) => cmd::snapshot::load(args, &ctx),
        Commands::List(args) => cmd::snapshot::list(args, &ctx),
        Commands::Delete(args) => cmd::snapshot::delete(args, &ctx),
    }
}
