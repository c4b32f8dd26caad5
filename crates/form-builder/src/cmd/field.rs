use anyhow::{Context as _, Result, bail};
use clap::Args;
use form_spec::{Choice, FieldEdit, NewQuestion, QuestionType, RandomIds, entries_from_texts};
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Catalog template id, e.g. `pool-radiogroup`
    #[arg(value_name = "TEMPLATE_ID")]
    pub template: String,
    /// Insert position (0-based); appends when omitted
    #[arg(long, value_name = "INDEX")]
    pub at: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long = "type", value_name = "TYPE")]
    pub question_type: QuestionType,
    /// Choice text (radiogroup, checkbox, dropdown, ranking); repeatable
    #[arg(long = "choice", value_name = "TEXT")]
    pub choices: Vec<String>,
    /// Matrix row text; repeatable
    #[arg(long = "row", value_name = "TEXT")]
    pub rows: Vec<String>,
    /// Matrix column text; repeatable
    #[arg(long = "column", value_name = "TEXT")]
    pub columns: Vec<String>,
    #[arg(long, value_name = "INDEX")]
    pub at: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    /// Replaces all choices when given; repeatable
    #[arg(long = "choice", value_name = "TEXT")]
    pub choices: Vec<String>,
    #[arg(long = "row", value_name = "TEXT")]
    pub rows: Vec<String>,
    #[arg(long = "column", value_name = "TEXT")]
    pub columns: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    pub id: String,
    /// Target position (0-based), clamped to the end of the form
    #[arg(long, value_name = "INDEX")]
    pub to: usize,
}

#[derive(Args, Debug, Clone)]
pub struct GroupArgs {
    pub id: String,
    /// Group label; clears the group when omitted
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,
}

pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    let id = form
        .add_template(&args.template, args.at, &mut RandomIds)?
        .id
        .clone();
    ctx.save_form(&form)?;
    info!(%id, template = %args.template, "added question");
    println!("{id}");
    Ok(())
}

pub fn create(args: CreateArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    let question = NewQuestion::new(args.title, args.question_type)
        .with_choices(entries_from_texts("item", &args.choices))
        .with_grid(
            entries_from_texts("row", &args.rows),
            entries_from_texts("col", &args.columns),
        );
    let id = form
        .add_question(question, args.at, &mut RandomIds)
        .context("question not added")?
        .id
        .clone();
    ctx.save_form(&form)?;
    info!(%id, "created question");
    println!("{id}");
    Ok(())
}

fn replacement(prefix: &str, texts: &[String]) -> Option<Vec<Choice>> {
    (!texts.is_empty()).then(|| entries_from_texts(prefix, texts))
}

pub fn edit(args: EditArgs, ctx: &Context) -> Result<()> {
    let edit = FieldEdit {
        title: args.title,
        choices: replacement("item", &args.choices),
        rows: replacement("row", &args.rows),
        columns: replacement("col", &args.columns),
    };
    if edit == FieldEdit::default() {
        bail!("nothing to change; pass --title, --choice, --row or --column");
    }
    let mut form = ctx.load_form()?;
    form.edit(&args.id, &edit).context("question not updated")?;
    ctx.save_form(&form)?;
    info!(id = %args.id, "edited question");
    Ok(())
}

pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    let removed = form.remove(&args.id)?;
    ctx.save_form(&form)?;
    info!(id = %removed.id, "removed question");
    Ok(())
}

pub fn move_field(args: MoveArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    form.move_field(&args.id, args.to)?;
    ctx.save_form(&form)?;
    info!(id = %args.id, to = args.to, "moved question");
    Ok(())
}

pub fn group(args: GroupArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    form.set_group(&args.id, args.label.as_deref())?;
    ctx.save_form(&form)?;
    info!(id = %args.id, label = ?args.label, "updated group");
    Ok(())
}
