use anyhow::{Context as _, Result, anyhow, bail};
use clap::Args;
use form_spec::{Field, LogicDraft, Rule, decode_rule};
use tracing::info;

use super::Context;

#[derive(Args, Debug, Clone)]
pub struct LogicArgs {
    /// Question whose logic is replaced
    pub id: String,
    /// `KIND=EXPRESSION`, e.g. `visible={q1} = 'yes'` or `require={q2} notempty`; repeatable
    #[arg(long = "rule", value_name = "KIND=EXPR", conflicts_with = "repeat")]
    pub rules: Vec<String>,
    /// Repeat the question once per unit of this number question's answer
    #[arg(long, value_name = "SOURCE_ID")]
    pub repeat: Option<String>,
    /// Always require an answer
    #[arg(long, default_value_t = false)]
    pub required: bool,
    /// Print the current logic as an editor draft instead of changing it
    #[arg(long, default_value_t = false, conflicts_with_all = ["rules", "repeat", "required"])]
    pub show: bool,
}

pub fn run(args: LogicArgs, ctx: &Context) -> Result<()> {
    let mut form = ctx.load_form()?;
    if args.show {
        let draft = form.logic_draft(&args.id)?;
        let json = serde_json::to_string_pretty(&draft).context("failed to serialize draft")?;
        println!("{json}");
        return Ok(());
    }

    let draft = match &args.repeat {
        Some(source) => LogicDraft::repeat(source.as_str()),
        None => {
            let rules = args
                .rules
                .iter()
                .map(|raw| parse_rule(raw, form.fields()))
                .collect::<Result<Vec<_>>>()?;
            LogicDraft::conditional(rules)
        }
    }
    .with_required(args.required);

    let field = form
        .apply_logic(&args.id, &draft)
        .with_context(|| format!("logic for '{}' not saved", args.id))?;
    let summary = serde_json::to_string(&field.logic).context("failed to serialize logic")?;
    ctx.save_form(&form)?;
    info!(id = %args.id, logic = %summary, "logic replaced");
    Ok(())
}

fn parse_rule(raw: &str, fields: &[Field]) -> Result<Rule> {
    let (kind, expression) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("rule '{raw}' must look like KIND=EXPRESSION"))?;
    let kind = kind.trim();
    if kind.is_empty() {
        bail!("rule '{raw}' is missing its kind");
    }
    decode_rule(kind, expression, fields)
        .ok_or_else(|| anyhow!("'{expression}' is not a recognised condition"))
}
