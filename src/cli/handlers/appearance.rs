//! Appearance range command handlers.

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::cli::output::{output_json, print_success, print_table, OutputMode};
use crate::cli::resolve::{resolve_installment, resolve_persona};
use crate::cli::AppearanceCommands;
use crate::init::AppContext;
use crate::models::AppearanceKind;
use crate::repository::RosterRepository;
use crate::services::appearances::RangeEntry;

/// One entry of a YAML range file.
#[derive(Debug, Deserialize)]
struct RangeEntryInput {
    persona: String,
    begin: i64,
    end: i64,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    delete: bool,
}

/// Parse an inline "persona:begin:end[:type]" range argument.
fn parse_inline(arg: &str) -> Result<RangeEntryInput> {
    let parts: Vec<&str> = arg.split(':').collect();
    let (persona, begin, end, kind) = match parts.as_slice() {
        [persona, begin, end] => (persona, begin, end, None),
        [persona, begin, end, kind] => (persona, begin, end, Some(kind.to_string())),
        _ => {
            return Err(anyhow!(
                "Expected 'persona:begin:end[:type]', got '{}'.",
                arg
            ))
        }
    };
    Ok(RangeEntryInput {
        persona: persona.to_string(),
        begin: begin
            .parse()
            .map_err(|_| anyhow!("Bad begin ordinal in '{}'.", arg))?,
        end: end
            .parse()
            .map_err(|_| anyhow!("Bad end ordinal in '{}'.", arg))?,
        kind,
        delete: false,
    })
}

async fn to_entries(ctx: &AppContext, inputs: Vec<RangeEntryInput>) -> Result<Vec<RangeEntry>> {
    let mut entries = Vec::with_capacity(inputs.len());
    for input in inputs {
        let persona = resolve_persona(ctx, &input.persona).await?;
        let kind = match &input.kind {
            Some(k) => k.parse::<AppearanceKind>().map_err(|e| anyhow!("{}", e))?,
            None => AppearanceKind::Normal,
        };
        entries.push(RangeEntry {
            persona: persona.id,
            begin_ord: input.begin,
            end_ord: input.end,
            kind,
            delete: input.delete,
        });
    }
    Ok(entries)
}

pub async fn handle(cmd: &AppearanceCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        AppearanceCommands::Set {
            installment,
            ranges,
            file,
        } => {
            let target = resolve_installment(ctx, installment).await?;

            let mut inputs: Vec<RangeEntryInput> = Vec::new();
            if let Some(path) = file {
                let contents = std::fs::read_to_string(path)?;
                inputs = serde_yaml_ng::from_str(&contents)
                    .map_err(|e| anyhow!("Bad range file: {}", e))?;
            }
            for arg in ranges {
                inputs.push(parse_inline(arg)?);
            }

            let entries = to_entries(ctx, inputs).await?;
            let created = ctx.roster.replace_appearances(&target.id, &entries).await?;
            match mode {
                OutputMode::Json => {
                    output_json(&serde_json::json!({
                        "installment": target.id.to_string(),
                        "rows": created.len(),
                    }));
                }
                OutputMode::Human => {
                    if created.is_empty() {
                        print_success("No changes; appearances left untouched.");
                    } else {
                        print_success(&format!(
                            "Replaced appearances of {} with {} rows",
                            target.label(),
                            created.len()
                        ));
                    }
                }
            }
        }

        AppearanceCommands::List { installment } => {
            let target = resolve_installment(ctx, installment).await?;
            let ranges = ctx.roster.appearance_ranges(&target.id).await?;
            match mode {
                OutputMode::Json => output_json(&ranges),
                OutputMode::Human => {
                    let mut rows = Vec::with_capacity(ranges.len());
                    for r in &ranges {
                        let persona = ctx
                            .roster
                            .get_persona(&r.persona.key().to_string())
                            .await?
                            .map(|p| p.name)
                            .unwrap_or_else(|| r.persona.to_string());
                        let pages = if r.begin_ord == r.end_ord {
                            format!("[{}]", r.begin_ord)
                        } else {
                            format!("[{}-{}]", r.begin_ord, r.end_ord)
                        };
                        rows.push(vec![persona, pages, r.kind.as_str().to_string()]);
                    }
                    print_table(&["Persona", "Pages", "Type"], rows);
                }
            }
        }
    }
    Ok(())
}
