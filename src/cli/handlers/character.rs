//! Character command handlers.

use anyhow::Result;

use crate::cli::output::{
    output_json, output_json_list, print_kv, print_success, print_table, OutputMode,
};
use crate::cli::resolve::{character_with_name, resolve_persona};
use crate::cli::CharacterCommands;
use crate::init::AppContext;
use crate::repository::RosterRepository;
use crate::utils::text::sort_dir;

pub async fn handle(cmd: &CharacterCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        CharacterCommands::Create { name, bio } => {
            let (chr, persona) = ctx.roster.create_character(name, bio).await?;
            match mode {
                OutputMode::Json => {
                    output_json(&serde_json::json!({ "character": chr, "persona": persona }))
                }
                OutputMode::Human => {
                    print_success(&format!("Created character {} ({})", persona.name, chr.id))
                }
            }
        }

        CharacterCommands::List => {
            let all = ctx.roster.list_characters().await?;
            let mut rows = Vec::with_capacity(all.len());
            for chr in &all {
                let name = ctx.roster.character_name(chr).await?;
                rows.push((sort_dir(&name), name, chr.id.to_string()));
            }
            rows.sort();
            match mode {
                OutputMode::Json => {
                    let items: Vec<_> = rows
                        .iter()
                        .map(|(_, name, id)| serde_json::json!({ "id": id, "name": name }))
                        .collect();
                    output_json_list(&items);
                }
                OutputMode::Human => {
                    let table_rows = rows
                        .into_iter()
                        .map(|(dir, name, id)| vec![dir.to_string(), name, id])
                        .collect();
                    print_table(&["", "Name", "Id"], table_rows);
                }
            }
        }

        CharacterCommands::Get { character } => {
            let (chr, name) = character_with_name(ctx, character).await?;
            let personas = ctx.roster.list_personas_of(&chr.id).await?;
            let first = ctx
                .roster
                .first_appearances(&chr.id.key().to_string())
                .await?;
            match mode {
                OutputMode::Json => {
                    let first_issues: Vec<_> = first
                        .iter()
                        .map(|f| {
                            serde_json::json!({
                                "series": f.series.slug,
                                "installment": f.installment.label(),
                            })
                        })
                        .collect();
                    output_json(&serde_json::json!({
                        "character": chr,
                        "name": name,
                        "personas": personas,
                        "first_issues": first_issues,
                    }));
                }
                OutputMode::Human => {
                    print_kv("Name", &name);
                    if !chr.bio.is_empty() {
                        print_kv("Bio", &chr.bio);
                    }
                    let aka: Vec<String> = personas
                        .iter()
                        .filter(|p| Some(&p.id) != chr.primary_persona.as_ref())
                        .map(|p| p.name.clone())
                        .collect();
                    if !aka.is_empty() {
                        print_kv("A.k.a.", &aka.join(", "));
                    }
                    let rows = first
                        .iter()
                        .map(|f| vec![f.series.name.clone(), f.installment.label()])
                        .collect();
                    print_table(&["Series", "First issue"], rows);
                }
            }
        }

        CharacterCommands::SetPrimary { character, persona } => {
            let (chr, _) = character_with_name(ctx, character).await?;
            let persona = resolve_persona(ctx, persona).await?;
            ctx.roster
                .set_primary_persona(
                    &chr.id.key().to_string(),
                    &persona.id.key().to_string(),
                )
                .await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "primary": persona.id })),
                OutputMode::Human => {
                    print_success(&format!("{} is now the primary persona", persona.name))
                }
            }
        }

        CharacterCommands::Backfill { character } => {
            let (chr, name) = character_with_name(ctx, character).await?;
            let updated = ctx
                .roster
                .backfill_creators(&chr.id.key().to_string())
                .await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "updated": updated })),
                OutputMode::Human => {
                    print_success(&format!("Backfilled creators on {} personas of {}", updated, name))
                }
            }
        }

        CharacterCommands::FirstIssues { character } => {
            let (chr, _) = character_with_name(ctx, character).await?;
            let first = ctx
                .roster
                .first_appearances(&chr.id.key().to_string())
                .await?;
            match mode {
                OutputMode::Json => {
                    let items: Vec<_> = first
                        .iter()
                        .map(|f| {
                            serde_json::json!({
                                "series": f.series.slug,
                                "installment": f.installment.label(),
                                "ordinal": f.installment.ordinal,
                            })
                        })
                        .collect();
                    output_json_list(&items);
                }
                OutputMode::Human => {
                    let rows = first
                        .iter()
                        .map(|f| vec![f.series.name.clone(), f.installment.label()])
                        .collect();
                    print_table(&["Series", "First issue"], rows);
                }
            }
        }

        CharacterCommands::Delete { character } => {
            let (chr, name) = character_with_name(ctx, character).await?;
            ctx.roster.delete_character(&chr.id.key().to_string()).await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "deleted": chr.id })),
                OutputMode::Human => print_success(&format!("Deleted character {}", name)),
            }
        }
    }
    Ok(())
}
