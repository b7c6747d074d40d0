//! Persona command handlers.

use anyhow::{anyhow, Result};

use crate::cli::output::{output_json, output_json_list, print_success, print_table, OutputMode};
use crate::cli::resolve::{resolve_character, resolve_persona};
use crate::cli::PersonaCommands;
use crate::init::AppContext;
use crate::models::{PersonaCreate, PersonaKind};
use crate::repository::RosterRepository;

fn parse_kind(input: &str) -> Result<PersonaKind> {
    match input.to_ascii_lowercase().as_str() {
        "given_name" | "gn" => Ok(PersonaKind::GivenName),
        "super_identity" | "si" => Ok(PersonaKind::SuperIdentity),
        "personality" | "ap" => Ok(PersonaKind::Personality),
        "title" | "tl" => Ok(PersonaKind::Title),
        "alias" | "jj" => Ok(PersonaKind::Alias),
        "role" | "rp" => Ok(PersonaKind::Role),
        other => Err(anyhow!("Unknown persona kind '{}'.", other)),
    }
}

pub async fn handle(cmd: &PersonaCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        PersonaCommands::Add {
            character,
            name,
            kind,
        } => {
            let chr = resolve_character(ctx, character).await?;
            let mut data = PersonaCreate::new(chr.id.clone(), name.clone());
            data.kind = parse_kind(kind)?;
            let persona = ctx.roster.add_persona(data).await?;
            match mode {
                OutputMode::Json => output_json(&persona),
                OutputMode::Human => {
                    print_success(&format!("Added persona {} ({})", persona.name, persona.id))
                }
            }
        }

        PersonaCommands::List { character } => {
            let personas = match character {
                Some(c) => {
                    let chr = resolve_character(ctx, c).await?;
                    ctx.roster.list_personas_of(&chr.id).await?
                }
                None => ctx.roster.list_personas().await?,
            };
            match mode {
                OutputMode::Json => output_json_list(&personas),
                OutputMode::Human => {
                    let rows = personas
                        .iter()
                        .map(|p| {
                            vec![
                                p.name.clone(),
                                format!("{:?}", p.kind),
                                p.id.to_string(),
                            ]
                        })
                        .collect();
                    print_table(&["Name", "Kind", "Id"], rows);
                }
            }
        }

        PersonaCommands::Delete { persona } => {
            let persona = resolve_persona(ctx, persona).await?;
            ctx.roster
                .delete_persona(&persona.id.key().to_string())
                .await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "deleted": persona.id })),
                OutputMode::Human => print_success(&format!("Deleted persona {}", persona.name)),
            }
        }
    }
    Ok(())
}
