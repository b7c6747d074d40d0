//! Credit command handlers.

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::cli::output::{output_json, output_json_list, print_success, print_table, OutputMode};
use crate::cli::resolve::resolve_installment;
use crate::cli::CreditCommands;
use crate::init::AppContext;
use crate::models::{CreatorCreate, CreditCreate, RoleCreate};
use crate::repository::RosterRepository;
use crate::utils::text::capfirst;

pub async fn handle(cmd: &CreditCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        CreditCommands::AddCreator { name } => {
            let creator = ctx
                .roster
                .create_creator(CreatorCreate {
                    working_name: name.clone(),
                })
                .await?;
            match mode {
                OutputMode::Json => output_json(&creator),
                OutputMode::Human => {
                    print_success(&format!("Registered creator {}", creator.working_name))
                }
            }
        }

        CreditCommands::AddRole { name, order } => {
            let role = ctx
                .roster
                .create_role(RoleCreate {
                    name: name.clone(),
                    order: *order,
                })
                .await?;
            match mode {
                OutputMode::Json => output_json(&role),
                OutputMode::Human => {
                    print_success(&format!("Registered role {}", capfirst(&role.name)))
                }
            }
        }

        CreditCommands::Add {
            installment,
            creator,
            role,
        } => {
            let target = resolve_installment(ctx, installment).await?;
            let creators = ctx.roster.list_creators().await?;
            let creator = creators
                .iter()
                .find(|c| c.working_name.eq_ignore_ascii_case(creator))
                .ok_or_else(|| anyhow!("No creator '{}'.", creator))?;
            let roles = ctx.roster.list_roles().await?;
            let role = roles
                .iter()
                .find(|r| r.name.eq_ignore_ascii_case(role))
                .ok_or_else(|| anyhow!("No role '{}'.", role))?;

            let credit = ctx
                .roster
                .add_credit(CreditCreate {
                    installment: target.id.clone(),
                    creator: creator.id.clone(),
                    role: role.id.clone(),
                })
                .await?;
            match mode {
                OutputMode::Json => output_json(&credit),
                OutputMode::Human => print_success(&format!(
                    "Credited {} [{}] on {}",
                    creator.working_name,
                    capfirst(&role.name),
                    target.label()
                )),
            }
        }

        CreditCommands::List { installment } => {
            let target = resolve_installment(ctx, installment).await?;
            let credits = ctx.roster.list_credits(&target.id).await?;

            let creators: HashMap<String, String> = ctx
                .roster
                .list_creators()
                .await?
                .into_iter()
                .map(|c| (c.id.to_string(), c.working_name))
                .collect();
            let roles: HashMap<String, (String, i64)> = ctx
                .roster
                .list_roles()
                .await?
                .into_iter()
                .map(|r| (r.id.to_string(), (r.name, r.order)))
                .collect();

            // role display order, then creator name
            let mut rows: Vec<(i64, String, String)> = credits
                .iter()
                .map(|c| {
                    let (role_name, role_order) = roles
                        .get(&c.role.to_string())
                        .cloned()
                        .unwrap_or_else(|| (c.role.to_string(), i64::MAX));
                    let creator_name = creators
                        .get(&c.creator.to_string())
                        .cloned()
                        .unwrap_or_else(|| c.creator.to_string());
                    (role_order, capfirst(&role_name), creator_name)
                })
                .collect();
            rows.sort();

            match mode {
                OutputMode::Json => {
                    let items: Vec<_> = rows
                        .iter()
                        .map(|(_, role, creator)| {
                            serde_json::json!({ "role": role, "creator": creator })
                        })
                        .collect();
                    output_json_list(&items);
                }
                OutputMode::Human => {
                    let table_rows = rows
                        .into_iter()
                        .map(|(_, role, creator)| vec![creator, role])
                        .collect();
                    print_table(&["Creator", "Role"], table_rows);
                }
            }
        }
    }
    Ok(())
}
