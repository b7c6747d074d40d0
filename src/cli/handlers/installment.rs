//! Installment command handlers.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::cli::output::{
    create_spinner, output_json, output_json_list, print_success, print_table, OutputMode,
};
use crate::cli::resolve::{resolve_installment, resolve_series};
use crate::cli::InstallmentCommands;
use crate::init::AppContext;
use crate::models::{InstallmentCreate, InstallmentUpdate};
use crate::repository::CatalogRepository;
use crate::services::ingest::{self, UploadKind};
use crate::utils::numeral::IssueNumber;

fn parse_number(input: &str) -> Result<Option<IssueNumber>> {
    if input.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(input.parse::<IssueNumber>().map_err(|e| anyhow!("{}", e))?))
}

pub async fn handle(cmd: &InstallmentCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        InstallmentCommands::Create {
            series,
            number,
            title,
            synopsis,
            release,
        } => {
            let series = resolve_series(ctx, series).await?;
            let mut data = InstallmentCreate::new(series.id.clone());
            data.number = match number {
                Some(n) => parse_number(n)?,
                None => None,
            };
            data.title = title.clone();
            data.synopsis = synopsis.clone();
            data.release_datetime = match release {
                Some(r) => {
                    let parsed: DateTime<Utc> = r
                        .parse()
                        .map_err(|e| anyhow!("Invalid release datetime '{}': {}", r, e))?;
                    Some(parsed.into())
                }
                None => None,
            };
            let installment = ctx.catalog.create_installment(data).await?;
            match mode {
                OutputMode::Json => output_json(&installment),
                OutputMode::Human => print_success(&format!(
                    "Created {} {} (ordinal {})",
                    series.installment_label,
                    installment.label(),
                    installment.ordinal
                )),
            }
        }

        InstallmentCommands::Update {
            installment,
            number,
            title,
            synopsis,
        } => {
            let target = resolve_installment(ctx, installment).await?;
            let data = InstallmentUpdate {
                number: match number {
                    Some(n) => Some(parse_number(n)?),
                    None => None,
                },
                title: title.clone().map(Some),
                synopsis: synopsis.clone().map(Some),
                ..Default::default()
            };
            let updated = ctx
                .catalog
                .update_installment(&target.id.key().to_string(), data)
                .await?
                .ok_or_else(|| anyhow!("Installment vanished during update."))?;
            match mode {
                OutputMode::Json => output_json(&updated),
                OutputMode::Human => print_success(&format!(
                    "Updated {} (ordinal {})",
                    updated.label(),
                    updated.ordinal
                )),
            }
        }

        InstallmentCommands::List { series } => {
            let series = resolve_series(ctx, series).await?;
            let installments = ctx.catalog.list_installments(&series.id).await?;
            match mode {
                OutputMode::Json => output_json_list(&installments),
                OutputMode::Human => {
                    let rows = installments
                        .iter()
                        .map(|i| {
                            vec![
                                i.ordinal.to_string(),
                                i.label(),
                                i.title.clone().unwrap_or_default(),
                                format!("{}", i.page_count),
                            ]
                        })
                        .collect();
                    print_table(&["Ord", "Number", "Title", "Pages"], rows);
                }
            }
        }

        InstallmentCommands::Ingest {
            installment,
            files,
            pdf_pages,
        } => {
            let target = resolve_installment(ctx, installment).await?;
            let names: Vec<String> = files
                .iter()
                .map(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| p.to_string_lossy().into_owned())
                })
                .collect();

            let plan = match ingest::classify_upload(&names)? {
                UploadKind::Images => ingest::plan_image_pages(&names),
                UploadKind::Pdf => {
                    let count = pdf_pages
                        .ok_or_else(|| anyhow!("--pdf-pages is required when ingesting a PDF"))?;
                    ingest::plan_pdf_pages(&names[0], count)
                }
            };

            let spinner = create_spinner(&format!(
                "Replacing {} pages of {}...",
                plan.pages.len(),
                target.label()
            ));
            let pages = ctx.catalog.replace_pages(&target.id, &plan).await?;
            spinner.finish_and_clear();

            match mode {
                OutputMode::Json => output_json_list(&pages),
                OutputMode::Human => print_success(&format!(
                    "Ingested {} pages into {}{}",
                    pages.len(),
                    target.label(),
                    if plan.has_cover { " (with cover)" } else { "" }
                )),
            }
        }

        InstallmentCommands::Pages { installment } => {
            let target = resolve_installment(ctx, installment).await?;
            let pages = ctx.catalog.list_pages(&target.id).await?;
            match mode {
                OutputMode::Json => output_json_list(&pages),
                OutputMode::Human => {
                    let rows = pages
                        .iter()
                        .map(|p| {
                            vec![
                                p.order.to_string(),
                                p.original_name.clone().unwrap_or_default(),
                            ]
                        })
                        .collect();
                    print_table(&["Order", "Original name"], rows);
                }
            }
        }

        InstallmentCommands::NextNumber { series } => {
            let series = resolve_series(ctx, series).await?;
            let suggestion = ctx.catalog.suggest_next_number(&series.id).await?;
            match mode {
                OutputMode::Json => {
                    output_json(&serde_json::json!({
                        "series": series.slug,
                        "next_number": suggestion.map(|n| n.to_string()),
                    }));
                }
                OutputMode::Human => match suggestion {
                    Some(n) => println!("{}", n),
                    None => println!("(no numbered installments yet)"),
                },
            }
        }

        InstallmentCommands::Delete { installment } => {
            let target = resolve_installment(ctx, installment).await?;
            ctx.catalog
                .delete_installment(&target.id.key().to_string())
                .await?;
            match mode {
                OutputMode::Json => {
                    output_json(&serde_json::json!({ "deleted": target.id.to_string() }))
                }
                OutputMode::Human => print_success(&format!("Deleted {}", target.label())),
            }
        }
    }
    Ok(())
}
