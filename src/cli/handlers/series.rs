//! Series command handlers.

use anyhow::Result;

use crate::cli::output::{
    output_json, output_json_list, print_kv, print_success, print_table, OutputMode,
};
use crate::cli::resolve::resolve_series;
use crate::cli::SeriesCommands;
use crate::init::AppContext;
use crate::models::{FlipDirection, SeriesCreate};
use crate::repository::CatalogRepository;
use crate::utils::text::slugify;

pub async fn handle(cmd: &SeriesCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        SeriesCommands::Create {
            name,
            slug,
            label,
            rtl,
        } => {
            let slug = slug.clone().unwrap_or_else(|| slugify(name));
            let mut data = SeriesCreate::new(name.clone(), slug);
            data.installment_label = label.clone();
            if *rtl {
                data.flip_direction = FlipDirection::Rtl;
            }
            let series = ctx.catalog.create_series(data).await?;
            match mode {
                OutputMode::Json => output_json(&series),
                OutputMode::Human => {
                    print_success(&format!("Created series {} [{}]", series.name, series.slug))
                }
            }
        }

        SeriesCommands::List => {
            let all = ctx.catalog.list_series().await?;
            match mode {
                OutputMode::Json => output_json_list(&all),
                OutputMode::Human => {
                    let rows = all
                        .iter()
                        .map(|s| {
                            vec![
                                s.slug.clone(),
                                s.name.clone(),
                                s.installment_label.clone(),
                                if s.is_strip { "strip".into() } else { String::new() },
                            ]
                        })
                        .collect();
                    print_table(&["Slug", "Name", "Label", ""], rows);
                }
            }
        }

        SeriesCommands::Get { series } => {
            let series = resolve_series(ctx, series).await?;
            let installments = ctx.catalog.list_installments(&series.id).await?;
            match mode {
                OutputMode::Json => {
                    output_json(&serde_json::json!({
                        "series": series,
                        "installments": installments,
                    }));
                }
                OutputMode::Human => {
                    print_kv("Name", &series.name);
                    print_kv("Slug", &series.slug);
                    print_kv("Label", &series.installment_label);
                    let rows = installments
                        .iter()
                        .map(|i| {
                            vec![
                                i.ordinal.to_string(),
                                i.label(),
                                i.title.clone().unwrap_or_default(),
                                format!("{} pages", i.page_count),
                            ]
                        })
                        .collect();
                    print_table(&["Ord", "Number", "Title", "Pages"], rows);
                }
            }
        }

        SeriesCommands::Strip { series, files } => {
            let series = resolve_series(ctx, series).await?;
            let names: Vec<String> = files
                .iter()
                .map(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| p.to_string_lossy().into_owned())
                })
                .collect();
            let created = ctx.catalog.ingest_strip(&series, &names).await?;
            match mode {
                OutputMode::Json => output_json_list(&created),
                OutputMode::Human => print_success(&format!(
                    "Re-seeded strip {} with {} installments",
                    series.name,
                    created.len()
                )),
            }
        }

        SeriesCommands::Delete { series } => {
            let series = resolve_series(ctx, series).await?;
            ctx.catalog.delete_series(&series.slug).await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "deleted": series.slug })),
                OutputMode::Human => print_success(&format!("Deleted series {}", series.name)),
            }
        }
    }
    Ok(())
}
