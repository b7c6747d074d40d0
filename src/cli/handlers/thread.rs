//! Thread (reading order) command handlers.

use anyhow::{anyhow, Result};

use crate::cli::output::{output_json, output_json_list, print_success, print_table, OutputMode};
use crate::cli::resolve::{bare_key, resolve_installment};
use crate::cli::ThreadCommands;
use crate::init::AppContext;
use crate::models::{ThreadCreate, ThreadSequenceCreate};
use crate::repository::CatalogRepository;
use crate::utils::text::slugify;

pub async fn handle(cmd: &ThreadCommands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match cmd {
        ThreadCommands::Create {
            name,
            slug,
            synopsis,
            primary,
        } => {
            let data = ThreadCreate {
                name: name.clone(),
                slug: slug.clone().unwrap_or_else(|| slugify(name)),
                synopsis: synopsis.clone(),
                is_primary: *primary,
            };
            let thread = ctx.catalog.create_thread(data).await?;
            match mode {
                OutputMode::Json => output_json(&thread),
                OutputMode::Human => {
                    print_success(&format!("Created thread {} [{}]", thread.name, thread.slug))
                }
            }
        }

        ThreadCommands::List => {
            let threads = ctx.catalog.list_threads().await?;
            match mode {
                OutputMode::Json => output_json_list(&threads),
                OutputMode::Human => {
                    let rows = threads
                        .iter()
                        .map(|t| {
                            vec![
                                t.slug.clone(),
                                t.name.clone(),
                                if t.is_primary { "primary".into() } else { String::new() },
                            ]
                        })
                        .collect();
                    print_table(&["Slug", "Name", ""], rows);
                }
            }
        }

        ThreadCommands::AddRun { thread, begin, end } => {
            let slug = bare_key(thread, "thread");
            let thread = ctx
                .catalog
                .get_thread(&slug)
                .await?
                .ok_or_else(|| anyhow!("No thread '{}'.", slug))?;

            let begin_ins = resolve_installment(ctx, begin).await?;
            let end_ins = match end {
                Some(e) => Some(resolve_installment(ctx, e).await?),
                None => None,
            };

            // append after the current last run
            let existing = crate::models::thread::list_sequences(&ctx.db, &thread.id).await?;
            let next_order = existing.iter().map(|s| s.order).max().unwrap_or(0) + 1;

            let seq = ctx
                .catalog
                .add_thread_sequence(ThreadSequenceCreate {
                    thread: thread.id.clone(),
                    order: next_order,
                    begin_installment: begin_ins.id.clone(),
                    end_installment: end_ins.map(|i| i.id),
                })
                .await?;
            match mode {
                OutputMode::Json => output_json(&seq),
                OutputMode::Human => print_success(&format!(
                    "Added run #{} to {} starting at {}",
                    seq.order,
                    thread.name,
                    begin_ins.label()
                )),
            }
        }

        ThreadCommands::Order { thread } => {
            let slug = bare_key(thread, "thread");
            let thread = ctx
                .catalog
                .get_thread(&slug)
                .await?
                .ok_or_else(|| anyhow!("No thread '{}'.", slug))?;
            let order = ctx.catalog.reading_order(&thread).await?;
            match mode {
                OutputMode::Json => output_json_list(&order),
                OutputMode::Human => {
                    let rows = order
                        .iter()
                        .enumerate()
                        .map(|(i, ins)| {
                            vec![
                                (i + 1).to_string(),
                                ins.label(),
                                ins.title.clone().unwrap_or_default(),
                            ]
                        })
                        .collect();
                    print_table(&["#", "Number", "Title"], rows);
                }
            }
        }

        ThreadCommands::Delete { thread } => {
            let slug = bare_key(thread, "thread");
            crate::models::thread::delete_thread(&ctx.db, &slug).await?;
            match mode {
                OutputMode::Json => output_json(&serde_json::json!({ "deleted": slug })),
                OutputMode::Human => print_success(&format!("Deleted thread {}", slug)),
            }
        }
    }
    Ok(())
}
