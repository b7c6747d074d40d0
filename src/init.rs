//! Shared initialization logic for CLI commands.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::connection::{init_db, load_db_config, LongboxDb};
use crate::db::schema::apply_schema;
use crate::repository::{SurrealCatalogRepository, SurrealRosterRepository};

/// Application context holding the database handle and repositories.
pub struct AppContext {
    pub db: Arc<LongboxDb>,
    pub data_path: PathBuf,
    pub catalog: Arc<SurrealCatalogRepository>,
    pub roster: Arc<SurrealRosterRepository>,
}

impl AppContext {
    /// Initialize application context.
    ///
    /// Data path priority: explicit path > LONGBOX_DATA_PATH env > ./.longbox (if exists) > ~/.longbox
    pub async fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = explicit_path
            .or_else(|| std::env::var("LONGBOX_DATA_PATH").ok().map(PathBuf::from))
            .or_else(|| {
                let local_path = Path::new(".longbox");
                if local_path.exists() && local_path.is_dir() {
                    Some(local_path.to_path_buf())
                } else {
                    None
                }
            })
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".longbox"))
                    .unwrap_or_else(|| PathBuf::from(".longbox"))
            });

        tracing::info!("Using data path: {}", data_path.display());

        let config = load_db_config(&data_path);
        let db = init_db(&config, &data_path).await?;
        tracing::info!("Database connected");

        apply_schema(&db).await?;
        tracing::info!("Schema applied");

        let db = Arc::new(db);

        let catalog = Arc::new(SurrealCatalogRepository::new(db.clone()));
        let roster = Arc::new(SurrealRosterRepository::new(db.clone()));

        Ok(Self {
            db,
            data_path,
            catalog,
            roster,
        })
    }
}
