use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::{
    Installment, InstallmentCreate, InstallmentUpdate, Page, Series, SeriesCreate, SeriesUpdate,
    Thread, ThreadCreate, ThreadSequence, ThreadSequenceCreate,
};
use crate::services::ingest::IngestPlan;
use crate::services::ordering::{self, SaveChange};
use crate::services::{ingest, threads};
use crate::utils::numeral::IssueNumber;
use crate::LongboxError;

/// Repository trait for the catalog aggregate: series, installments, pages,
/// threads.
///
/// Installment writes run the natural-ordering maintainer as part of the
/// operation, so `ordinal` is already settled when a call returns.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Series operations
    async fn create_series(&self, data: SeriesCreate) -> Result<Series, LongboxError>;
    async fn get_series(&self, slug: &str) -> Result<Option<Series>, LongboxError>;
    async fn list_series(&self) -> Result<Vec<Series>, LongboxError>;
    async fn update_series(
        &self,
        slug: &str,
        data: SeriesUpdate,
    ) -> Result<Option<Series>, LongboxError>;
    async fn delete_series(&self, slug: &str) -> Result<Option<Series>, LongboxError>;

    // Installment operations
    async fn create_installment(
        &self,
        data: InstallmentCreate,
    ) -> Result<Installment, LongboxError>;
    async fn get_installment(&self, id: &str) -> Result<Option<Installment>, LongboxError>;
    async fn list_installments(
        &self,
        series: &RecordId,
    ) -> Result<Vec<Installment>, LongboxError>;
    async fn update_installment(
        &self,
        id: &str,
        data: InstallmentUpdate,
    ) -> Result<Option<Installment>, LongboxError>;
    async fn delete_installment(&self, id: &str) -> Result<Option<Installment>, LongboxError>;
    async fn suggest_next_number(
        &self,
        series: &RecordId,
    ) -> Result<Option<IssueNumber>, LongboxError>;

    // Page operations
    async fn list_pages(&self, installment: &RecordId) -> Result<Vec<Page>, LongboxError>;
    async fn replace_pages(
        &self,
        installment: &RecordId,
        plan: &IngestPlan,
    ) -> Result<Vec<Page>, LongboxError>;
    async fn ingest_strip(
        &self,
        series: &Series,
        names: &[String],
    ) -> Result<Vec<Installment>, LongboxError>;

    // Thread operations
    async fn create_thread(&self, data: ThreadCreate) -> Result<Thread, LongboxError>;
    async fn get_thread(&self, slug: &str) -> Result<Option<Thread>, LongboxError>;
    async fn list_threads(&self) -> Result<Vec<Thread>, LongboxError>;
    async fn add_thread_sequence(
        &self,
        data: ThreadSequenceCreate,
    ) -> Result<ThreadSequence, LongboxError>;
    async fn reading_order(&self, thread: &Thread) -> Result<Vec<Installment>, LongboxError>;
}

/// SurrealDB implementation of CatalogRepository.
///
/// Wraps the database connection and delegates to model functions, layering
/// the ordering maintainer onto installment writes.
pub struct SurrealCatalogRepository {
    db: Arc<LongboxDb>,
}

impl SurrealCatalogRepository {
    /// Create a new repository with the given database connection.
    pub fn new(db: Arc<LongboxDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SurrealCatalogRepository {
    async fn create_series(&self, data: SeriesCreate) -> Result<Series, LongboxError> {
        crate::models::series::create_series(&self.db, data).await
    }

    async fn get_series(&self, slug: &str) -> Result<Option<Series>, LongboxError> {
        crate::models::series::get_series(&self.db, slug).await
    }

    async fn list_series(&self) -> Result<Vec<Series>, LongboxError> {
        crate::models::series::list_series(&self.db).await
    }

    async fn update_series(
        &self,
        slug: &str,
        data: SeriesUpdate,
    ) -> Result<Option<Series>, LongboxError> {
        crate::models::series::update_series(&self.db, slug, data).await
    }

    async fn delete_series(&self, slug: &str) -> Result<Option<Series>, LongboxError> {
        crate::models::series::delete_series(&self.db, slug).await
    }

    async fn create_installment(
        &self,
        data: InstallmentCreate,
    ) -> Result<Installment, LongboxError> {
        let saved = crate::models::installment::create_installment(&self.db, data).await?;
        ordering::resequence_after_save(&self.db, &saved, SaveChange::created()).await?;
        // re-read to pick up the assigned ordinal
        let refreshed =
            crate::models::installment::get_installment(&self.db, &saved.id.key().to_string())
                .await?;
        Ok(refreshed.unwrap_or(saved))
    }

    async fn get_installment(&self, id: &str) -> Result<Option<Installment>, LongboxError> {
        crate::models::installment::get_installment(&self.db, id).await
    }

    async fn list_installments(
        &self,
        series: &RecordId,
    ) -> Result<Vec<Installment>, LongboxError> {
        crate::models::installment::list_installments(&self.db, series).await
    }

    async fn update_installment(
        &self,
        id: &str,
        data: InstallmentUpdate,
    ) -> Result<Option<Installment>, LongboxError> {
        let Some(before) = crate::models::installment::get_installment(&self.db, id).await? else {
            return Ok(None);
        };

        let number_changed = match &data.number {
            Some(new_number) => *new_number != before.number,
            None => false,
        };

        let Some(after) =
            crate::models::installment::update_installment(&self.db, id, data).await?
        else {
            return Ok(None);
        };

        ordering::resequence_after_save(&self.db, &after, SaveChange::updated(number_changed))
            .await?;
        crate::models::installment::get_installment(&self.db, id).await
    }

    async fn delete_installment(&self, id: &str) -> Result<Option<Installment>, LongboxError> {
        // ordinals of the survivors are left as-is; gaps are permitted
        crate::models::installment::delete_installment(&self.db, id).await
    }

    async fn suggest_next_number(
        &self,
        series: &RecordId,
    ) -> Result<Option<IssueNumber>, LongboxError> {
        ordering::suggest_next_number(&self.db, series).await
    }

    async fn list_pages(&self, installment: &RecordId) -> Result<Vec<Page>, LongboxError> {
        crate::models::page::list_pages(&self.db, installment).await
    }

    async fn replace_pages(
        &self,
        installment: &RecordId,
        plan: &IngestPlan,
    ) -> Result<Vec<Page>, LongboxError> {
        ingest::replace_installment_pages(&self.db, installment, plan).await
    }

    async fn ingest_strip(
        &self,
        series: &Series,
        names: &[String],
    ) -> Result<Vec<Installment>, LongboxError> {
        ingest::ingest_strip(&self.db, series, names).await
    }

    async fn create_thread(&self, data: ThreadCreate) -> Result<Thread, LongboxError> {
        crate::models::thread::create_thread(&self.db, data).await
    }

    async fn get_thread(&self, slug: &str) -> Result<Option<Thread>, LongboxError> {
        crate::models::thread::get_thread(&self.db, slug).await
    }

    async fn list_threads(&self) -> Result<Vec<Thread>, LongboxError> {
        crate::models::thread::list_threads(&self.db).await
    }

    async fn add_thread_sequence(
        &self,
        data: ThreadSequenceCreate,
    ) -> Result<ThreadSequence, LongboxError> {
        crate::models::thread::add_sequence(&self.db, data).await
    }

    async fn reading_order(&self, thread: &Thread) -> Result<Vec<Installment>, LongboxError> {
        threads::reading_order(&self.db, thread).await
    }
}
