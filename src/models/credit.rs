use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::db::connection::LongboxDb;
use crate::LongboxError;

/// A creator: person/group/collective/circle/etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub id: RecordId,
    pub working_name: String,
    pub created_at: Datetime,
}

/// Data for creating a creator.
#[derive(Debug, Serialize)]
pub struct CreatorCreate {
    pub working_name: String,
}

/// A credited role type (writer, penciller, letterer, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    /// Default order to list different role types.
    pub order: i64,
}

/// Data for creating a role.
#[derive(Debug, Serialize)]
pub struct RoleCreate {
    pub name: String,
    pub order: i64,
}

/// A creator credited with a role on an installment.
/// At most one credit per (installment, creator, role).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credit {
    pub id: RecordId,
    pub installment: RecordId,
    pub creator: RecordId,
    pub role: RecordId,
    pub created_at: Datetime,
}

/// Data for adding a credit.
#[derive(Debug, Serialize)]
pub struct CreditCreate {
    pub installment: RecordId,
    pub creator: RecordId,
    pub role: RecordId,
}

/// Create a creator. Outer whitespace is trimmed; inner spacing is kept
/// as a matter of courtesy.
pub async fn create_creator(db: &LongboxDb, data: CreatorCreate) -> Result<Creator, LongboxError> {
    let data = CreatorCreate {
        working_name: data.working_name.trim().to_string(),
    };
    if data.working_name.is_empty() {
        return Err(LongboxError::Validation("Creator name cannot be empty.".into()));
    }
    let result: Option<Creator> = db.create("creator").content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create creator".into()))
}

/// List all creators by working name.
pub async fn list_creators(db: &LongboxDb) -> Result<Vec<Creator>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM creator ORDER BY working_name ASC")
        .await?;
    let creators: Vec<Creator> = result.take(0)?;
    Ok(creators)
}

/// Create a role. The name is normalized to collapsed lowercase.
pub async fn create_role(db: &LongboxDb, data: RoleCreate) -> Result<Role, LongboxError> {
    let data = RoleCreate {
        name: data.name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(),
        ..data
    };
    let result: Option<Role> = db.create("role").content(data).await?;
    result.ok_or_else(|| LongboxError::Database("Failed to create role".into()))
}

/// List roles in display order.
pub async fn list_roles(db: &LongboxDb) -> Result<Vec<Role>, LongboxError> {
    let mut result = db.query("SELECT * FROM role ORDER BY `order` ASC").await?;
    let roles: Vec<Role> = result.take(0)?;
    Ok(roles)
}

/// Credit a creator on an installment. The (installment, creator, role)
/// triple is unique; a duplicate surfaces as a `Conflict`.
pub async fn add_credit(db: &LongboxDb, data: CreditCreate) -> Result<Credit, LongboxError> {
    let result: Result<Option<Credit>, surrealdb::Error> =
        db.create("credit").content(data).await;
    match result {
        Ok(credit) => {
            credit.ok_or_else(|| LongboxError::Database("Failed to create credit".into()))
        }
        Err(e) if e.to_string().contains("already contains") => Err(LongboxError::Conflict(
            "This creator is already credited with that role.".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// List an installment's credits.
pub async fn list_credits(
    db: &LongboxDb,
    installment: &RecordId,
) -> Result<Vec<Credit>, LongboxError> {
    let mut result = db
        .query("SELECT * FROM credit WHERE installment = $installment")
        .bind(("installment", installment.clone()))
        .await?;
    let credits: Vec<Credit> = result.take(0)?;
    Ok(credits)
}

/// Remove a credit by ID.
pub async fn delete_credit(db: &LongboxDb, id: &str) -> Result<Option<Credit>, LongboxError> {
    let result: Option<Credit> = db.delete(("credit", id)).await?;
    Ok(result)
}
