//! Dentist profiles: repository trait with PostgreSQL and in-memory backends.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::dentists::{Dentist, DentistUpdate};

/// Dentist repository errors.
#[derive(Debug, Error)]
pub enum DentistError {
    #[error("Dentist {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait DentistRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<Dentist, DentistError>;

    /// All dentists, ordered by display priority.
    async fn list(&self) -> Result<Vec<Dentist>, DentistError>;

    async fn update(&self, id: i64, update: DentistUpdate) -> Result<(), DentistError>;
}

type DentistRow = (i64, String, String, i16, String, String, String);

fn dentist_from_row(row: DentistRow) -> Dentist {
    let (id, clone_name, url, priority, side, name, info) = row;
    Dentist {
        id,
        clone_name,
        url,
        priority,
        side,
        name,
        info,
    }
}

/// Dentists in the `dentists` table.
#[derive(Debug, Clone)]
pub struct PgDentistRepository {
    pool: PgPool,
}

impl PgDentistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DentistRepository for PgDentistRepository {
    async fn get(&self, id: i64) -> Result<Dentist, DentistError> {
        let row = sqlx::query_as::<_, DentistRow>(
            "SELECT id, clone_name, url, priority, side, name, info FROM dentists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(dentist_from_row).ok_or(DentistError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Dentist>, DentistError> {
        let rows = sqlx::query_as::<_, DentistRow>(
            "SELECT id, clone_name, url, priority, side, name, info FROM dentists \
             ORDER BY priority, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(dentist_from_row).collect())
    }

    async fn update(&self, id: i64, update: DentistUpdate) -> Result<(), DentistError> {
        let result = sqlx::query("UPDATE dentists SET name = $2, info = $3, url = $4 WHERE id = $1")
            .bind(id)
            .bind(&update.name)
            .bind(&update.info)
            .bind(&update.url)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DentistError::NotFound(id));
        }
        Ok(())
    }
}

/// Dentists kept in memory, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryDentistRepository {
    dentists: RwLock<BTreeMap<i64, Dentist>>,
}

impl MemoryDentistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-populated with `dentists`.
    pub fn with_dentists(dentists: impl IntoIterator<Item = Dentist>) -> Self {
        Self {
            dentists: RwLock::new(dentists.into_iter().map(|d| (d.id, d)).collect()),
        }
    }
}

#[async_trait]
impl DentistRepository for MemoryDentistRepository {
    async fn get(&self, id: i64) -> Result<Dentist, DentistError> {
        self.dentists
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DentistError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Dentist>, DentistError> {
        let mut out: Vec<Dentist> = self.dentists.read().await.values().cloned().collect();
        out.sort_by_key(|d| (d.priority, d.id));
        Ok(out)
    }

    async fn update(&self, id: i64, update: DentistUpdate) -> Result<(), DentistError> {
        let mut dentists = self.dentists.write().await;
        let dentist = dentists.get_mut(&id).ok_or(DentistError::NotFound(id))?;
        dentist.name = update.name;
        dentist.info = update.info;
        dentist.url = update.url;
        Ok(())
    }
}
