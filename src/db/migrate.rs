//! Applies the revision chain to a PostgreSQL database.
//!
//! The applied head is stored in `akowe_version`. Every revision runs in its
//! own transaction, so a failing statement leaves the database at the
//! previous revision.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::reconcile::{InvoiceLink, InvoiceNumberRef, LegacyIncomeRef, link_income_to_invoices};
use crate::schema::{Revision, RevisionChain, Step};

use super::{INVOICE_NUMBERS_SQL, LEGACY_REFS_SQL};

/// Where a database stands relative to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub current: Option<String>,
    pub head: &'static str,
    pub pending: Vec<&'static str>,
}

pub struct Migrator<'a> {
    pool: &'a PgPool,
    chain: RevisionChain,
}

impl<'a> Migrator<'a> {
    pub fn new(pool: &'a PgPool, chain: RevisionChain) -> Self {
        Self { pool, chain }
    }

    pub fn chain(&self) -> &RevisionChain {
        &self.chain
    }

    async fn ensure_version_table(&self) -> Result<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS akowe_version (version_num VARCHAR(32) PRIMARY KEY)")
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// The revision the database is at, `None` for an empty schema.
    pub async fn current(&self) -> Result<Option<String>> {
        self.ensure_version_table().await?;
        let current = sqlx::query_scalar("SELECT version_num FROM akowe_version")
            .fetch_optional(self.pool)
            .await?;

        Ok(current)
    }

    pub async fn status(&self) -> Result<MigrationStatus> {
        let current = self.current().await?;
        let pending = self
            .chain
            .pending(current.as_deref(), None)?
            .iter()
            .map(|r| r.id)
            .collect();

        Ok(MigrationStatus {
            current,
            head: self.chain.head().id,
            pending,
        })
    }

    /// Apply revisions up to `target`, or to head when `None`.
    pub async fn upgrade(&self, target: Option<&str>) -> Result<Vec<&'static str>> {
        let current = self.current().await?;
        let pending = self.chain.pending(current.as_deref(), target)?;

        let mut applied = Vec::with_capacity(pending.len());
        for revision in pending {
            info!(revision = revision.id, summary = revision.summary, "upgrading");
            let mut tx = self.pool.begin().await?;
            run_steps(&mut tx, revision, revision.upgrade).await?;
            set_version(&mut tx, Some(revision.id)).await?;
            tx.commit().await?;
            applied.push(revision.id);
        }

        if applied.is_empty() {
            info!(current = ?current, "database already up to date");
        }

        Ok(applied)
    }

    /// Undo revisions down to `target`, which stays applied. `None` undoes
    /// every revision.
    pub async fn downgrade(&self, target: Option<&str>) -> Result<Vec<&'static str>> {
        let current = self.current().await?;
        let undo = self.chain.rollback(current.as_deref(), target)?;

        let mut reverted = Vec::with_capacity(undo.len());
        for revision in undo {
            info!(revision = revision.id, summary = revision.summary, "downgrading");
            let mut tx = self.pool.begin().await?;
            run_steps(&mut tx, revision, revision.downgrade).await?;
            set_version(&mut tx, revision.parent).await?;
            tx.commit().await?;
            reverted.push(revision.id);
        }

        Ok(reverted)
    }
}

async fn run_steps(
    tx: &mut Transaction<'_, Postgres>,
    revision: &Revision,
    steps: &[Step],
) -> Result<()> {
    for step in steps {
        match step {
            Step::Sql(sql) => {
                sqlx::query(sql)
                    .execute(&mut **tx)
                    .await
                    .with_context(|| format!("revision {}: {}", revision.id, sql.trim()))?;
            }
            Step::LinkIncomeInvoices => {
                let links = backfill_income_invoices(tx)
                    .await
                    .with_context(|| format!("revision {}: linking income to invoices", revision.id))?;
                info!(revision = revision.id, linked = links.len(), "linked legacy income to invoices");
            }
        }
    }

    Ok(())
}

async fn set_version(tx: &mut Transaction<'_, Postgres>, version: Option<&str>) -> Result<()> {
    sqlx::query("DELETE FROM akowe_version")
        .execute(&mut **tx)
        .await?;

    if let Some(version) = version {
        sqlx::query("INSERT INTO akowe_version (version_num) VALUES ($1)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn backfill_income_invoices(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<InvoiceLink>> {
    let incomes = sqlx::query_as::<_, LegacyIncomeRef>(LEGACY_REFS_SQL)
        .fetch_all(&mut **tx)
        .await?;
    let invoices = sqlx::query_as::<_, InvoiceNumberRef>(INVOICE_NUMBERS_SQL)
        .fetch_all(&mut **tx)
        .await?;

    let links = link_income_to_invoices(&incomes, &invoices);
    for link in &links {
        sqlx::query("UPDATE income SET invoice_id = $1 WHERE id = $2 AND invoice_id IS NULL")
            .bind(link.invoice_id)
            .bind(link.income_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(links)
}
