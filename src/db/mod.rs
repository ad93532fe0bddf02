pub mod migrate;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::models::{Client, Expense, Income, Invoice, Project, Timesheet, User};
use crate::reconcile::{InvoiceNumberRef, LegacyIncomeRef};

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, is_admin, last_login, created_at";
const CLIENT_COLUMNS: &str = "id, user_id, name, email, phone, address, contact_person";
const PROJECT_COLUMNS: &str = "id, user_id, client_id, name, description, status, hourly_rate";
const INVOICE_COLUMNS: &str = "id, client_id, project_id, invoice_number, issue_date, due_date, status, notes";
const TIMESHEET_COLUMNS: &str = "id, date, hours, hourly_rate, description, client_id, project_id, invoice_id";
const INCOME_COLUMNS: &str = "id, date, amount, details, invoice, client_id, project_id, invoice_id";
const EXPENSE_COLUMNS: &str = "id, date, title, amount, vendor, category, payment_method, receipt_blob_name, receipt_url";

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    // User operations
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i32> {
        let id = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn get_user(&self, id: i32) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(self.get_pool())
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(user)
    }

    pub async fn record_login(&self, user_id: i32) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
            .bind(user_id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Client operations
    pub async fn list_clients(&self, user_id: i32) -> Result<Vec<Client>> {
        let sql = format!(
            "SELECT {} FROM clients WHERE user_id = $1 ORDER BY name ASC",
            CLIENT_COLUMNS
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(user_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(clients)
    }

    pub async fn get_client(&self, id: i32) -> Result<Client> {
        let sql = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_one(self.get_pool())
            .await?;

        Ok(client)
    }

    pub async fn create_client(&self, user_id: i32, client: &Client) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO clients (user_id, name, email, phone, address, contact_person)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.contact_person)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = $1, email = $2, phone = $3, address = $4, contact_person = $5
            WHERE id = $6
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.contact_person)
        .bind(client.id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    /// Delete a client and its projects.
    ///
    /// Fails through the foreign keys while invoices or timesheets still
    /// reference the client; income rows lose their client link.
    pub async fn delete_client(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM projects WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // Project operations
    pub async fn list_projects_by_client(&self, client_id: i32) -> Result<Vec<Project>> {
        let sql = format!(
            "SELECT {} FROM projects WHERE client_id = $1 ORDER BY name ASC",
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(client_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(projects)
    }

    pub async fn get_project(&self, id: i32) -> Result<Project> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_one(self.get_pool())
            .await?;

        Ok(project)
    }

    pub async fn create_project(&self, project: &Project) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO projects (user_id, client_id, name, description, status, hourly_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(project.user_id)
        .bind(project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(project.hourly_rate)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE projects
            SET name = $1, description = $2, status = $3, hourly_rate = $4
            WHERE id = $5
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(project.hourly_rate)
        .bind(project.id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    pub async fn delete_project(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Invoice operations
    pub async fn list_invoices_by_client(&self, client_id: i32) -> Result<Vec<Invoice>> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE client_id = $1 ORDER BY issue_date DESC, id DESC",
            INVOICE_COLUMNS
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(client_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: i32) -> Result<Invoice> {
        let sql = format!("SELECT {} FROM invoices WHERE id = $1", INVOICE_COLUMNS);
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_one(self.get_pool())
            .await?;

        Ok(invoice)
    }

    /// Lowest-id invoice carrying `number`, matching the backfill's choice.
    pub async fn get_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE invoice_number = $1 ORDER BY id ASC LIMIT 1",
            INVOICE_COLUMNS
        );
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(number)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(invoice)
    }

    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (client_id, project_id, invoice_number, issue_date, due_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(invoice.client_id)
        .bind(invoice.project_id)
        .bind(&invoice.invoice_number)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.status)
        .bind(&invoice.notes)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_invoice_status(&self, id: i32, status: &str) -> Result<()> {
        sqlx::query("UPDATE invoices SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    /// Delete an invoice, releasing its timesheet entries for re-billing.
    pub async fn delete_invoice(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE timesheets SET invoice_id = NULL WHERE invoice_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Sum of the invoice's timesheet lines.
    pub async fn invoice_total(&self, invoice_id: i32) -> Result<Decimal> {
        let sql = format!(
            "SELECT {} FROM timesheets WHERE invoice_id = $1 ORDER BY date ASC, id ASC",
            TIMESHEET_COLUMNS
        );
        let entries = sqlx::query_as::<_, Timesheet>(&sql)
            .bind(invoice_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(entries.iter().map(Timesheet::amount).sum())
    }

    // Timesheet operations
    pub async fn list_timesheets_by_project(&self, project_id: i32) -> Result<Vec<Timesheet>> {
        let sql = format!(
            "SELECT {} FROM timesheets WHERE project_id = $1 ORDER BY date DESC, id DESC",
            TIMESHEET_COLUMNS
        );
        let entries = sqlx::query_as::<_, Timesheet>(&sql)
            .bind(project_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(entries)
    }

    pub async fn unbilled_timesheets(&self, client_id: i32) -> Result<Vec<Timesheet>> {
        let sql = format!(
            "SELECT {} FROM timesheets WHERE client_id = $1 AND invoice_id IS NULL ORDER BY date ASC, id ASC",
            TIMESHEET_COLUMNS
        );
        let entries = sqlx::query_as::<_, Timesheet>(&sql)
            .bind(client_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(entries)
    }

    pub async fn create_timesheet(&self, entry: &Timesheet) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO timesheets (date, hours, hourly_rate, description, client_id, project_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(entry.date)
        .bind(entry.hours)
        .bind(entry.hourly_rate)
        .bind(&entry.description)
        .bind(entry.client_id)
        .bind(entry.project_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    /// Attach unbilled entries to an invoice. Already billed entries are skipped.
    pub async fn bill_timesheets(&self, invoice_id: i32, timesheet_ids: &[i32]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut billed = 0;

        for id in timesheet_ids {
            billed += sqlx::query(
                "UPDATE timesheets SET invoice_id = $1 WHERE id = $2 AND invoice_id IS NULL",
            )
            .bind(invoice_id)
            .bind(*id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        Ok(billed)
    }

    // Income operations
    pub async fn list_income(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Income>> {
        let sql = format!(
            "SELECT {} FROM income WHERE date BETWEEN $1 AND $2 ORDER BY date DESC, id DESC",
            INCOME_COLUMNS
        );
        let income = sqlx::query_as::<_, Income>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(self.get_pool())
            .await?;

        Ok(income)
    }

    pub async fn create_income(&self, income: &Income) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO income (date, amount, details, invoice, client_id, project_id, invoice_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(income.date)
        .bind(income.amount)
        .bind(&income.details)
        .bind(&income.invoice)
        .bind(income.client_id)
        .bind(income.project_id)
        .bind(income.invoice_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn link_income(
        &self,
        id: i32,
        client_id: Option<i32>,
        project_id: Option<i32>,
        invoice_id: Option<i32>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE income SET client_id = $1, project_id = $2, invoice_id = $3 WHERE id = $4",
        )
        .bind(client_id)
        .bind(project_id)
        .bind(invoice_id)
        .bind(id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    pub async fn delete_income(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM income WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Expense operations
    pub async fn list_expenses(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE date BETWEEN $1 AND $2 ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        );
        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(self.get_pool())
            .await?;

        Ok(expenses)
    }

    pub async fn create_expense(&self, expense: &Expense) -> Result<i32> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO expenses (date, title, amount, vendor, category, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(expense.date)
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(&expense.vendor)
        .bind(&expense.category)
        .bind(&expense.payment_method)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn attach_receipt(&self, id: i32, blob_name: &str, url: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE expenses SET receipt_blob_name = $1, receipt_url = $2 WHERE id = $3")
            .bind(blob_name)
            .bind(url)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    pub async fn delete_expense(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Reconciliation inputs
    pub async fn legacy_invoice_refs(&self) -> Result<Vec<LegacyIncomeRef>> {
        let refs = sqlx::query_as::<_, LegacyIncomeRef>(LEGACY_REFS_SQL)
            .fetch_all(self.get_pool())
            .await?;

        Ok(refs)
    }

    pub async fn invoice_numbers(&self) -> Result<Vec<InvoiceNumberRef>> {
        let numbers = sqlx::query_as::<_, InvoiceNumberRef>(INVOICE_NUMBERS_SQL)
            .fetch_all(self.get_pool())
            .await?;

        Ok(numbers)
    }
}

pub(crate) const LEGACY_REFS_SQL: &str = "SELECT id, invoice, invoice_id FROM income WHERE invoice IS NOT NULL AND invoice <> '' ORDER BY id ASC";
pub(crate) const INVOICE_NUMBERS_SQL: &str = "SELECT id, invoice_number FROM invoices ORDER BY id ASC";

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    Database::new(config).await
}
