//! `Database` operations against a scratch PostgreSQL database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`. Each test
//! migrates to head first and leaves the database at base.

use akowe::db::Database;
use akowe::db::migrate::Migrator;
use akowe::models::{Client, Income, Invoice, Project, Timesheet};
use akowe::schema::RevisionChain;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::Mutex;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn fresh_database() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a scratch database");
    let pool = PgPool::connect(&url).await.unwrap();
    let migrator = Migrator::new(&pool, RevisionChain::akowe().unwrap());
    migrator.downgrade(None).await.unwrap();
    migrator.upgrade(None).await.unwrap();
    Database::from_pool(pool)
}

async fn reset(db: &Database) {
    let migrator = Migrator::new(db.get_pool(), RevisionChain::akowe().unwrap());
    migrator.downgrade(None).await.unwrap();
    sqlx::query("DROP TABLE akowe_version")
        .execute(db.get_pool())
        .await
        .unwrap();
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

struct Fixture {
    user_id: i32,
    client_id: i32,
    project_id: i32,
}

async fn client_with_project(db: &Database, name: &str) -> Fixture {
    let user_id = db
        .create_user(name, &format!("{}@example.com", name), "hash")
        .await
        .unwrap();
    let client = Client {
        id: 0,
        user_id,
        name: format!("{} Ltd", name),
        email: None,
        phone: None,
        address: None,
        contact_person: None,
    };
    let client_id = db.create_client(user_id, &client).await.unwrap();
    let project = Project {
        id: 0,
        user_id,
        client_id,
        name: "Website".to_string(),
        description: None,
        status: "active".to_string(),
        hourly_rate: Some(Decimal::new(8000, 2)),
    };
    let project_id = db.create_project(&project).await.unwrap();
    Fixture {
        user_id,
        client_id,
        project_id,
    }
}

async fn invoice(db: &Database, client_id: i32, number: &str) -> i32 {
    let invoice = Invoice {
        id: 0,
        client_id,
        project_id: None,
        invoice_number: number.to_string(),
        issue_date: day(),
        due_date: None,
        status: "draft".to_string(),
        notes: None,
    };
    db.create_invoice(&invoice).await.unwrap()
}

async fn timesheet(db: &Database, fixture: &Fixture, hours: Decimal, rate: Decimal) -> i32 {
    let entry = Timesheet {
        id: 0,
        date: day(),
        hours,
        hourly_rate: rate,
        description: None,
        client_id: fixture.client_id,
        project_id: fixture.project_id,
        invoice_id: None,
    };
    db.create_timesheet(&entry).await.unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn billing_skips_entries_already_on_an_invoice() {
    let _guard = DB_LOCK.lock().await;
    let db = fresh_database().await;
    let fixture = client_with_project(&db, "ada").await;

    let first = timesheet(&db, &fixture, Decimal::new(250, 2), Decimal::new(8000, 2)).await;
    let second = timesheet(&db, &fixture, Decimal::new(125, 2), Decimal::new(1002, 2)).await;
    let third = timesheet(&db, &fixture, Decimal::ONE, Decimal::new(10000, 2)).await;
    let march = invoice(&db, fixture.client_id, "INV-100").await;
    let april = invoice(&db, fixture.client_id, "INV-101").await;

    assert_eq!(db.bill_timesheets(march, &[first, second]).await.unwrap(), 2);
    assert_eq!(db.bill_timesheets(april, &[second, third]).await.unwrap(), 1);
    assert_eq!(db.bill_timesheets(march, &[first]).await.unwrap(), 0);
    assert!(db.unbilled_timesheets(fixture.client_id).await.unwrap().is_empty());

    // 200.00 + 12.53 (12.525 rounded half-up)
    assert_eq!(db.invoice_total(march).await.unwrap(), Decimal::new(21253, 2));
    assert_eq!(db.invoice_total(april).await.unwrap(), Decimal::new(10000, 2));

    db.delete_invoice(april).await.unwrap();
    let released: Vec<i32> = db
        .unbilled_timesheets(fixture.client_id)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(released, vec![third]);
    assert_eq!(db.invoice_total(april).await.unwrap(), Decimal::ZERO);

    reset(&db).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn client_with_invoices_cannot_be_deleted() {
    let _guard = DB_LOCK.lock().await;
    let db = fresh_database().await;
    let fixture = client_with_project(&db, "grace").await;
    let invoice_id = invoice(&db, fixture.client_id, "INV-200").await;
    let income = Income {
        id: 0,
        date: day(),
        amount: Decimal::new(11300, 2),
        details: None,
        invoice: None,
        client_id: Some(fixture.client_id),
        project_id: Some(fixture.project_id),
        invoice_id: None,
    };
    let income_id = db.create_income(&income).await.unwrap();

    assert!(db.delete_client(fixture.client_id).await.is_err());
    // the failed delete rolled back, projects included
    assert_eq!(db.get_client(fixture.client_id).await.unwrap().user_id, fixture.user_id);
    assert_eq!(
        db.list_projects_by_client(fixture.client_id).await.unwrap().len(),
        1
    );

    db.delete_invoice(invoice_id).await.unwrap();
    db.delete_client(fixture.client_id).await.unwrap();

    assert!(db.get_client(fixture.client_id).await.is_err());
    let rows = db.list_income(day(), day()).await.unwrap();
    let row = rows.iter().find(|i| i.id == income_id).unwrap();
    assert_eq!(row.client_id, None);
    assert_eq!(row.project_id, None);

    reset(&db).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn invoice_lookup_by_number_prefers_lowest_id() {
    let _guard = DB_LOCK.lock().await;
    let db = fresh_database().await;
    let fixture = client_with_project(&db, "linus").await;

    let older = invoice(&db, fixture.client_id, "INV-300").await;
    invoice(&db, fixture.client_id, "INV-300").await;

    let found = db.get_invoice_by_number("INV-300").await.unwrap().unwrap();
    assert_eq!(found.id, older);
    assert!(db.get_invoice_by_number("INV-999").await.unwrap().is_none());

    reset(&db).await;
}
