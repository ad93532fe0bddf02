use rust_decimal::Decimal;

use crate::tax::round_cents;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Invoice {
    pub id: i32,
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub invoice_number: String,
    pub issue_date: chrono::NaiveDate,
    pub due_date: Option<chrono::NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
}

/// Amount billed for `hours` at `hourly_rate`, rounded half-up to cents.
pub fn line_total(hours: Decimal, hourly_rate: Decimal) -> Decimal {
    round_cents(hours * hourly_rate)
}
