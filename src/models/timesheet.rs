use rust_decimal::Decimal;

use super::invoice::line_total;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Timesheet {
    pub id: i32,
    pub date: chrono::NaiveDate,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub client_id: i32,
    pub project_id: i32,
    pub invoice_id: Option<i32>,
}

impl Timesheet {
    pub fn amount(&self) -> Decimal {
        line_total(self.hours, self.hourly_rate)
    }

    pub fn is_billed(&self) -> bool {
        self.invoice_id.is_some()
    }
}
