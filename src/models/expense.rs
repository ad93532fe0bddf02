use rust_decimal::Decimal;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Expense {
    pub id: i32,
    pub date: chrono::NaiveDate,
    pub title: String,
    pub amount: Decimal,
    pub vendor: Option<String>,
    pub category: String,
    pub payment_method: Option<String>,
    pub receipt_blob_name: Option<String>,
    pub receipt_url: Option<String>,
}

/// A stored receipt: the storage key and, once known, where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<'a> {
    pub blob_name: &'a str,
    pub url: Option<&'a str>,
}

impl Expense {
    pub fn receipt(&self) -> Option<Receipt<'_>> {
        self.receipt_blob_name.as_deref().map(|blob_name| Receipt {
            blob_name,
            url: self.receipt_url.as_deref(),
        })
    }
}
