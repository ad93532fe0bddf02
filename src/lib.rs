//! Akowe bookkeeping: clients, projects, timesheets, invoices, income and
//! expenses, with GST/HST reporting over tax-inclusive income.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod tax;
pub mod ui;

pub use error::{ModelError, SchemaError, TaxError};
pub use tax::{Decomposition, TaxRate, decompose, embedded_tax};
