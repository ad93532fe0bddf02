mod user;
mod client;
mod project;
pub mod invoice;
mod timesheet;
mod income;
mod expense;

pub use user::User;
pub use client::Client;
pub use project::{Project, ProjectStatus};
pub use invoice::Invoice;
pub use timesheet::Timesheet;
pub use income::{Income, IncomeLink};
pub use expense::{Expense, Receipt};
