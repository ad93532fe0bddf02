use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the tax decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    #[error("invalid amount {0}: a tax-inclusive amount cannot be negative")]
    InvalidAmount(Decimal),
    #[error("invalid tax rate {0}: a tax rate cannot be negative")]
    InvalidRate(Decimal),
    #[error("amount is too large to decompose")]
    Overflow,
    #[error("'{0}' is not a decimal tax rate")]
    Unparseable(String),
}

/// Values read back from text columns that do not fit their domain type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown project status '{0}'")]
    UnknownProjectStatus(String),
}

/// Problems found while assembling or walking the revision chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("revision chain is empty")]
    Empty,
    #[error("revision {0} is declared more than once")]
    DuplicateRevision(String),
    #[error("revision {revision} names unknown parent {parent}")]
    MissingParent { revision: String, parent: String },
    #[error("revision chain has more than one root: {0:?}")]
    MultipleRoots(Vec<String>),
    #[error("revision {parent} has more than one child: {children:?}")]
    Branch { parent: String, children: Vec<String> },
    #[error("revision {0} is not reachable from the root")]
    Unreachable(String),
    #[error("revision {0} has no downgrade")]
    MissingDowngrade(String),
    #[error("unknown revision {0}")]
    UnknownRevision(String),
    #[error("cannot downgrade from {from} to {target}: target is not an ancestor")]
    NotAnAncestor { from: String, target: String },
}
