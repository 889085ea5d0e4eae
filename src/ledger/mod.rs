pub(crate) mod ledger_constants;
pub(crate) mod ledger_errors;
pub(crate) mod ledger_model;
pub(crate) mod ledger_repository;
pub(crate) mod ledger_service;
pub(crate) mod ledger_traits;

#[cfg(test)]
mod ledger_model_tests;


pub use ledger_constants::*;
pub use ledger_model::{
    NewTransaction, Transaction, TransactionDetails, TransactionKind, TransactionPatch,
};
pub use ledger_repository::LedgerRepository;
pub use ledger_service::{check_reduction, LedgerService};
pub use ledger_traits::LedgerServiceTrait;

pub use ledger_errors::{LedgerError, Result};
