use async_trait::async_trait;

use super::ledger_model::{NewTransaction, Transaction, TransactionDetails, TransactionPatch};
use crate::errors::Result;

/// Trait defining the contract for ledger operations. Mutations are async
/// because writers of the same bucket queue on a shared lock.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Records a new transaction and refreshes the derived position of its
    /// bucket in the same database transaction.
    async fn create_transaction(
        &self,
        owner_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<TransactionDetails>;

    /// Rewrites an existing transaction and refreshes the derived position
    /// of its bucket in the same database transaction.
    async fn update_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<TransactionDetails>;

    /// Marks a transaction as deleted and refreshes the derived position of
    /// its bucket in the same database transaction.
    async fn delete_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction>;

    /// Lists the active transactions of an owner, most recent first.
    fn get_transactions(&self, owner_id: &str) -> Result<Vec<TransactionDetails>>;

    /// Retrieves one active transaction of an owner.
    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<TransactionDetails>;
}
