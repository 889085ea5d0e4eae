pub mod db;

pub mod instruments;
pub mod ledger;
pub mod positions;

pub mod constants;
pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
