pub(crate) mod instruments_constants;
pub(crate) mod instruments_errors;
pub(crate) mod instruments_model;
pub(crate) mod instruments_repository;
pub(crate) mod instruments_service;
pub(crate) mod instruments_traits;


// Re-export the public interface
pub use instruments_constants::*;
pub use instruments_model::{Instrument, InstrumentType, InstrumentUpdate, NewInstrument};
pub use instruments_repository::InstrumentRepository;
pub use instruments_service::InstrumentService;
pub use instruments_traits::InstrumentServiceTrait;

// Re-export error types for convenience
pub use instruments_errors::{InstrumentError, Result};
