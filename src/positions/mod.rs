pub(crate) mod positions_calculator;
pub(crate) mod positions_errors;
pub(crate) mod positions_model;
pub(crate) mod positions_repository;
pub(crate) mod positions_service;
pub(crate) mod positions_traits;



// Re-export the public interface
pub use positions_calculator::calculate_position;
pub use positions_model::{
    PortfolioSummary, Position, PositionDetails, PositionKey, TypeAllocation,
};
pub use positions_repository::PositionRepository;
pub use positions_service::PositionService;
pub use positions_traits::PositionServiceTrait;

// Re-export error types for convenience
pub use positions_errors::{PositionError, Result};
