// Domain Layer - Pure business logic and entities

pub mod error;
pub mod failure;
pub mod item;

// Re-exports
pub use error::DomainError;
pub use failure::{DeliveryOutcome, FailureRecord};
pub use item::QueueItem;
