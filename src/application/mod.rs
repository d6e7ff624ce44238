//! Application layer - use cases orchestrating the pipeline

pub mod errors;
pub mod generate_clients;

pub use errors::ApplicationError;
pub use generate_clients::{GenerateClientsUseCase, GenerateReport};
