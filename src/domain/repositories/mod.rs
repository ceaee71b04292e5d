// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod user_repository;

pub use user_repository::{ProfileUpdate, RepositoryError, RepositoryResult, UserRepository};
