// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of transport concerns

pub mod inventory;
pub mod messaging;
pub mod repositories;
pub mod user;
