pub mod config;
pub mod domain;
pub mod inbound;
pub mod observability;
pub mod outbound;

pub use domain::user;
pub use outbound::repositories;
