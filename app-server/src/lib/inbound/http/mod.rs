pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
