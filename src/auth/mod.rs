pub mod client;
pub mod demo;
pub mod error;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token_store;
