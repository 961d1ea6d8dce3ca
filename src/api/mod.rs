pub mod admin;
pub mod dashboard;
pub mod demo;
pub mod session;
