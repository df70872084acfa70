pub mod auth;
pub mod quota;
pub mod usecase;
