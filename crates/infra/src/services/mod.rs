pub mod notification;
pub mod resilience;
