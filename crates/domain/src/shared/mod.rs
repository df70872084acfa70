pub mod entity;
pub mod parse;
pub mod recurrence;
