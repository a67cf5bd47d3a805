//! Domain aggregates exposed by the directory service layer.

pub mod member;
pub mod types;
