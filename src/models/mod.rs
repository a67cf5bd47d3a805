//! Runtime models shared by the binaries.

pub mod config;
