// src/lib.rs — Library root for collapser

pub mod cli;
pub mod core;
pub mod correction;
pub mod infra;
pub mod provider;
