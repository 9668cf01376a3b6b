// src/core/mod.rs — Chain engine

pub mod orchestrator;
pub mod retry;
pub mod types;
pub mod workspace;
