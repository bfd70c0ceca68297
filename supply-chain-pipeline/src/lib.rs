//! # Supply Chain Pipeline
//!
//! This crate provides the batch stages that move the `supply_chain` table
//! from PostgreSQL into the search index.
//!
//! ## Architecture
//!
//! The pipeline follows the Extractor-Cleaner-Loader pattern, with each
//! stage handing off to the next through a CSV snapshot on disk:
//!
//! 1. **Extractor**: Copies the full source table into the raw snapshot
//! 2. **Cleaner**: Normalizes column names and fills known nullable fields
//! 3. **Loader**: Submits each cleaned row to the search index
//! 4. **Orchestrator**: Runs the stages in order with a blanket retry count
//!
//! Every stage is an independently invocable [`orchestrator::Stage`], so an
//! external scheduler can drive them one task at a time.

pub mod cleaner;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod loader;
pub mod orchestrator;
pub mod schedule;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PipelineConfig;
pub use errors::PipelineError;
