//! Card lifecycle, scheduling, and board aggregation.
//!
//! This context implements the state machine governing column transitions,
//! blocking, and progress, the decoupled scheduling-date writer, and the
//! batched board aggregation engine. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
