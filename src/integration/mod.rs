//! Cross-system synchronization for scheduled cards.
//!
//! This context keeps the external calendar store and task-list provider
//! informed of scheduling changes without letting their failures corrupt or
//! block local state. It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The in-process event bus in [`bus`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! External synchronization always happens strictly after the local write
//! has committed; the only recovery path for missed syncs is the startup
//! reconciliation pass.

pub mod adapters;
pub mod bus;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
