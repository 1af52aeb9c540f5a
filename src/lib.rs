//! Trestle: a work-board engine with failure-isolated external sync.
//!
//! This crate tracks work items (cards) moving through workflow columns on
//! boards and keeps two independent external systems (a calendar store and
//! a task-list provider) informed of scheduling changes, without letting
//! failures in those systems corrupt or block local state.
//!
//! # Architecture
//!
//! Trestle follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory doubles for
//!   tests and embedding; persistence proper lives with the host)
//!
//! The central invariant of the design: every mutating operation commits in
//! exactly one local repository call, and all external synchronization
//! happens strictly after that commit, observable only through sync-status
//! records and logs.
//!
//! # Modules
//!
//! - [`board`]: Card lifecycle, scheduling dates, and board aggregation
//! - [`integration`]: Domain events, the in-process bus, sync tracking, and
//!   startup reconciliation

pub mod board;
pub mod integration;
