//! Tests for the board context.

pub mod support;
