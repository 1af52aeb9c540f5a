//! Tests for the integration context.

pub mod support;

mod bus_tests;
