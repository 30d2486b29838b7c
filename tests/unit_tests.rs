//! Unit-level tests for the public surface.

mod unit;
