//! Shared harness and fixtures for the tessera integration tests.

pub mod test_util;
