//! Test utilities for the blockpulse codebase
//!
//! This module provides a scriptable chain data source and builders for raw
//! block data, shared by unit and integration tests.

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
