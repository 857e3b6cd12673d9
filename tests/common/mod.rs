//! Helpers shared by the integration tests: a fake hub and its contents.

// Each test binary uses a different subset
#![allow(dead_code)]
#![allow(unused_imports)]

mod fake_hub;
mod fixtures;

pub use fake_hub::*;
pub use fixtures::*;
