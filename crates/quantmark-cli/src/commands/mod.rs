//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod inspect;
pub mod molecules;
pub mod run;
pub mod version;
