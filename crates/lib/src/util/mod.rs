//! Shared utilities.
//!
//! Path string helpers used by command synthesis and the compile database,
//! plus test helpers.

pub mod path;

#[cfg(test)]
pub mod testutil;
