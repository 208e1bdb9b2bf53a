//! Shared infrastructure for the `trial-universe` binary.

pub mod logging;
