//! Export core modules shared across CLI and HTTP wrappers.

pub mod excel_core;
