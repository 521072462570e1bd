//! Installation modules for required tools

pub mod kueuectl;
