//! Command implementations for xpk CLI

pub mod info;
