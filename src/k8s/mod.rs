//! Kubernetes operations

pub mod kubectl;
pub mod kueuectl;
