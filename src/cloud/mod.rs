//! Cloud provider CLI wrappers

pub mod gcloud;
