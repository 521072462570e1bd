//! xpk - cluster management CLI
//!
//! The `info` command lists Kueue ClusterQueues and LocalQueues through the
//! `kubectl kueue` plugin and reports their per-flavor reservation and usage.

pub mod cloud;
pub mod commands;
pub mod config;
pub mod install;
pub mod k8s;
pub mod queues;
pub mod utils;
