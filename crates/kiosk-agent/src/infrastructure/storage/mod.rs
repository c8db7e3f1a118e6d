//! File-system storage for the lockdown agent.

pub mod config;
