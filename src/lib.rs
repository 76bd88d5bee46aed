//! Core library functions for the sociogram analyzer

pub mod analysis;
pub mod community;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod profile;
pub mod storage;

pub use anyhow::{anyhow, Result};
pub use error::AnalysisError;
