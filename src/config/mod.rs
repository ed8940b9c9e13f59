//! Configuration module for Dataprobe
//!
//! Only user-level settings live here: AI backend selection and keys, and
//! where saved profiles are kept. Scoring weights and issue thresholds are
//! fixed constants and cannot be configured.

mod user_config;

pub use user_config::{AiSection, StorageSection, UserConfig};
