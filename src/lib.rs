//! Imperial Portfolio - backend for a Star Wars themed developer portfolio
//!
//! # Architecture
//! - `api`: HTTP services, JWT sessions and middleware
//! - `services`: admin authentication and analytics
//! - `storage`: key-value backends, CMS content store, shop simulation
//! - `config`: configuration loading (TOML + environment)
//! - `interfaces`: command-line maintenance commands
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
