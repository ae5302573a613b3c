//! Headless preview tool for `backdrop_core`.

pub mod commands;
pub mod config;
pub mod logger;
