//! Job configuration loading and resolution.
//!
//! `load_raw_config` reads the YAML document; `ConfigResolver` validates it
//! and derives every path the scaffolder needs, without touching the disk
//! beyond read-only probes.

mod load_raw_config;
mod resolver;

pub use load_raw_config::{CONFIG_EXTENSION, load_raw_config, parse_raw_config};
pub use resolver::ConfigResolver;
