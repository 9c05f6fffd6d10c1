#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sieve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod business_model;
pub mod config;
pub mod error;
pub mod screen;
pub mod universe;

// Re-export main types from sub-crates
pub use sieve_data as data;
pub use sieve_output as output;
pub use sieve_scoring as scoring;

pub use business_model::{
    BusinessModel, SemiconductorSubsector, apply_modifier, semiconductor_base_weights, subsector_for,
};
pub use config::{load_weight_spec, parse_weight_spec};
pub use error::{ConfigError, ScreenError};
pub use screen::{screen, screen_business_model, screen_semiconductors};
pub use universe::{BusinessModelUniverse, Universe};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
