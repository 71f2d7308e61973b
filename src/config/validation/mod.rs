//! Configuration validation
//!
//! - `ssrf`: host checks for caller-supplied upstream URLs
//! - `trait_def`: the `Validate` trait
//! - `config_validators`: validators for the gateway config sections

mod config_validators;
pub mod ssrf;
mod trait_def;

pub use trait_def::Validate;
