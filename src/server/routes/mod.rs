//! HTTP route modules

pub mod ai;
