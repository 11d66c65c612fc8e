//! layered-styles - re-emit plugin stylesheets inside a CSS cascade layer
//!
//! Configured stylesheets are removed from the page's style registry and
//! replaced by cached copies wrapped in `@layer <name> { ... }`, letting
//! theme CSS override plugin CSS without specificity fights.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod snapshot;
pub mod ui;

pub use error::{LayeredError, LayeredResult};
