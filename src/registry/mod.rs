//! Style registration system
//!
//! The page renderer keeps a registry of known stylesheets (handle to
//! source, dependencies and version) and a queue of handles that will be
//! emitted. [`StyleRegistry`] is the seam the render pass works through;
//! [`StyleQueue`] is the in-memory implementation used by the CLI.

pub mod queue;

pub use queue::StyleQueue;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stylesheet as known to the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisteredStyle {
    /// Source URL or path, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Handles this stylesheet depends on
    pub deps: Vec<String>,

    /// Version appended to the URL for cache busting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
}

/// A request to register and queue a stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRegistration {
    pub handle: String,
    pub src: String,
    pub deps: Vec<String>,
    pub ver: Option<String>,
}

/// Operations the render pass needs from the surrounding registry
pub trait StyleRegistry {
    /// Whether a stylesheet is registered under `handle`
    fn is_registered(&self, handle: &str) -> bool;

    /// Remove `handle` from the output queue; no-op if not queued
    fn dequeue(&mut self, handle: &str);

    /// Forget `handle` entirely; no-op if not registered
    fn deregister(&mut self, handle: &str);

    /// Register a stylesheet and add it to the output queue
    fn enqueue(&mut self, style: StyleRegistration);

    /// Everything currently registered, keyed by handle
    fn registered(&self) -> BTreeMap<String, RegisteredStyle>;
}
