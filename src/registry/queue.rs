//! In-memory style registry loaded from a JSON description

use crate::error::{LayeredError, LayeredResult};
use crate::registry::{RegisteredStyle, StyleRegistration, StyleRegistry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Registered styles plus the ordered list of handles that will be emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleQueue {
    styles: BTreeMap<String, RegisteredStyle>,
    queue: Vec<String>,
}

/// On-disk form of a [`StyleQueue`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QueueFile {
    styles: BTreeMap<String, RegisteredStyle>,
    queue: Option<Vec<String>>,
}

impl StyleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form.
    ///
    /// Without an explicit `queue`, every registered style is queued in
    /// handle order. Queued handles that are not registered are dropped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: QueueFile = serde_json::from_str(json)?;

        let queue = match file.queue {
            Some(queue) => {
                let mut kept: Vec<String> = Vec::with_capacity(queue.len());
                for handle in queue {
                    if !file.styles.contains_key(&handle) {
                        debug!("Ignoring queued handle with no registration: {}", handle);
                        continue;
                    }
                    if !kept.contains(&handle) {
                        kept.push(handle);
                    }
                }
                kept
            }
            None => file.styles.keys().cloned().collect(),
        };

        Ok(Self {
            styles: file.styles,
            queue,
        })
    }

    /// Load the JSON form from a file
    pub fn load(path: &Path) -> LayeredResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| LayeredError::io(format!("reading registry {}", path.display()), e))?;

        Self::from_json(&content).map_err(|e| LayeredError::RegistryInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Handles in emission order
    pub fn queued(&self) -> &[String] {
        &self.queue
    }

    pub fn is_queued(&self, handle: &str) -> bool {
        self.queue.iter().any(|h| h == handle)
    }

    pub fn get(&self, handle: &str) -> Option<&RegisteredStyle> {
        self.styles.get(handle)
    }

    /// Queued styles with their registrations, in emission order
    pub fn emitted(&self) -> impl Iterator<Item = (&str, &RegisteredStyle)> {
        self.queue
            .iter()
            .filter_map(|h| self.styles.get(h).map(|s| (h.as_str(), s)))
    }
}

impl StyleRegistry for StyleQueue {
    fn is_registered(&self, handle: &str) -> bool {
        self.styles.contains_key(handle)
    }

    fn dequeue(&mut self, handle: &str) {
        self.queue.retain(|h| h != handle);
    }

    fn deregister(&mut self, handle: &str) {
        self.styles.remove(handle);
        self.queue.retain(|h| h != handle);
    }

    fn enqueue(&mut self, style: StyleRegistration) {
        self.styles.insert(
            style.handle.clone(),
            RegisteredStyle {
                src: Some(style.src),
                deps: style.deps,
                ver: style.ver,
            },
        );
        if !self.is_queued(&style.handle) {
            self.queue.push(style.handle);
        }
    }

    fn registered(&self) -> BTreeMap<String, RegisteredStyle> {
        self.styles.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"{
        "styles": {
            "theme": {"src": "/content/themes/site/style.css", "ver": "2.1"},
            "forms": {"src": "https://example.com/content/plugins/forms/forms.css", "deps": ["theme"]}
        },
        "queue": ["theme", "forms", "ghost", "forms"]
    }"#;

    #[test]
    fn parses_explicit_queue() {
        let queue = StyleQueue::from_json(REGISTRY).unwrap();
        assert_eq!(queue.queued(), ["theme", "forms"]);
        assert_eq!(queue.get("forms").unwrap().deps, vec!["theme"]);
        assert_eq!(queue.get("theme").unwrap().ver.as_deref(), Some("2.1"));
    }

    #[test]
    fn missing_queue_queues_everything() {
        let queue = StyleQueue::from_json(r#"{"styles": {"b": {}, "a": {}}}"#).unwrap();
        assert_eq!(queue.queued(), ["a", "b"]);
    }

    #[test]
    fn dequeue_keeps_registration() {
        let mut queue = StyleQueue::from_json(REGISTRY).unwrap();
        queue.dequeue("forms");
        assert!(!queue.is_queued("forms"));
        assert!(queue.is_registered("forms"));
    }

    #[test]
    fn deregister_unknown_is_noop() {
        let mut queue = StyleQueue::from_json(REGISTRY).unwrap();
        let before = queue.clone();
        queue.dequeue("ghost");
        queue.deregister("ghost");
        assert_eq!(queue, before);
    }

    #[test]
    fn enqueue_registers_once() {
        let mut queue = StyleQueue::new();
        let style = StyleRegistration {
            handle: "demo-layered".to_string(),
            src: "https://example.com/demo-layered.css".to_string(),
            deps: vec![],
            ver: Some("1700000000".to_string()),
        };
        queue.enqueue(style.clone());
        queue.enqueue(style);

        assert_eq!(queue.queued(), ["demo-layered"]);
        assert_eq!(
            queue.get("demo-layered").unwrap().src.as_deref(),
            Some("https://example.com/demo-layered.css")
        );
    }

    #[test]
    fn invalid_file_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        fs::write(&path, "{not json").unwrap();

        let err = StyleQueue::load(&path).unwrap_err();
        assert!(matches!(err, LayeredError::RegistryInvalid { .. }));
    }
}
