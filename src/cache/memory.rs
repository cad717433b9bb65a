// In-memory response cache.
// Mutex-guarded map from fingerprint to parsed result; eviction is the caller's concern.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ResponseCache, fingerprint};
use crate::request::descriptor::RequestDescriptor;

/// Process-lifetime cache of parsed results, safe to share across calls.
#[derive(Debug)]
pub struct MemoryCache<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T> MemoryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> ResponseCache<T> for MemoryCache<T> {
    fn try_get(&self, descriptor: &RequestDescriptor) -> Option<T> {
        let entries = self.entries.lock().ok()?;
        entries.get(&fingerprint(descriptor)).cloned()
    }

    fn set(&self, descriptor: &RequestDescriptor, value: &T) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(fingerprint(descriptor), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(parameter: (&str, &str)) -> RequestDescriptor {
        let mut descriptor = RequestDescriptor {
            path: "artist/details".to_string(),
            ..RequestDescriptor::default()
        };
        descriptor.set_parameter(parameter.0, parameter.1);
        descriptor
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let cache = MemoryCache::new();
        let d = descriptor(("artistId", "1"));
        cache.set(&d, &"value".to_string());
        assert_eq!(cache.try_get(&d), Some("value".to_string()));
    }

    #[test]
    fn test_no_false_hits_across_fingerprints() {
        let cache = MemoryCache::new();
        cache.set(&descriptor(("artistId", "1")), &"one".to_string());
        let miss: Option<String> = cache.try_get(&descriptor(("artistId", "2")));
        assert!(miss.is_none());
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        let cache = MemoryCache::new();
        let d = descriptor(("artistId", "1"));
        cache.set(&d, &"old".to_string());
        cache.set(&d, &"new".to_string());
        assert_eq!(cache.try_get(&d), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }
}
