//! Swappable catalog handle
//!
//! The deployed catalog is refreshed by an external poller. Rather than a
//! module-level singleton, the latest flow lives behind an explicitly
//! injected handle; consumers take `Arc` snapshots and the engine
//! re-validates its current node against each new snapshot it is handed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use kiosk_dialog_core::Language;

use crate::flow::{ChatFlow, LanguageFlow};

/// Source of per-language node catalogs
pub trait FlowProvider: Send + Sync {
    /// Snapshot of the catalog for a language, if one is deployed
    fn flow(&self, language: Language) -> Option<Arc<LanguageFlow>>;

    /// Languages currently available
    fn languages(&self) -> Vec<Language>;
}

/// Thread-safe holder for the latest deployed flow
pub struct SharedFlow {
    inner: RwLock<Snapshot>,
}

struct Snapshot {
    version: String,
    store_name: String,
    languages: HashMap<Language, Arc<LanguageFlow>>,
}

impl Snapshot {
    fn from_flow(flow: ChatFlow) -> Self {
        Self {
            version: flow.version,
            store_name: flow.store_name,
            languages: flow
                .languages
                .into_iter()
                .map(|(lang, catalog)| (lang, Arc::new(catalog)))
                .collect(),
        }
    }
}

impl SharedFlow {
    /// Wrap an initial flow
    pub fn new(flow: ChatFlow) -> Self {
        Self {
            inner: RwLock::new(Snapshot::from_flow(flow)),
        }
    }

    /// Replace the deployed flow with a newly fetched one
    pub fn swap(&self, flow: ChatFlow) {
        let snapshot = Snapshot::from_flow(flow);
        tracing::info!(
            version = %snapshot.version,
            languages = snapshot.languages.len(),
            "deployed flow replaced"
        );
        *self.inner.write() = snapshot;
    }

    /// Flow format version of the deployed flow
    pub fn version(&self) -> String {
        self.inner.read().version.clone()
    }

    /// Site name of the deployed flow
    pub fn store_name(&self) -> String {
        self.inner.read().store_name.clone()
    }
}

impl FlowProvider for SharedFlow {
    fn flow(&self, language: Language) -> Option<Arc<LanguageFlow>> {
        self.inner.read().languages.get(&language).cloned()
    }

    fn languages(&self) -> Vec<Language> {
        self.inner.read().languages.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_flow;

    #[test]
    fn snapshots_survive_swap() {
        let shared = SharedFlow::new(sample_flow());
        let before = shared.flow(Language::Ja).unwrap();

        let mut replacement = sample_flow();
        replacement.version = "2.0".to_string();
        shared.swap(replacement);

        // The old snapshot is still usable; the handle serves the new one.
        assert!(before.contains("start"));
        assert_eq!(shared.version(), "2.0");
    }

    #[test]
    fn lists_languages() {
        let shared = SharedFlow::new(sample_flow());
        let mut langs = shared.languages();
        langs.sort_by_key(|l| l.as_str());
        assert_eq!(langs, vec![Language::En, Language::Ja]);
    }
}
