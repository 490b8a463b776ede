use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use ego_tree::NodeId;
use scraper::Selector;
use smartbidi_config::SmartBidiConfig;
use smartbidi_text::{DirectionConfig, DirectionVariant, ScriptClassifier, ScriptRange, decide};
use tracing::{debug, trace};

use crate::host::{
    HostEvent, HostListener, HostPage, InputEventKind, ListenerHandle, ObserverHandle,
    StoreSubscription, TimerId,
};

/// Editable targets the binder attaches to.
pub const EDITABLE_SELECTOR: &str = r#"input[type="text"], input[type="email"], input[type="url"], textarea, [contenteditable="true"]"#;

fn editable_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(EDITABLE_SELECTOR).expect("editable selector is valid"))
}

/// Classes toggled on live elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassNames {
    pub mixed: &'static str,
    pub rtl_only: &'static str,
}

impl ClassNames {
    pub const DEFAULT: ClassNames = ClassNames {
        mixed: DirectionVariant::MIXED_CLASS,
        rtl_only: DirectionVariant::RTL_ONLY_CLASS,
    };

    /// Class names from earlier releases of the editor integration.
    pub const LEGACY: ClassNames = ClassNames {
        mixed: "hebrew-latin-mixed",
        rtl_only: "hebrew-only",
    };
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderConfig {
    pub range: ScriptRange,
    /// Quiescence window for store-driven re-scans.
    pub debounce: Duration,
    pub classes: ClassNames,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            range: ScriptRange::HEBREW,
            debounce: Duration::from_millis(300),
            classes: ClassNames::DEFAULT,
        }
    }
}

impl From<&SmartBidiConfig> for BinderConfig {
    fn from(config: &SmartBidiConfig) -> Self {
        Self {
            range: config.binder_script_range(),
            debounce: Duration::from_millis(config.binder.debounce_ms),
            classes: if config.binder.legacy_class_names {
                ClassNames::LEGACY
            } else {
                ClassNames::DEFAULT
            },
        }
    }
}

/// Keeps the direction of editable elements in step with what is typed.
///
/// Elements found by a scan are bound once: one listener for `input` and
/// `keyup` that re-classifies the element's text and rewrites its `dir` and
/// classes in place. New subtrees are picked up through a mutation observer,
/// and editor-store changes schedule a full re-scan.
#[derive(Debug)]
pub struct InputBinder {
    config: BinderConfig,
    classifier: ScriptClassifier,
    listeners: BTreeMap<ListenerHandle, NodeId>,
    observer: Option<ObserverHandle>,
    store: Option<StoreSubscription>,
    rescan_timer: Option<TimerId>,
    rescans: usize,
    attached: bool,
}

impl Default for InputBinder {
    fn default() -> Self {
        Self::new(BinderConfig::default())
    }
}

impl InputBinder {
    pub fn new(config: BinderConfig) -> Self {
        Self {
            config,
            classifier: ScriptClassifier::new(config.range),
            listeners: BTreeMap::new(),
            observer: None,
            store: None,
            rescan_timer: None,
            rescans: 0,
            attached: false,
        }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Number of live element bindings.
    pub fn bound_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn bound_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.listeners.values().copied()
    }

    /// Completed store-driven re-scans.
    pub fn rescan_count(&self) -> usize {
        self.rescans
    }

    pub fn has_pending_rescan(&self) -> bool {
        self.rescan_timer.is_some()
    }

    pub fn is_observing_mutations(&self) -> bool {
        self.observer.is_some()
    }

    pub fn is_subscribed_to_store(&self) -> bool {
        self.store.is_some()
    }

    /// Scan the whole document and install the optional watchers.
    ///
    /// Returns the number of elements bound by the initial scan.
    pub fn attach(&mut self, page: &mut HostPage) -> usize {
        if self.attached {
            debug!("binder already attached");
            return 0;
        }
        self.attached = true;

        let root = page.document().root();
        let bound = self.scan(page, root);

        match page.document().body() {
            Some(body) => {
                self.observer = page.observe_mutations(body, true);
                if self.observer.is_none() {
                    debug!("mutation observer unavailable; inserted editables wait for a re-scan");
                }
            }
            None => debug!("document has no body; not observing mutations"),
        }

        self.store = page.subscribe_store();
        if self.store.is_none() {
            debug!("no editor store on this page; skipping store re-scans");
        }

        debug!(bound, "binder attached");
        bound
    }

    /// Dispose every registration made on `page` and forget bindings.
    pub fn detach(&mut self, page: &mut HostPage) {
        if let Some(observer) = self.observer.take() {
            page.disconnect(observer);
        }
        if let Some(store) = self.store.take() {
            page.unsubscribe_store(store);
        }
        if let Some(timer) = self.rescan_timer.take() {
            page.clear_timeout(timer);
        }
        for (handle, node) in std::mem::take(&mut self.listeners) {
            page.remove_listener(handle);
            page.document_mut().clear_bound(node);
        }
        self.attached = false;
        debug!("binder detached");
    }

    /// Bind every editable at or below `root`. Returns how many were new.
    pub fn scan(&mut self, page: &mut HostPage, root: NodeId) -> usize {
        let targets = page.document().select(root, editable_selector());
        targets
            .into_iter()
            .filter(|node| self.bind(page, *node))
            .count()
    }

    /// Attach the input listener to `node` unless it is already bound.
    pub fn bind(&mut self, page: &mut HostPage, node: NodeId) -> bool {
        if !page.document_mut().mark_bound(node) {
            return false;
        }
        let Some(handle) =
            page.add_input_listener(node, &[InputEventKind::Input, InputEventKind::KeyUp])
        else {
            page.document_mut().clear_bound(node);
            return false;
        };
        self.listeners.insert(handle, node);
        trace!(?node, "bound editable");
        true
    }

    /// Re-classify `node`'s current text and rewrite its direction in place.
    pub fn apply(&self, page: &mut HostPage, node: NodeId) -> Option<DirectionVariant> {
        let text = page.document().text_value(node)?;
        let classification = self.classifier.classify(&text);
        let variant = decide(classification, &DirectionConfig::live_typing(), false).variant()?;

        let classes = self.config.classes;
        let doc = page.document_mut();
        doc.set_dir(node, variant.dir());
        match variant {
            DirectionVariant::Mixed => {
                doc.add_class(node, classes.mixed);
                doc.remove_class(node, classes.rtl_only);
            }
            DirectionVariant::RtlOnly => {
                doc.add_class(node, classes.rtl_only);
                doc.remove_class(node, classes.mixed);
            }
            DirectionVariant::Neutral => {
                doc.remove_class(node, classes.mixed);
                doc.remove_class(node, classes.rtl_only);
            }
        }
        Some(variant)
    }

    fn on_store_change(&mut self, page: &mut HostPage) {
        // The first notification arms the timer; later ones ride along.
        if self.rescan_timer.is_none() {
            self.rescan_timer = Some(page.set_timeout(self.config.debounce));
        }
    }

    fn on_rescan_timer(&mut self, page: &mut HostPage) {
        self.rescan_timer = None;
        self.listeners.retain(|handle, _| page.has_listener(*handle));
        let root = page.document().root();
        let bound = self.scan(page, root);
        self.rescans += 1;
        debug!(bound, rescans = self.rescans, "store re-scan");
    }
}

impl HostListener for InputBinder {
    fn on_event(&mut self, page: &mut HostPage, event: HostEvent) {
        match event {
            HostEvent::Input {
                listener, target, ..
            } => {
                if self.listeners.contains_key(&listener) {
                    self.apply(page, target);
                }
            }
            HostEvent::Mutations { observer, records } => {
                if self.observer != Some(observer) {
                    return;
                }
                for record in records {
                    for node in record.added {
                        if page.document().is_element(node) {
                            self.scan(page, node);
                        }
                    }
                }
                self.listeners.retain(|handle, _| page.has_listener(*handle));
            }
            HostEvent::StoreChanged { subscription } => {
                if self.store == Some(subscription) {
                    self.on_store_change(page);
                }
            }
            HostEvent::Timer { timer } => {
                if self.rescan_timer == Some(timer) {
                    self.on_rescan_timer(page);
                }
            }
        }
    }
}
