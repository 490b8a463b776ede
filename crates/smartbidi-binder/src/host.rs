//! Single-threaded host page: listeners, mutation observers, an editor state
//! store and timers over a virtual clock.
//!
//! Nothing runs on its own. Host actions (`type_text`, `insert_html`,
//! `notify_store_change`) only queue events; `pump` and `advance` deliver them
//! to a [`HostListener`] one at a time, which is the only place callbacks run.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::time::Duration;

use ego_tree::NodeId;
use tracing::trace;

use crate::dom::Document;

/// Optional page APIs, detected per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mutation_observer: bool,
    /// Reactive editor state store with change subscriptions.
    pub editor_store: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            mutation_observer: true,
            editor_store: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            mutation_observer: false,
            editor_store: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreSubscription(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEventKind {
    Input,
    KeyUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Parent whose child list changed.
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Input {
        listener: ListenerHandle,
        target: NodeId,
        kind: InputEventKind,
    },
    Mutations {
        observer: ObserverHandle,
        records: Vec<MutationRecord>,
    },
    StoreChanged {
        subscription: StoreSubscription,
    },
    Timer {
        timer: TimerId,
    },
}

/// Receiver of host callbacks.
pub trait HostListener {
    fn on_event(&mut self, page: &mut HostPage, event: HostEvent);
}

#[derive(Debug)]
struct Listener {
    target: NodeId,
    kinds: Vec<InputEventKind>,
}

#[derive(Debug)]
struct Observer {
    root: NodeId,
    subtree: bool,
    pending: Vec<MutationRecord>,
}

#[derive(Debug)]
pub struct HostPage {
    document: Document,
    capabilities: Capabilities,
    next_id: u64,
    now: Duration,
    listeners: BTreeMap<ListenerHandle, Listener>,
    observers: BTreeMap<ObserverHandle, Observer>,
    store_subscriptions: HashSet<StoreSubscription>,
    timers: BTreeSet<(Duration, TimerId)>,
    queue: VecDeque<HostEvent>,
}

impl HostPage {
    pub fn new(document: Document, capabilities: Capabilities) -> Self {
        Self {
            document,
            capabilities,
            next_id: 0,
            now: Duration::ZERO,
            listeners: BTreeMap::new(),
            observers: BTreeMap::new(),
            store_subscriptions: HashSet::new(),
            timers: BTreeSet::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn from_html(html: &str, capabilities: Capabilities) -> Self {
        Self::new(Document::parse(html), capabilities)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Changes made here are not observed.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // Listeners

    pub fn add_input_listener(
        &mut self,
        target: NodeId,
        kinds: &[InputEventKind],
    ) -> Option<ListenerHandle> {
        if !self.document.is_element(target) {
            return None;
        }
        let handle = ListenerHandle(self.next());
        self.listeners.insert(
            handle,
            Listener {
                target,
                kinds: kinds.to_vec(),
            },
        );
        Some(handle)
    }

    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(&handle).is_some()
    }

    pub fn has_listener(&self, handle: ListenerHandle) -> bool {
        self.listeners.contains_key(&handle)
    }

    pub fn listener_count(&self, target: NodeId) -> usize {
        self.listeners
            .values()
            .filter(|listener| listener.target == target)
            .count()
    }

    // Mutation observers

    /// `None` when the page has no mutation observer support.
    pub fn observe_mutations(&mut self, root: NodeId, subtree: bool) -> Option<ObserverHandle> {
        if !self.capabilities.mutation_observer {
            return None;
        }
        let handle = ObserverHandle(self.next());
        self.observers.insert(
            handle,
            Observer {
                root,
                subtree,
                pending: Vec::new(),
            },
        );
        Some(handle)
    }

    pub fn disconnect(&mut self, handle: ObserverHandle) -> bool {
        self.observers.remove(&handle).is_some()
    }

    fn record_mutation(&mut self, record: MutationRecord) {
        let document = &self.document;
        for observer in self.observers.values_mut() {
            let watches = if observer.subtree {
                document.contains(observer.root, record.target)
            } else {
                observer.root == record.target
            };
            if watches {
                observer.pending.push(record.clone());
            }
        }
    }

    // Editor store

    /// `None` when the page exposes no editor store.
    pub fn subscribe_store(&mut self) -> Option<StoreSubscription> {
        if !self.capabilities.editor_store {
            return None;
        }
        let subscription = StoreSubscription(self.next());
        self.store_subscriptions.insert(subscription);
        Some(subscription)
    }

    pub fn unsubscribe_store(&mut self, subscription: StoreSubscription) -> bool {
        self.store_subscriptions.remove(&subscription)
    }

    pub fn store_subscriber_count(&self) -> usize {
        self.store_subscriptions.len()
    }

    // Timers

    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let timer = TimerId(self.next());
        self.timers.insert((self.now + delay, timer));
        timer
    }

    pub fn clear_timeout(&mut self, timer: TimerId) -> bool {
        let key = self.timers.iter().find(|(_, id)| *id == timer).copied();
        match key {
            Some(key) => self.timers.remove(&key),
            None => false,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // Host actions

    /// Replace an editable's text and fire `input` then `keyup` at it.
    pub fn type_text(&mut self, target: NodeId, text: &str) -> bool {
        if !self.document.is_connected(target) || !self.document.set_value(target, text) {
            return false;
        }
        for kind in [InputEventKind::Input, InputEventKind::KeyUp] {
            let handles: Vec<ListenerHandle> = self
                .listeners
                .iter()
                .filter(|(_, l)| l.target == target && l.kinds.contains(&kind))
                .map(|(handle, _)| *handle)
                .collect();
            for listener in handles {
                self.queue.push_back(HostEvent::Input {
                    listener,
                    target,
                    kind,
                });
            }
        }
        true
    }

    /// Append parsed `fragment` under `parent`, notifying observers.
    pub fn insert_html(&mut self, parent: NodeId, fragment: &str) -> Vec<NodeId> {
        let added = self.document.insert_html(parent, fragment);
        if !added.is_empty() {
            self.record_mutation(MutationRecord {
                target: parent,
                added: added.clone(),
                removed: Vec::new(),
            });
        }
        added
    }

    /// Detach `node`; listeners on the removed subtree go with it.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let parent = self
            .document
            .element(node)
            .and_then(|el| el.parent())
            .map(|parent| parent.id());
        let removed = self.document.remove(node);
        if removed.is_empty() {
            return false;
        }
        let gone: HashSet<NodeId> = removed.iter().copied().collect();
        self.listeners.retain(|_, l| !gone.contains(&l.target));
        if let Some(parent) = parent {
            self.record_mutation(MutationRecord {
                target: parent,
                added: Vec::new(),
                removed: vec![node],
            });
        }
        true
    }

    /// Queue a change notification for every store subscriber.
    pub fn notify_store_change(&mut self) {
        let mut subscriptions: Vec<StoreSubscription> =
            self.store_subscriptions.iter().copied().collect();
        subscriptions.sort();
        for subscription in subscriptions {
            self.queue
                .push_back(HostEvent::StoreChanged { subscription });
        }
    }

    fn flush_mutations(&mut self) {
        for (handle, observer) in self.observers.iter_mut() {
            if !observer.pending.is_empty() {
                self.queue.push_back(HostEvent::Mutations {
                    observer: *handle,
                    records: std::mem::take(&mut observer.pending),
                });
            }
        }
    }

    fn is_live(&self, event: &HostEvent) -> bool {
        match event {
            HostEvent::Input { listener, .. } => self.listeners.contains_key(listener),
            HostEvent::Mutations { observer, .. } => self.observers.contains_key(observer),
            HostEvent::StoreChanged { subscription } => {
                self.store_subscriptions.contains(subscription)
            }
            HostEvent::Timer { .. } => true,
        }
    }

    /// Deliver queued events until nothing is left. Returns how many ran.
    pub fn pump(&mut self, listener: &mut impl HostListener) -> usize {
        let mut delivered = 0;
        loop {
            self.flush_mutations();
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            if !self.is_live(&event) {
                trace!(?event, "dropping event for disposed registration");
                continue;
            }
            listener.on_event(self, event);
            delivered += 1;
        }
        delivered
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, by: Duration, listener: &mut impl HostListener) -> usize {
        let until = self.now + by;
        let mut delivered = self.pump(listener);
        while let Some((due, timer)) = self.timers.first().copied() {
            if due > until {
                break;
            }
            self.timers.remove(&(due, timer));
            self.now = due;
            self.queue.push_back(HostEvent::Timer { timer });
            delivered += self.pump(listener);
        }
        self.now = until;
        delivered
    }
}
