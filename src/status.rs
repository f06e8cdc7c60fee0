//! Progress and error messages for tracked async operations.
//!
//! Operations are keyed by name. A key is live from `register` until its one
//! terminal call (`success`, `fail` or `finish`); after that the key is free
//! for reuse immediately, while the old entry fades out and is removed on a
//! timer.

use crate::config::{STATUS_FAIL_DELAY_MS, STATUS_REMOVE_DELAY_MS, STATUS_SUCCESS_DELAY_MS};
use gloo_timers::callback::Timeout;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Clock and timer source for status expiry.
pub trait Scheduler {
    fn now_ms(&self) -> f64;
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Timers backed by `setTimeout` in the browser.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let _ = Timeout::new(delay_ms, task).forget();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    Pending,
    Success,
    Failed,
    Finished,
}

impl StatusState {
    /// CSS modifier class for the status message element.
    pub fn class(&self) -> &'static str {
        match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failed => "failed",
            StatusState::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub id: OperationId,
    pub key: String,
    pub text: String,
    pub state: StatusState,
    /// Set once the entry starts fading out; removal follows later.
    pub hidden: bool,
    pub created_at: f64,
}

struct StatusInner {
    scheduler: Rc<dyn Scheduler>,
    live: RefCell<HashMap<String, OperationId>>,
    entries: RefCell<Vec<StatusEntry>>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Rc<dyn Fn()>)>>,
    next_subscription: Cell<u64>,
}

#[derive(Clone)]
pub struct StatusLog {
    inner: Rc<StatusInner>,
}

impl PartialEq for StatusLog {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl StatusLog {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            inner: Rc::new(StatusInner {
                scheduler,
                live: RefCell::new(HashMap::new()),
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Start tracking `key`, or return the operation already live under it.
    pub fn register(&self, key: &str, text: &str) -> OperationId {
        if let Some(id) = self.inner.live.borrow().get(key) {
            return *id;
        }

        let id = OperationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        debug!("Status: {}", text);

        self.inner.live.borrow_mut().insert(key.to_string(), id);
        self.inner.entries.borrow_mut().push(StatusEntry {
            id,
            key: key.to_string(),
            text: text.to_string(),
            state: StatusState::Pending,
            hidden: false,
            created_at: self.inner.scheduler.now_ms(),
        });
        self.notify();
        id
    }

    /// Mark `key` successful, appending `msg` to its text.
    pub fn success(&self, key: &str, msg: &str) {
        let Some(id) = self.take_live(key) else {
            return;
        };
        self.update(id, |entry| {
            entry.state = StatusState::Success;
            entry.text.push_str(msg);
        });
        self.hide_after(id, STATUS_SUCCESS_DELAY_MS);
    }

    /// Mark `key` failed, replacing its text with `msg`.
    pub fn fail(&self, key: &str, msg: &str) {
        let Some(id) = self.take_live(key) else {
            return;
        };
        warn!("{}", msg);
        self.update(id, |entry| {
            entry.state = StatusState::Failed;
            entry.text = msg.to_string();
        });
        self.hide_after(id, STATUS_FAIL_DELAY_MS);
    }

    /// End `key` without a success or failure outcome.
    pub fn finish(&self, key: &str) {
        let Some(id) = self.take_live(key) else {
            return;
        };
        self.update(id, |entry| entry.state = StatusState::Finished);
        self.hide(id);
    }

    pub fn is_live(&self, key: &str) -> bool {
        self.inner.live.borrow().contains_key(key)
    }

    /// Snapshot of every displayed entry, oldest first.
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.inner.entries.borrow().clone()
    }

    /// Call `listener` whenever the displayed entries change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(sub, _)| *sub != id);
    }

    fn take_live(&self, key: &str) -> Option<OperationId> {
        self.inner.live.borrow_mut().remove(key)
    }

    fn update(&self, id: OperationId, f: impl FnOnce(&mut StatusEntry)) {
        if let Some(entry) = self
            .inner
            .entries
            .borrow_mut()
            .iter_mut()
            .find(|entry| entry.id == id)
        {
            f(entry);
        }
        self.notify();
    }

    fn hide_after(&self, id: OperationId, delay_ms: u32) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    StatusLog { inner }.hide(id);
                }
            }),
        );
    }

    fn hide(&self, id: OperationId) {
        self.update(id, |entry| entry.hidden = true);
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            STATUS_REMOVE_DELAY_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    StatusLog { inner }.remove(id);
                }
            }),
        );
    }

    fn remove(&self, id: OperationId) {
        self.inner
            .entries
            .borrow_mut()
            .retain(|entry| entry.id != id);
        self.notify();
    }

    fn notify(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}
