//! Lazily loaded caches that wrap asynchronous loaders.
//!
//! Both caches share one contract:
//! - a cached value is returned without calling the loader;
//! - concurrent non-forced loads join the single registered in-flight load
//!   and all receive the same `Rc`;
//! - a forced load always calls the loader and registers itself as the new
//!   in-flight load. It does not cancel an older one. Whichever load
//!   completes last is what stays cached.
//!
//! Loaders resolve to `Ok(None)` when there is legitimately no data. A failed
//! load leaves the cache as it was, so the next call simply retries.
//!
//! Handles are cheap to clone and are meant to be captured by the loaders of
//! dependent caches. Everything runs on the single browser thread, so state
//! lives in `RefCell`s rather than behind locks.

use crate::error::LoadError;
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

/// Outcome of a cache load: the shared value, or `None` for "no data".
pub type LoadResult<T> = Result<Option<Rc<T>>, LoadError>;

type SharedLoad<T> = Shared<LocalBoxFuture<'static, LoadResult<T>>>;
type LoaderFuture<T> = LocalBoxFuture<'static, Result<Option<T>, LoadError>>;
type PostLoadHook<T> = Rc<dyn Fn(&Rc<T>)>;

struct LazyInner<T> {
    name: &'static str,
    loader: Box<dyn Fn(bool) -> LoaderFuture<T>>,
    value: RefCell<Option<Rc<T>>>,
    pending: RefCell<Option<(u64, SharedLoad<T>)>>,
    generation: Cell<u64>,
    hooks: RefCell<Vec<PostLoadHook<T>>>,
}

/// Holds at most one value, loaded on first use.
pub struct LazyData<T> {
    inner: Rc<LazyInner<T>>,
}

impl<T> Clone for LazyData<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> LazyData<T> {
    pub fn new<F, Fut>(name: &'static str, loader: F) -> Self
    where
        F: Fn(bool) -> Fut + 'static,
        Fut: Future<Output = Result<Option<T>, LoadError>> + 'static,
    {
        Self {
            inner: Rc::new(LazyInner {
                name,
                loader: Box::new(move |force| loader(force).boxed_local()),
                value: RefCell::new(None),
                pending: RefCell::new(None),
                generation: Cell::new(0),
                hooks: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Return the cached value, join the in-flight load, or start a new one.
    ///
    /// The decision is made when `load` is called, not when the returned
    /// future is first polled, so callers that ask before any load settles
    /// all share one loader call.
    pub fn load(&self, force: bool) -> LocalBoxFuture<'static, LoadResult<T>> {
        if !force {
            if let Some(value) = self.inner.value.borrow().clone() {
                return future::ready(Ok(Some(value))).boxed_local();
            }
            if let Some((_, pending)) = self.inner.pending.borrow().as_ref() {
                return pending.clone().boxed_local();
            }
        }
        self.start(force).boxed_local()
    }

    fn start(&self, force: bool) -> SharedLoad<T> {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        debug!("Loading {} (force: {})", self.inner.name, force);

        let fetch = (self.inner.loader)(force);
        let inner = Rc::downgrade(&self.inner);
        let load = async move {
            let result = fetch.await.map(|value| value.map(Rc::new));
            match inner.upgrade() {
                Some(inner) => inner.settle(generation, result),
                None => result,
            }
        }
        .boxed_local()
        .shared();

        *self.inner.pending.borrow_mut() = Some((generation, load.clone()));
        load
    }

    /// The cached value. Fails if no load has completed with data yet.
    pub fn get(&self) -> Result<Rc<T>, LoadError> {
        self.inner
            .value
            .borrow()
            .clone()
            .ok_or(LoadError::Uninitialized(self.inner.name))
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.value.borrow().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// Register a hook run after every load that produced data.
    ///
    /// Hooks run in registration order, after the value is stored and before
    /// any caller of that load sees the result.
    pub fn on_loaded(&self, hook: impl Fn(&Rc<T>) + 'static) {
        self.inner.hooks.borrow_mut().push(Rc::new(hook));
    }
}

impl<T> LazyInner<T> {
    fn settle(&self, generation: u64, result: LoadResult<T>) -> LoadResult<T> {
        {
            let mut pending = self.pending.borrow_mut();
            if matches!(pending.as_ref(), Some((current, _)) if *current == generation) {
                *pending = None;
            }
        }

        match &result {
            Ok(value) => {
                *self.value.borrow_mut() = value.clone();
                match value {
                    Some(value) => {
                        let hooks: Vec<PostLoadHook<T>> = self.hooks.borrow().clone();
                        for hook in hooks {
                            hook(value);
                        }
                    }
                    None => debug!("{} loaded without data", self.name),
                }
            }
            Err(e) => warn!("Failed to load {}: {}", self.name, e),
        }
        result
    }
}

struct MemoInner<K, T> {
    name: &'static str,
    loader: Box<dyn Fn(K, bool) -> LoaderFuture<T>>,
    entries: RefCell<HashMap<K, Rc<T>>>,
    pending: RefCell<HashMap<K, (u64, SharedLoad<T>)>>,
    generation: Cell<u64>,
}

/// One lazily loaded value per key. Keys load independently of each other.
///
/// The only writer is the cache's own load path; there is deliberately no
/// way to insert a value from outside.
pub struct MemoizedData<K, T> {
    inner: Rc<MemoInner<K, T>>,
}

impl<K, T> Clone for MemoizedData<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K, T> MemoizedData<K, T>
where
    K: Eq + Hash + Clone + Debug + 'static,
    T: 'static,
{
    pub fn new<F, Fut>(name: &'static str, loader: F) -> Self
    where
        F: Fn(K, bool) -> Fut + 'static,
        Fut: Future<Output = Result<Option<T>, LoadError>> + 'static,
    {
        Self {
            inner: Rc::new(MemoInner {
                name,
                loader: Box::new(move |key, force| loader(key, force).boxed_local()),
                entries: RefCell::new(HashMap::new()),
                pending: RefCell::new(HashMap::new()),
                generation: Cell::new(0),
            }),
        }
    }

    pub fn load(&self, key: K, force: bool) -> LocalBoxFuture<'static, LoadResult<T>> {
        if !force {
            if let Some(value) = self.inner.entries.borrow().get(&key).cloned() {
                return future::ready(Ok(Some(value))).boxed_local();
            }
            if let Some((_, pending)) = self.inner.pending.borrow().get(&key) {
                return pending.clone().boxed_local();
            }
        }
        self.start(key, force).boxed_local()
    }

    fn start(&self, key: K, force: bool) -> SharedLoad<T> {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        debug!("Loading {} {:?} (force: {})", self.inner.name, key, force);

        let fetch = (self.inner.loader)(key.clone(), force);
        let inner = Rc::downgrade(&self.inner);
        let settle_key = key.clone();
        let load = async move {
            let result = fetch.await.map(|value| value.map(Rc::new));
            match inner.upgrade() {
                Some(inner) => inner.settle(settle_key, generation, result),
                None => result,
            }
        }
        .boxed_local()
        .shared();

        self.inner
            .pending
            .borrow_mut()
            .insert(key, (generation, load.clone()));
        load
    }

    /// The cached value for `key`, or `None` if it was never loaded.
    pub fn get(&self, key: &K) -> Option<Rc<T>> {
        self.inner.entries.borrow().get(key).cloned()
    }

    /// Direct writes are rejected; values only arrive through `load`.
    pub fn set(&self, _key: K, _value: T) -> Result<(), LoadError> {
        Err(LoadError::Unsupported("Setting cached values directly"))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.entries.borrow().contains_key(key)
    }

    pub fn is_loading(&self, key: &K) -> bool {
        self.inner.pending.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }
}

impl<K: Eq + Hash + Debug, T> MemoInner<K, T> {
    fn settle(&self, key: K, generation: u64, result: LoadResult<T>) -> LoadResult<T> {
        {
            let mut pending = self.pending.borrow_mut();
            if matches!(pending.get(&key), Some((current, _)) if *current == generation) {
                pending.remove(&key);
            }
        }

        match &result {
            Ok(Some(value)) => {
                self.entries.borrow_mut().insert(key, Rc::clone(value));
            }
            Ok(None) => {
                debug!("{} {:?} loaded without data", self.name, key);
                self.entries.borrow_mut().remove(&key);
            }
            Err(e) => warn!("Failed to load {} {:?}: {}", self.name, key, e),
        }
        result
    }
}
