//! Serial store runtime
//!
//! The store owns a feature's state and reducer. Actions are reduced one at a
//! time under a lock; synchronous follow-ups produced by the reducer are
//! drained before [`Store::send`] returns, so a causal chain (child finishes,
//! parent clears, grandparent clears) completes before any other action is
//! seen. Async effects run as tokio tasks and feed their action back through a
//! channel consumed by a single driver task.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::effect::{Effect, EffectId};
use crate::reducer::Reducer;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was dropped while a caller was waiting on it
    #[error("Store closed")]
    Closed,
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

struct Inner<R: Reducer> {
    reducer: R,
    state: Mutex<R::State>,
    state_tx: watch::Sender<R::State>,
    actions_tx: mpsc::UnboundedSender<R::Action>,
    tasks: Mutex<HashMap<EffectId, JoinHandle<()>>>,
    detached: Mutex<Vec<JoinHandle<()>>>,
}

/// Runtime for a root reducer
///
/// Must be created inside a tokio runtime. Cloning is cheap; all clones share
/// the same state. Dropping the last clone aborts every running effect.
///
/// # Example
///
/// ```no_run
/// use app_state::effect::Effect;
/// use app_state::reducer::Reducer;
/// use app_state::store::Store;
///
/// struct Counter;
///
/// impl Reducer for Counter {
///     type State = u32;
///     type Action = ();
///
///     fn reduce(&self, state: &mut u32, _: ()) -> Effect<()> {
///         *state += 1;
///         Effect::none()
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let store = Store::new(0, Counter);
///     store.send(());
///     assert_eq!(store.state(), 1);
/// }
/// ```
pub struct Store<R: Reducer> {
    inner: Arc<Inner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Store<R>
where
    R: Reducer,
    R::State: Clone + PartialEq + Debug + Send + Sync,
    R::Action: Debug,
{
    /// Create a store and start its driver task
    pub fn new(initial: R::State, reducer: R) -> Self {
        let (actions_tx, mut actions_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(initial.clone());

        let inner = Arc::new(Inner {
            reducer,
            state: Mutex::new(initial),
            state_tx,
            actions_tx,
            tasks: Mutex::new(HashMap::new()),
            detached: Mutex::new(Vec::new()),
        });

        let weak: Weak<Inner<R>> = Arc::downgrade(&inner);
        tokio::spawn(async move {
            while let Some(action) = actions_rx.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.dispatch(action);
            }
        });

        Self { inner }
    }

    /// Dispatch an action
    ///
    /// Returns once the action and every synchronous follow-up it triggered
    /// have been reduced. Async effects keep running in the background.
    pub fn send(&self, action: R::Action) {
        self.inner.dispatch(action);
    }

    /// Snapshot of the current state
    pub fn state(&self) -> R::State {
        self.inner.state.lock().clone()
    }

    /// Read the state without cloning it
    pub fn with_state<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
        f(&self.inner.state.lock())
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.inner.state_tx.subscribe()
    }

    /// Wait until the state satisfies `predicate`
    pub async fn wait_for(&self, mut predicate: impl FnMut(&R::State) -> bool) -> Result<R::State> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| predicate(state))
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(state.clone())
    }

    /// Number of effects currently registered under an id
    pub fn running_effects(&self) -> usize {
        let mut tasks = self.inner.tasks.lock();
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.len()
    }

    /// Whether an effect with `id` is running
    pub fn is_running(&self, id: &EffectId) -> bool {
        self.inner
            .tasks
            .lock()
            .get(id)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<R> Inner<R>
where
    R: Reducer,
    R::State: Clone + PartialEq + Debug + Send + Sync,
    R::Action: Debug,
{
    fn dispatch(&self, action: R::Action) {
        let mut queue = VecDeque::from([action]);
        let mut state = self.state.lock();
        let before = state.clone();

        while let Some(action) = queue.pop_front() {
            tracing::debug!(?action, "dispatching action");
            let effect = self.reducer.reduce(&mut state, action);
            self.schedule(effect, &mut queue);
        }

        if *state != before {
            tracing::trace!(state = ?*state, "state changed");
            let snapshot = state.clone();
            drop(state);
            self.state_tx.send_replace(snapshot);
        }
    }

    fn schedule(&self, effect: Effect<R::Action>, queue: &mut VecDeque<R::Action>) {
        match effect {
            Effect::None => {}
            Effect::Send(action) => queue.push_back(action),
            Effect::Batch(effects) => {
                for effect in effects {
                    self.schedule(effect, queue);
                }
            }
            Effect::Run { id, future } => {
                let tx = self.actions_tx.clone();
                let handle = tokio::spawn(async move {
                    let action = future.await;
                    let _ = tx.send(action);
                });
                match id {
                    Some(id) => self.register(id, handle),
                    None => {
                        let mut detached = self.detached.lock();
                        detached.retain(|handle| !handle.is_finished());
                        detached.push(handle);
                    }
                }
            }
            Effect::Timer { id, period, tick } => {
                let tx = self.actions_tx.clone();
                let handle = tokio::spawn(async move {
                    let start = tokio::time::Instant::now() + period;
                    let mut interval = tokio::time::interval_at(start, period);
                    loop {
                        interval.tick().await;
                        if tx.send(tick()).is_err() {
                            break;
                        }
                    }
                });
                self.register(id, handle);
            }
            Effect::Cancel(id) => {
                if let Some(handle) = self.tasks.lock().remove(&id) {
                    tracing::debug!(%id, "effect cancelled");
                    handle.abort();
                }
            }
        }
    }

    fn register(&self, id: EffectId, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock();
        if let Some(previous) = tasks.insert(id, handle) {
            tracing::debug!(%id, "replacing in-flight effect");
            previous.abort();
        }
    }
}

impl<R: Reducer> Drop for Inner<R> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.get_mut().drain() {
            handle.abort();
        }
        for handle in self.detached.get_mut().drain(..) {
            handle.abort();
        }
    }
}
