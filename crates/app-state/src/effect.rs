//! Side effects returned by reducers
//!
//! A reducer never performs I/O itself. It returns an [`Effect`] describing the
//! work to do next, and the [`Store`](crate::store::Store) runs it: synchronous
//! follow-up actions are processed immediately, async work is spawned on tokio
//! and its resulting action is fed back into the same serial queue.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

/// Boxed future producing a single follow-up action
pub type BoxFuture<A> = Pin<Box<dyn Future<Output = A> + Send + 'static>>;

/// Cancellation key for long-running effects
///
/// Ids are scoped to one flow instance so that two presentations of the same
/// screen never cancel each other's work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId {
    /// Kind of effect (e.g. `"otp-resend"`)
    pub name: &'static str,
    /// Owning flow instance
    pub instance: Uuid,
}

impl EffectId {
    /// Create an id for `name` owned by `instance`
    pub fn new(name: &'static str, instance: Uuid) -> Self {
        Self { name, instance }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.instance)
    }
}

/// Work scheduled by a reducer
pub enum Effect<A> {
    /// Nothing to do
    None,

    /// Dispatch an action synchronously, before any external action
    Send(A),

    /// Run a future and dispatch the action it produces
    Run {
        /// Optional cancellation key; a new run with the same id replaces the old one
        id: Option<EffectId>,
        /// The work itself
        future: BoxFuture<A>,
    },

    /// Dispatch `tick()` every `period` until cancelled
    Timer {
        /// Cancellation key
        id: EffectId,
        /// Interval between ticks (the first tick fires after one period)
        period: Duration,
        /// Produces the tick action
        tick: Arc<dyn Fn() -> A + Send + Sync>,
    },

    /// Abort the effect registered under this id
    Cancel(EffectId),

    /// Several effects at once, scheduled in order
    Batch(Vec<Effect<A>>),
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Effect::None
    }
}

impl<A: Send + 'static> Effect<A> {
    /// No effect
    pub fn none() -> Self {
        Effect::None
    }

    /// Dispatch `action` right after the current one
    pub fn send(action: A) -> Self {
        Effect::Send(action)
    }

    /// Run `future` on the runtime and dispatch its output
    pub fn run<F>(future: F) -> Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        Effect::Run {
            id: None,
            future: Box::pin(future),
        }
    }

    /// Repeating tick every `period`
    pub fn timer<F>(id: EffectId, period: Duration, tick: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        Effect::Timer {
            id,
            period,
            tick: Arc::new(tick),
        }
    }

    /// Cancel the effect registered under `id`
    pub fn cancel(id: EffectId) -> Self {
        Effect::Cancel(id)
    }

    /// Mark a `Run` effect as cancellable under `id`
    ///
    /// Other variants are returned unchanged; timers always carry an id.
    pub fn cancellable(self, id: EffectId) -> Self {
        match self {
            Effect::Run { future, .. } => Effect::Run {
                id: Some(id),
                future,
            },
            other => other,
        }
    }

    /// Combine two effects, keeping their order
    pub fn merge(self, other: Effect<A>) -> Self {
        match (self, other) {
            (Effect::None, other) => other,
            (this, Effect::None) => this,
            (Effect::Batch(mut effects), Effect::Batch(more)) => {
                effects.extend(more);
                Effect::Batch(effects)
            }
            (Effect::Batch(mut effects), other) => {
                effects.push(other);
                Effect::Batch(effects)
            }
            (this, other) => Effect::Batch(vec![this, other]),
        }
    }

    /// Lift the effect into another action space
    ///
    /// Used by parents to embed a child's effects, e.g.
    /// `child_effect.map(Action::Destination)`.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<B>(self, f: Arc<dyn Fn(A) -> B + Send + Sync>) -> Effect<B>
    where
        B: Send + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Send(action) => Effect::Send(f(action)),
            Effect::Run { id, future } => Effect::Run {
                id,
                future: Box::pin(async move { f(future.await) }),
            },
            Effect::Timer { id, period, tick } => Effect::Timer {
                id,
                period,
                tick: Arc::new(move || f(tick())),
            },
            Effect::Cancel(id) => Effect::Cancel(id),
            Effect::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|effect| effect.map_shared(Arc::clone(&f)))
                    .collect(),
            ),
        }
    }

    /// Whether this effect does nothing
    pub fn is_none(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Batch(effects) => effects.iter().all(Effect::is_none),
            _ => false,
        }
    }

    /// Synchronous follow-up actions, in dispatch order
    pub fn sent_actions(&self) -> Vec<&A> {
        match self {
            Effect::Send(action) => vec![action],
            Effect::Batch(effects) => effects.iter().flat_map(Effect::sent_actions).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the effect contains async work (a `Run`)
    pub fn has_async_work(&self) -> bool {
        match self {
            Effect::Run { .. } => true,
            Effect::Batch(effects) => effects.iter().any(Effect::has_async_work),
            _ => false,
        }
    }

    /// Ids of timers started by this effect
    pub fn timers(&self) -> Vec<EffectId> {
        match self {
            Effect::Timer { id, .. } => vec![*id],
            Effect::Batch(effects) => effects.iter().flat_map(Effect::timers).collect(),
            _ => Vec::new(),
        }
    }

    /// Ids cancelled by this effect
    pub fn cancellations(&self) -> Vec<EffectId> {
        match self {
            Effect::Cancel(id) => vec![*id],
            Effect::Batch(effects) => effects.iter().flat_map(Effect::cancellations).collect(),
            _ => Vec::new(),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "None"),
            Effect::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Effect::Run { id, .. } => f.debug_struct("Run").field("id", id).finish_non_exhaustive(),
            Effect::Timer { id, period, .. } => f
                .debug_struct("Timer")
                .field("id", id)
                .field("period", period)
                .finish_non_exhaustive(),
            Effect::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            Effect::Batch(effects) => f.debug_list().entries(effects).finish(),
        }
    }
}
