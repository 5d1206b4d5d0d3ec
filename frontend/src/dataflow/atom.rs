//! Local view state backed by an Actor.

use crate::dataflow::{Actor, Relay, relay};
use futures::StreamExt;
use zoon::Signal;

/// Small piece of view-local state, e.g. whether a layer row is hovered.
///
/// Domain state belongs in a domain Actor; an Atom is for state nobody
/// outside one element cares about.
#[derive(Clone, Debug)]
pub struct Atom<T>
where
    T: Clone + Send + Sync + 'static,
{
    actor: Actor<T>,
    value_changed_relay: Relay<T>,
}

impl<T> Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (value_changed_relay, mut value_changed_stream) = relay();

        let actor = Actor::new(initial, async move |state| {
            while let Some(value) = value_changed_stream.next().await {
                state.set_neq(value);
            }
        });

        Self {
            actor,
            value_changed_relay,
        }
    }

    /// Replaces the value; unchanged values emit nothing.
    pub fn set_neq(&self, value: T) {
        self.value_changed_relay.send(value);
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.actor.signal()
    }
}

impl<T> Default for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + Default + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}
