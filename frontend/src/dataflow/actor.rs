//! Single-writer reactive state.

use std::future::Future;
use std::sync::Arc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// Owns one piece of state and the task that mutates it.
///
/// The processor receives the state's `Mutable` and runs for as long as the
/// Actor (or any clone of it) is alive. Everything else reads the state
/// through signals only.
///
/// ```rust
/// let (expand_toggled_relay, mut expand_toggled_stream) = relay::<String>();
///
/// let panel = Actor::new(LayerPanelState::seeded()?, async move |state| {
///     while let Some(id) = expand_toggled_stream.next().await {
///         state.update_mut(|panel| panel.toggle_expand(&id));
///     }
/// });
///
/// panel.signal_ref(|panel| panel.visible_order())
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));
        Self { state, task_handle }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Maps the state without cloning it.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        U: PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }
}
