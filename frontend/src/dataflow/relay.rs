//! Event channel feeding an Actor.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
#[cfg(debug_assertions)]
use std::sync::{Arc, OnceLock};

/// Sending half of an event stream consumed by one Actor.
///
/// In debug builds a relay remembers the first source location that sent
/// through it and panics when a second location tries, so every event has
/// exactly one emitter in the code. Views that need the same event from
/// several places route through a helper function.
///
/// ```rust
/// let (rename_cancelled_relay, mut rename_cancelled_stream) = relay::<()>();
/// rename_cancelled_relay.send(());
/// ```
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) {
        let caller = std::panic::Location::caller();
        let previous = *self.emit_location.get_or_init(|| caller);
        assert!(
            previous == caller,
            "MultipleEmitters: relay first sent from {}, now from {}",
            previous,
            caller
        );
    }

    /// Sends an event. Events sent after the Actor is dropped are discarded.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        self.check_single_source();

        let _ = self.sender.unbounded_send(value);
    }
}

/// Shorthand for [`Relay::new`].
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let (row_clicked_relay, mut row_clicked_stream) = relay::<String>();

        for id in ["r1", "r2", "r2-text-a"] {
            row_clicked_relay.send(id.to_string());
        }

        assert_eq!(row_clicked_stream.next().await.as_deref(), Some("r1"));
        assert_eq!(row_clicked_stream.next().await.as_deref(), Some("r2"));
        assert_eq!(row_clicked_stream.next().await.as_deref(), Some("r2-text-a"));
    }

    #[test]
    fn send_after_receiver_dropped_is_discarded() {
        let (rename_cancelled_relay, rename_cancelled_stream) = relay::<()>();
        drop(rename_cancelled_stream);
        rename_cancelled_relay.send(());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn same_location_may_send_repeatedly() {
        let (expand_toggled_relay, _stream) = relay::<String>();
        for id in ["r2", "r3"] {
            expand_toggled_relay.send(id.to_string());
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "MultipleEmitters")]
    fn second_emitter_location_panics() {
        let (expand_toggled_relay, _stream) = relay::<String>();
        expand_toggled_relay.send("r2".to_string());
        expand_toggled_relay.send("r3".to_string());
    }
}
