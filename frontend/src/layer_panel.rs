//! LayerPanel domain: the layer tree and all row interaction state.

use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select_biased};
use shared::{LayerPanelState, LayerTree, Modifiers};
use zoon::{Signal, SignalExt};

#[derive(Clone, Debug)]
pub struct LayerPanel {
    pub state_actor: Actor<LayerPanelState>,
    /// Shape of the tree the rows are built from. Renaming never changes it.
    pub layout: LayerTree,

    /// Chevron on a group row pressed
    pub expand_toggled_relay: Relay<String>,
    /// Row pressed, with the modifier keys held at the time
    pub row_clicked_relay: Relay<(String, Modifiers)>,
    pub visibility_toggled_relay: Relay<String>,
    /// Row double-clicked
    pub rename_started_relay: Relay<String>,
    /// Rename input confirmed with Enter or blurred: (id, proposed name)
    pub rename_committed_relay: Relay<(String, String)>,
    pub rename_cancelled_relay: Relay<()>,
    /// Pointer pressed on blank panel space or outside the panel
    pub selection_clear_requested_relay: Relay<()>,
}

impl LayerPanel {
    pub fn new(initial: LayerPanelState) -> Self {
        let layout = initial.tree().clone();
        let (expand_toggled_relay, mut expand_toggled_stream) = relay::<String>();
        let (row_clicked_relay, mut row_clicked_stream) = relay::<(String, Modifiers)>();
        let (visibility_toggled_relay, mut visibility_toggled_stream) = relay::<String>();
        let (rename_started_relay, mut rename_started_stream) = relay::<String>();
        let (rename_committed_relay, mut rename_committed_stream) = relay::<(String, String)>();
        let (rename_cancelled_relay, mut rename_cancelled_stream) = relay::<()>();
        let (selection_clear_requested_relay, mut selection_clear_requested_stream) =
            relay::<()>();

        let state_actor = Actor::new(initial, async move |state| {
            loop {
                // A press outside ends a rename through blur, which queues the
                // commit right after the press. Clears go first so the rename
                // still blocks them.
                let event = select_biased! {
                    requested = selection_clear_requested_stream.next() => {
                        requested.map(|()| PanelEvent::SelectionClearRequested)
                    }
                    id = expand_toggled_stream.next() => id.map(PanelEvent::ExpandToggled),
                    click = row_clicked_stream.next() => {
                        click.map(|(id, modifiers)| PanelEvent::RowClicked(id, modifiers))
                    }
                    id = visibility_toggled_stream.next() => id.map(PanelEvent::VisibilityToggled),
                    id = rename_started_stream.next() => id.map(PanelEvent::RenameStarted),
                    commit = rename_committed_stream.next() => {
                        commit.map(|(id, name)| PanelEvent::RenameCommitted(id, name))
                    }
                    cancelled = rename_cancelled_stream.next() => {
                        cancelled.map(|()| PanelEvent::RenameCancelled)
                    }
                    complete => break,
                };
                if let Some(event) = event {
                    state.update_mut(|panel| apply(panel, event));
                }
            }
        });

        Self {
            state_actor,
            layout,
            expand_toggled_relay,
            row_clicked_relay,
            visibility_toggled_relay,
            rename_started_relay,
            rename_committed_relay,
            rename_cancelled_relay,
            selection_clear_requested_relay,
        }
    }

    pub fn is_selected_signal(&self, id: String) -> impl Signal<Item = bool> + use<> {
        self.state_actor
            .signal_ref(move |panel| panel.is_selected(&id))
            .dedupe()
    }

    pub fn is_expanded_signal(&self, id: String) -> impl Signal<Item = bool> + use<> {
        self.state_actor
            .signal_ref(move |panel| panel.is_expanded(&id))
            .dedupe()
    }

    pub fn is_hidden_signal(&self, id: String) -> impl Signal<Item = bool> + use<> {
        self.state_actor
            .signal_ref(move |panel| panel.is_hidden(&id))
            .dedupe()
    }

    pub fn is_renaming_signal(&self, id: String) -> impl Signal<Item = bool> + use<> {
        self.state_actor
            .signal_ref(move |panel| panel.is_renaming(&id))
            .dedupe()
    }

    /// Current display name, `None` when the id is unknown.
    pub fn name_signal(&self, id: String) -> impl Signal<Item = Option<String>> + use<> {
        self.state_actor
            .signal_ref(move |panel| panel.tree().find(&id).map(|node| node.name.clone()))
            .dedupe_cloned()
    }
}

/// One user interaction, as delivered by the relays above.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent {
    ExpandToggled(String),
    RowClicked(String, Modifiers),
    VisibilityToggled(String),
    RenameStarted(String),
    RenameCommitted(String, String),
    RenameCancelled,
    SelectionClearRequested,
}

pub fn apply(panel: &mut LayerPanelState, event: PanelEvent) {
    match event {
        PanelEvent::ExpandToggled(id) => panel.toggle_expand(&id),
        PanelEvent::RowClicked(id, modifiers) => panel.select(&id, modifiers),
        PanelEvent::VisibilityToggled(id) => panel.toggle_visibility(&id),
        PanelEvent::RenameStarted(id) => panel.start_rename(&id),
        PanelEvent::RenameCommitted(id, proposed_name) => {
            panel.commit_rename(&id, &proposed_name)
        }
        PanelEvent::RenameCancelled => panel.cancel_rename(),
        PanelEvent::SelectionClearRequested => panel.clear_selection(),
    }
}

/// Both the blank-area press and the outside press end up here, so the
/// relay keeps a single emitter.
pub fn request_selection_clear(layer_panel: &LayerPanel) {
    layer_panel.selection_clear_requested_relay.send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use PanelEvent::*;

    fn run(events: impl IntoIterator<Item = PanelEvent>) -> LayerPanelState {
        let mut panel = LayerPanelState::seeded().unwrap();
        for event in events {
            apply(&mut panel, event);
        }
        panel
    }

    fn selected(panel: &LayerPanelState) -> Vec<&str> {
        panel.selected().iter().map(String::as_str).collect()
    }

    #[test]
    fn click_then_shift_click_selects_visible_range() {
        let panel = run([
            RowClicked("r1".to_string(), Modifiers::NONE),
            RowClicked("r3".to_string(), Modifiers::shift()),
        ]);
        assert_eq!(selected(&panel), ["r1", "r2", "r2-text-a", "r3"]);
    }

    #[test]
    fn press_outside_during_rename_keeps_selection() {
        // Pointer-down queues the clear, then the blur commits the rename
        let panel = run([
            RowClicked("r2".to_string(), Modifiers::NONE),
            RenameStarted("r2-text-a".to_string()),
            SelectionClearRequested,
            RenameCommitted("r2-text-a".to_string(), "Text Alpha".to_string()),
        ]);
        assert_eq!(selected(&panel), ["r2"]);
        assert_eq!(panel.renaming(), None);
        assert_eq!(
            panel.tree().find("r2-text-a").map(|node| node.name.as_str()),
            Some("Text Alpha")
        );
    }

    #[test]
    fn press_outside_without_rename_clears_selection() {
        let panel = run([
            RowClicked("r2".to_string(), Modifiers::NONE),
            RowClicked("r3".to_string(), Modifiers::ctrl()),
            SelectionClearRequested,
        ]);
        assert!(panel.selected().is_empty());
    }

    #[test]
    fn committed_rename_is_trimmed() {
        let panel = run([
            RenameStarted("r3-text-w".to_string()),
            RenameCommitted("r3-text-w".to_string(), "  Text Omega ".to_string()),
        ]);
        assert_eq!(panel.renaming(), None);
        assert_eq!(
            panel.tree().find("r3-text-w").map(|node| node.name.as_str()),
            Some("Text Omega")
        );
    }

    #[test]
    fn cancelled_rename_keeps_name_and_expansion_toggles() {
        let panel = run([
            RenameStarted("r3-text-q".to_string()),
            RenameCancelled,
            ExpandToggled("r3".to_string()),
            VisibilityToggled("r3-text-q".to_string()),
        ]);
        assert_eq!(panel.renaming(), None);
        assert!(!panel.is_expanded("r3"));
        assert!(panel.is_hidden("r3-text-q"));
        assert_eq!(panel.visible_order(), ["r1", "r2", "r2-text-a", "r3"]);
    }
}
