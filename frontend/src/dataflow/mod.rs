//! Actor+Relay primitives used by every domain in the configurator.
//!
//! - [`Relay`] carries one kind of user or system event into a domain.
//! - [`Actor`] owns a piece of state and is its only writer.
//! - [`Atom`] wraps an Actor for purely local view state such as hover.
//!
//! Relays are named after the event source: `row_clicked_relay`,
//! `rename_committed_relay`, `config_loaded_relay`.

pub mod actor;
pub mod atom;
pub mod relay;

pub use actor::Actor;
pub use atom::Atom;
pub use relay::{Relay, relay};
