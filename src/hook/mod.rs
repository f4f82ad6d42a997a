//! Named-event dispatch for the frontier.
//!
//! Two layers carry queue events to extension code:
//! - a [`Dispatcher`] (by default [`EventDispatcher`]) with any number of
//!   listeners per event, invoked synchronously in attachment order
//! - a [`HookTable`] holding at most one override [`Hook`] per event name

mod dispatcher;
mod event;
mod table;

pub use dispatcher::{Dispatcher, EventDispatcher, Listener, ListenerId};
pub use event::FrontierEvent;
pub use table::{Hook, HookTable};
