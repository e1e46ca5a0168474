//! Domain events module.
//!
//! Services emit a [`DomainEvent`] after every successful mutation. The
//! runtime decides what an event means (a log line, a notification to the
//! responsible attorney, a websocket push).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
