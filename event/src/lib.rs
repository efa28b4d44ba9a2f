//! Single-threaded broadcast queues.
//!
//! Every listener sees every event pushed after it was created, exactly once.
//! Events that all listeners have seen are dropped from the buffer.
//!
//! `Listener`'s should be wrapped inside of an `Rc` if multiple owners need
//! to read from the same cursor.

mod intern;
mod traits;

/// Contains the non-thread-safe, reference-counted API
pub mod nonts;

pub(crate) use crate::intern::ListenerKey;

pub use crate::{
    intern::Queue as RawEventQueue,
    nonts::{Listener as RcEventListener, Queue as RcEventQueue},
    traits::*,
};

pub mod prelude {
    pub use crate::traits::{Emitter as _, Listen as _, QueueInterfaceListable as _};
}
