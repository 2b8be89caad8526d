#![forbid(unsafe_code)]

//! Reactive state cells for modal-control.
//!
//! - [`Observable`]: a shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`ObservableReader`]: the read/subscribe half of an `Observable`, handed
//!   to collaborators that must never write.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per `set`/`update`.
//! 2. Subscribers are notified in registration order.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 4. After any `set` returns, every live subscriber has last observed the
//!    latest value, even when subscribers re-enter `set`.

pub mod observable;

pub use observable::{Observable, ObservableReader, Subscription};
