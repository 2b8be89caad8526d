#![forbid(unsafe_code)]

//! Modal Control Runtime
//!
//! Single-threaded change-notification primitives shared by the modal
//! lifecycle engine and the layers that render it.
//!
//! # Key Components
//!
//! - [`ListenerSet`] - Ordered set of callbacks with add/remove/fire-all
//! - [`Observable`] - Version-tracked value cell with subscriber callbacks
//! - [`ObservableReader`] - Read/subscribe-only view of an [`Observable`]
//! - [`Subscription`] - RAII guard that detaches a subscriber on drop
//!
//! # Role in Modal Control
//! `modal-core` builds its close delayer and close-start notifications on
//! [`ListenerSet`], and publishes the visible modal list through an
//! [`Observable`]. Rendering layers only ever see the [`ObservableReader`].

pub mod listeners;
pub mod reactive;

pub use listeners::{Listener, ListenerSet};
pub use reactive::{Observable, ObservableReader, Subscription};
