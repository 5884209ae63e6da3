//! `domus-app` — composition root and application services.
//!
//! Wires the session, the notification center, the event bus and the
//! per-domain registries into one explicitly-owned [`AppContext`], and exposes
//! the role-gated services the screens talk to. Every mutating operation here
//! checks authorization *before* touching a registry and reports its outcome
//! through the notification center.

pub mod context;
pub mod events;
pub mod guard;
pub mod registry;
pub mod seed;
pub mod services;

pub use context::AppContext;
pub use events::AppEvent;
pub use registry::Registry;
