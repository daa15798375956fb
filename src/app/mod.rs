//! Application layer: the dropdown's interaction state machine.
//!
//! # Architecture
//!
//! ```text
//! Host Input → Events → Event Handler → State Mutations → Actions → Host Effects
//!                           ↑                                  │
//!                           └──────── Lookup Completions ──────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transition coordinator
//! - [`lifecycle`]: Open/close state machine and outside-click subscription
//! - [`modes`]: Open state, keys and scroll policy enums
//! - [`state`]: The selection and filtering engine

pub mod actions;
pub mod handler;
pub mod lifecycle;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use lifecycle::{Lifecycle, ListenerId, ListenerRegistry, OutsideListener, PointerHub};
pub use modes::{Key, OpenState, ScrollBehavior, ScrollBlock};
pub use state::{ChangeCallback, Dropdown, Renderer};
