//! Rendering contract between the control and its host.
//!
//! The crate does not draw anything. It computes a [`DropdownView`] the host
//! turns into DOM nodes, terminal cells or widgets:
//!
//! ```text
//! Dropdown → view() → DropdownView → host renderer
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and their computation

pub mod viewmodel;

pub use viewmodel::{DropdownView, MenuBody, MenuView, OptionView, TriggerView};
