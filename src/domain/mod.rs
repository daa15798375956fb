//! Domain layer for the dropdown control.
//!
//! Core types independent of any host toolkit: the option model, hit-testing
//! geometry, and errors.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`geometry`]: Points, rectangles and the control boundary
//! - [`option`]: The [`Selectable`] contract and the bundled [`OptionItem`]

pub mod error;
pub mod geometry;
pub mod option;

pub use error::{DropdownError, Result};
pub use geometry::{Boundary, Point, Rect};
pub use option::{contains_ignore_case, option_key, OptionItem, Record, Selectable};
