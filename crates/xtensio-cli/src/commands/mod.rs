//! Command implementations.
//!
//! - [`build`] - production bundle and package
//! - [`dev`] - development bundle and browser launch
//! - [`inspect`] - print the assembled configuration
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod build;
pub mod dev;
pub mod inspect;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use inspect::execute as inspect_execute;
