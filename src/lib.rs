//! **qs-recolor** — push a wallpaper-generated palette into a Quickshell
//! color file and restart the shell.
//!
//! A run is strictly sequential:
//!
//! 1. [`palette`] reads the generator's `$name: value;` file.
//! 2. [`patcher`] rewrites the quoted value of every `property color m3…`
//!    declaration named by the fixed [`mapping`].
//! 3. [`restart`] stops the running shell and launches a fresh, detached
//!    instance.
//!
//! [`sync`] ties the steps together.
//!
//! # Architecture
//!
//! Process supervision goes through one trait,
//! [`traits::ProcessControl`], so the restart logic is not coupled to the
//! live process table.  The real backend lives in [`process`]; tests use a
//! recording double.

pub mod cli;
pub mod config;
pub mod mapping;
pub mod palette;
pub mod patcher;
pub mod process;
pub mod restart;
pub mod sync;
pub mod traits;
