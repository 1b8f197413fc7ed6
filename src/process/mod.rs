//! Operating-system backends for [`ProcessControl`](crate::traits::ProcessControl).
//!
//! Nothing outside this module should touch the process table directly.

pub mod system;
