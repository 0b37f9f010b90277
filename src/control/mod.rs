//! Control building blocks, leaf-first.
//!
//! ```text
//!  raw codes ──▶ convert ──▶ signals ──▶ mode ──▶ pid ──▶ output ──▶ pump
//! ```
//!
//! Nothing in here touches hardware or shared state; the
//! [`Controller`](crate::controller::Controller) sequences these pieces
//! once per tick.

pub mod convert;
pub mod mode;
pub mod output;
pub mod pid;
pub mod signals;
