//! i18n-engine-fake - an in-process engine speaking the i18n token engine C ABI
//!
//! Built both as a `cdylib` (so it can be loaded by path like the real
//! engine) and as an `rlib` (so tests can link its functions directly into an
//! engine symbol table). It implements the boundary contract faithfully: the
//! probe/fill copy convention, the per-engine error record cleared by every
//! regular call, and status-code reports for `i18n_check`.
//!
//! It is deliberately small. Catalogs are `token = text` lines with `@`
//! directives for metadata; see [`catalog`].
//!
//! Test hooks:
//! - [`stats`] / [`reset_stats`]: process-global create, free and call counters
//! - [`hold_gate`] / [`release_gate`] / [`wait_for_held`]: park `__hold__`
//!   translations inside a boundary call

pub mod api;
mod boundary;
pub mod catalog;
mod control;

pub use api::*;
pub use control::{hold_gate, release_gate, reset_stats, stats, wait_for_held, Stats};
