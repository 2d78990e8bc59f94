//! i18n-bridge - safe binding layer for the i18n token engine
//!
//! The engine lives behind a flat C ABI: an opaque handle plus a set of
//! `extern "C"` functions. This crate owns everything that has to be right on
//! our side of that boundary:
//!
//! - **Handle lifetime**: [`NativeResource`] creates the handle once and frees
//!   it at most once, never while a call is in flight.
//! - **Call guards**: every boundary call runs under a [`CallGuard`] that pins
//!   the handle alive for the duration of the call.
//! - **Buffer negotiation**: variable-length results are fetched with a
//!   probe-then-fill protocol so all allocation stays on the Rust side.
//! - **Argument marshaling**: string lists become a table of stable,
//!   NUL-terminated pointers that lives exactly as long as one call.
//!
//! [`Engine`] composes these into the public API.
//!
//! # Example
//!
//! ```no_run
//! use i18n_bridge::{Engine, EngineConfig, Result};
//!
//! fn example() -> Result<()> {
//!     let engine = Engine::open(&EngineConfig::default())?;
//!     engine.load_file("locale/de.txt", true)?;
//!     let text = engine.translate("greeting", ["Ada"])?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! # Safety
//!
//! All `unsafe` code is confined to the boundary modules. Callers of the
//! public API never handle raw pointers; the only unsafe entry point is
//! building an [`EngineSymbols`] table by hand, which asserts that the
//! function pointers follow the documented contract.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod loader;
pub mod marshal;
pub mod metadata;
pub mod negotiate;
pub mod resource;
pub mod symbols;

pub use config::EngineConfig;
pub use engine::{Engine, NO_ARGS};
pub use error::{Error, LibraryError, Result, SIZE_LIMIT_REASON};
pub use guard::CallGuard;
pub use marshal::{ArgumentSet, MarshalArg};
pub use metadata::{CheckReport, CheckStatus, EngineVersions, MetadataSnapshot, PluralRule};
pub use negotiate::{BufferNegotiator, NegotiationError, Phase};
pub use resource::NativeResource;
pub use symbols::{EngineLibrary, EngineSymbols, RawHandle};
