//! Command handlers for CLI subcommands
//!
//! Catalog-based handlers receive an [`Engine`](i18n_bridge::Engine) that
//! already has the requested catalog loaded; see [`utils::open_with_catalog`].

mod check;
mod completions;
mod config;
mod dump;
mod export;
mod find;
mod info;
mod meta;
mod plural;
mod translate;
pub mod utils;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use dump::handle_dump;
pub use export::handle_export;
pub use find::handle_find;
pub use info::handle_info;
pub use meta::handle_meta;
pub use plural::handle_plural;
pub use translate::handle_translate;
