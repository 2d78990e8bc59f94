//! The engine facade
//!
//! [`Engine`] is the only type most callers need. Each operation follows the
//! same path: encode inputs, enter a [`CallGuard`](crate::CallGuard), make the
//! boundary calls (negotiated where the result has variable length), read the
//! error record if the engine failed, leave the guard, release the inputs.
//!
//! Everything that happens inside one guard belongs to one logical operation,
//! so a concurrent [`Engine::close`] can never split a probe from its fill or
//! a failure from its error record.

use std::os::raw::{c_char, c_int};
use std::path::Path;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::loader;
use crate::marshal::{encode_path, encode_str, ArgumentSet, MarshalArg};
use crate::metadata::{CheckReport, CheckStatus, EngineVersions, MetadataSnapshot, PluralRule};
use crate::negotiate::BufferNegotiator;
use crate::resource::NativeResource;
use crate::symbols::{CopyFn, EngineLibrary, EngineSymbols, RawHandle};

/// Empty argument list for [`Engine::translate`] and [`Engine::translate_plural`]
pub const NO_ARGS: [&str; 0] = [];

/// A live translation engine session.
///
/// `Engine` is `Send + Sync`; share it by reference or `Arc`. Calls are not
/// serialized against each other, only against disposal.
pub struct Engine {
    // Field order matters: the handle is freed before the library unmaps.
    resource: NativeResource,
    symbols: EngineSymbols,
    negotiator: BufferNegotiator,
    library: EngineLibrary,
}

impl Engine {
    /// Locate and load the engine library, then create a session.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let library = loader::open_library(config)?;
        Self::with_library(library, config)
    }

    /// Create a session on an already resolved library.
    pub fn with_library(library: EngineLibrary, config: &EngineConfig) -> Result<Self> {
        let symbols = *library.symbols();

        match (config.expected_abi_version, symbols.abi_version) {
            (Some(expected), Some(abi_version)) => {
                let actual = unsafe { abi_version() };
                if actual != expected {
                    return Err(Error::InitializationFailed {
                        reason: format!(
                            "engine ABI version {} does not match expected version {}",
                            actual, expected
                        ),
                    });
                }
            }
            (Some(expected), None) => {
                warn!(expected, "Engine does not export i18n_abi_version, skipping ABI check");
            }
            (None, _) => {}
        }

        let resource = NativeResource::create(symbols.create, symbols.free)?;
        info!(
            library = ?library.path(),
            max_result_bytes = config.max_result_bytes,
            "Translation engine opened"
        );

        Ok(Self {
            resource,
            symbols,
            negotiator: BufferNegotiator::new(config.max_result_bytes),
            library,
        })
    }

    /// Load a text catalog from a file.
    ///
    /// In strict mode the engine rejects malformed lines instead of skipping them.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_file(&self, path: impl AsRef<Path>, strict: bool) -> Result<()> {
        let path = path.as_ref();
        let c_path = encode_path("catalog path", path)?;
        let load = self.symbols.load_file;

        self.resource.with_call(|handle| {
            let rc = unsafe { load(handle, c_path.as_ptr(), c_int::from(strict)) };
            trace!(rc, "i18n_load_txt_file returned");
            if rc != 0 {
                return Err(Error::LoadFailed {
                    source_name: path.display().to_string(),
                    detail: self.read_error_record(handle),
                });
            }
            debug!("Catalog loaded");
            Ok(())
        })
    }

    /// Load a text catalog from memory.
    #[instrument(skip(self, catalog), fields(bytes = catalog.len()))]
    pub fn load_str(&self, catalog: &str, strict: bool) -> Result<()> {
        let load = self.symbols.load_text.ok_or(Error::Unsupported {
            symbol: "i18n_load_txt",
        })?;
        let c_catalog = encode_str("catalog text", catalog)?;

        self.resource.with_call(|handle| {
            let rc = unsafe { load(handle, c_catalog.as_ptr(), c_int::from(strict)) };
            trace!(rc, "i18n_load_txt returned");
            if rc != 0 {
                return Err(Error::LoadFailed {
                    source_name: "<memory>".to_string(),
                    detail: self.read_error_record(handle),
                });
            }
            Ok(())
        })
    }

    /// Re-read the last loaded catalog file with its original strictness.
    #[instrument(skip(self))]
    pub fn reload(&self) -> Result<()> {
        let reload = self.symbols.reload.ok_or(Error::Unsupported {
            symbol: "i18n_reload",
        })?;

        self.resource.with_call(|handle| {
            let rc = unsafe { reload(handle) };
            trace!(rc, "i18n_reload returned");
            if rc != 0 {
                return Err(Error::LoadFailed {
                    source_name: "<reload>".to_string(),
                    detail: self.read_error_record(handle),
                });
            }
            Ok(())
        })
    }

    /// Translate `token`, substituting positional arguments.
    ///
    /// ```no_run
    /// # use i18n_bridge::{Engine, EngineConfig, NO_ARGS};
    /// # let engine = Engine::open(&EngineConfig::default()).unwrap();
    /// let plain = engine.translate("greeting", NO_ARGS)?;
    /// let named = engine.translate("welcome", ["Ada", "Lovelace"])?;
    /// # Ok::<(), i18n_bridge::Error>(())
    /// ```
    #[instrument(skip(self, args))]
    pub fn translate<I>(&self, token: &str, args: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: MarshalArg,
    {
        let c_token = encode_str("token", token)?;
        let args = ArgumentSet::marshal(args)?;
        let translate = self.symbols.translate;

        self.resource.with_call(|handle| {
            self.negotiate_text(
                handle,
                "i18n_translate",
                |buf, size| unsafe {
                    translate(handle, c_token.as_ptr(), args.as_ptr(), args.count(), buf, size)
                },
                |detail| Error::TranslationFailed {
                    token: token.to_string(),
                    detail,
                },
            )
        })
    }

    /// Translate the plural form of `token` selected for `count`.
    #[instrument(skip(self, args))]
    pub fn translate_plural<I>(&self, token: &str, count: i32, args: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: MarshalArg,
    {
        let c_token = encode_str("token", token)?;
        let args = ArgumentSet::marshal(args)?;
        let translate_plural = self.symbols.translate_plural;

        self.resource.with_call(|handle| {
            self.negotiate_text(
                handle,
                "i18n_translate_plural",
                |buf, size| unsafe {
                    translate_plural(
                        handle,
                        c_token.as_ptr(),
                        count,
                        args.as_ptr(),
                        args.count(),
                        buf,
                        size,
                    )
                },
                |detail| Error::TranslationFailed {
                    token: token.to_string(),
                    detail,
                },
            )
        })
    }

    /// Write the loaded catalog in the engine's binary format.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn export_binary(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let c_path = encode_path("export path", path)?;
        let export = self.symbols.export_binary;

        self.resource.with_call(|handle| {
            let rc = unsafe { export(handle, c_path.as_ptr()) };
            trace!(rc, "i18n_export_binary returned");
            if rc != 0 {
                return Err(Error::ExportFailed {
                    path: path.to_path_buf(),
                    detail: self.read_error_record(handle),
                });
            }
            Ok(())
        })
    }

    /// Catalog locale
    pub fn locale(&self) -> Result<String> {
        let copy = self.symbols.meta_locale_copy;
        self.resource
            .with_call(|handle| self.copy_text(handle, "i18n_get_meta_locale_copy", copy))
    }

    /// Catalog fallback locale
    pub fn fallback(&self) -> Result<String> {
        let copy = self.symbols.meta_fallback_copy;
        self.resource
            .with_call(|handle| self.copy_text(handle, "i18n_get_meta_fallback_copy", copy))
    }

    /// Catalog note
    pub fn note(&self) -> Result<String> {
        let copy = self.symbols.meta_note_copy;
        self.resource
            .with_call(|handle| self.copy_text(handle, "i18n_get_meta_note_copy", copy))
    }

    /// Catalog plural rule; unknown codes map to [`PluralRule::Unknown`]
    pub fn plural_rule(&self) -> Result<PluralRule> {
        let rule = self.symbols.meta_plural_rule;
        self.resource
            .with_call(|handle| Ok(PluralRule::from_raw(unsafe { rule(handle) })))
    }

    /// Read all metadata of the loaded catalog under a single guard.
    #[instrument(skip(self))]
    pub fn metadata(&self) -> Result<MetadataSnapshot> {
        let symbols = self.symbols;
        self.resource.with_call(|handle| {
            Ok(MetadataSnapshot {
                locale: self.copy_text(
                    handle,
                    "i18n_get_meta_locale_copy",
                    symbols.meta_locale_copy,
                )?,
                fallback: self.copy_text(
                    handle,
                    "i18n_get_meta_fallback_copy",
                    symbols.meta_fallback_copy,
                )?,
                note: self.copy_text(handle, "i18n_get_meta_note_copy", symbols.meta_note_copy)?,
                plural_rule: PluralRule::from_raw(unsafe { (symbols.meta_plural_rule)(handle) }),
            })
        })
    }

    /// Current error record, `None` when empty.
    ///
    /// Most callers never need this: failures already carry the record.
    pub fn last_error(&self) -> Result<Option<String>> {
        let copy = self.symbols.last_error_copy;
        self.resource.with_call(|handle| {
            let text = self
                .negotiator
                .text(|buf, size| unsafe { copy(handle, buf, size) })
                .map_err(|err| Error::from_negotiation("i18n_last_error_copy", err))?;
            Ok(Some(text).filter(|text| !text.is_empty()))
        })
    }

    /// Human-readable table of the loaded catalog
    #[instrument(skip(self))]
    pub fn dump(&self) -> Result<String> {
        let print = self.symbols.print.ok_or(Error::Unsupported {
            symbol: "i18n_print",
        })?;
        self.resource
            .with_call(|handle| self.copy_text(handle, "i18n_print", print))
    }

    /// Search tokens, labels and texts for `query` (case-insensitive)
    #[instrument(skip(self))]
    pub fn find(&self, query: &str) -> Result<String> {
        let find = self.symbols.find.ok_or(Error::Unsupported {
            symbol: "i18n_find",
        })?;
        let c_query = encode_str("query", query)?;

        self.resource.with_call(|handle| {
            self.negotiate_text(
                handle,
                "i18n_find",
                |buf, size| unsafe { find(handle, c_query.as_ptr(), buf, size) },
                |detail| Error::QueryFailed {
                    call: "i18n_find",
                    detail,
                },
            )
        })
    }

    /// Run the engine's catalog self-check
    #[instrument(skip(self))]
    pub fn check(&self) -> Result<CheckReport> {
        let check = self.symbols.check.ok_or(Error::Unsupported {
            symbol: "i18n_check",
        })?;

        self.resource.with_call(|handle| {
            match self
                .negotiator
                .bounded_report(|buf, size| unsafe { check(handle, buf, size) })
            {
                Ok((code, report)) => {
                    let status = CheckStatus::from_code(code);
                    debug!(%status, bytes = report.len(), "Catalog check finished");
                    Ok(CheckReport { status, report })
                }
                Err(err) if err.is_rejection() => Err(Error::QueryFailed {
                    call: "i18n_check",
                    detail: self.read_error_record(handle),
                }),
                Err(err) => Err(Error::from_negotiation("i18n_check", err)),
            }
        })
    }

    /// Versions reported by the engine library. Does not touch the handle.
    pub fn versions(&self) -> EngineVersions {
        EngineVersions {
            abi: self.symbols.abi_version.map(|f| unsafe { f() }),
            binary_format_max: self.symbols.binary_version_max.map(|f| unsafe { f() }),
        }
    }

    /// Free the engine handle; waits for in-flight calls. Idempotent.
    pub fn close(&self) {
        self.resource.free();
    }

    /// Whether the session still accepts calls
    pub fn is_open(&self) -> bool {
        self.resource.is_valid()
    }

    /// Number of boundary calls currently executing
    pub fn in_flight(&self) -> usize {
        self.resource.in_flight()
    }

    /// Path of the loaded engine library, if loaded dynamically
    pub fn library_path(&self) -> Option<&Path> {
        self.library.path()
    }

    /// Negotiated text from a plain `_copy` getter, under the caller's guard
    fn copy_text(&self, handle: RawHandle, call: &'static str, copy: CopyFn) -> Result<String> {
        self.negotiate_text(
            handle,
            call,
            |buf, size| unsafe { copy(handle, buf, size) },
            |detail| Error::QueryFailed { call, detail },
        )
    }

    /// Run the probe/fill protocol, mapping rejections through `on_reject`
    /// with the error record read immediately afterwards.
    fn negotiate_text<F, E>(
        &self,
        handle: RawHandle,
        call: &'static str,
        native: F,
        on_reject: E,
    ) -> Result<String>
    where
        F: FnMut(*mut c_char, c_int) -> c_int,
        E: FnOnce(Option<String>) -> Error,
    {
        match self.negotiator.text(native) {
            Ok(text) => {
                trace!(call, len = text.len(), "Negotiated result");
                Ok(text)
            }
            Err(err) if err.is_rejection() => {
                let detail = self.read_error_record(handle);
                debug!(call, %err, detail = ?detail, "Engine rejected call");
                Err(on_reject(detail))
            }
            Err(err) => {
                warn!(call, %err, "Engine protocol violation");
                Err(Error::from_negotiation(call, err))
            }
        }
    }

    /// Fetch the error record right after a failed call. Never fails: an
    /// unreadable record is logged and reported as absent.
    fn read_error_record(&self, handle: RawHandle) -> Option<String> {
        let copy = self.symbols.last_error_copy;
        match self
            .negotiator
            .text(|buf, size| unsafe { copy(handle, buf, size) })
        {
            Ok(text) if text.is_empty() => None,
            Ok(text) => Some(text),
            Err(err) => {
                warn!(%err, "Could not read engine error record");
                None
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.resource.is_valid() {
            debug!("Closing translation engine on drop");
            self.resource.free();
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("resource", &self.resource)
            .field("library", &self.library.path())
            .field("max_result_bytes", &self.negotiator.max_len())
            .finish()
    }
}
