//! The engine's C call surface
//!
//! All engine functions use the C ABI and take the opaque handle as their
//! first parameter. [`EngineSymbols`] is the flat table of function pointers;
//! [`EngineLibrary`] owns that table together with the shared library it was
//! resolved from, so no pointer outlives its mapping.

use libloading::Library;
use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LibraryError, Result};

/// Opaque engine handle as seen by the C side
pub type RawHandle = *mut c_void;

/// `void* i18n_new(void)`
pub type CreateFn = unsafe extern "C" fn() -> RawHandle;
/// `void i18n_free(void*)`
pub type FreeFn = unsafe extern "C" fn(RawHandle);
/// `int i18n_load_txt_file(void*, const char* path, int strict)` and `i18n_load_txt`
pub type LoadFn = unsafe extern "C" fn(RawHandle, *const c_char, c_int) -> c_int;
/// `int i18n_reload(void*)`
pub type ReloadFn = unsafe extern "C" fn(RawHandle) -> c_int;
/// `int i18n_translate(void*, token, args, args_len, out_buf, buf_size)`
pub type TranslateFn = unsafe extern "C" fn(
    RawHandle,
    *const c_char,
    *const *const c_char,
    c_int,
    *mut c_char,
    c_int,
) -> c_int;
/// `int i18n_translate_plural(void*, token, count, args, args_len, out_buf, buf_size)`
pub type TranslatePluralFn = unsafe extern "C" fn(
    RawHandle,
    *const c_char,
    c_int,
    *const *const c_char,
    c_int,
    *mut c_char,
    c_int,
) -> c_int;
/// `int i18n_export_binary(void*, const char* path)`
pub type ExportFn = unsafe extern "C" fn(RawHandle, *const c_char) -> c_int;
/// `int copy(void*, char* out_buf, int buf_size)` used by every `_copy` getter
pub type CopyFn = unsafe extern "C" fn(RawHandle, *mut c_char, c_int) -> c_int;
/// `int i18n_find(void*, const char* query, char* out_buf, int buf_size)`
pub type FindFn = unsafe extern "C" fn(RawHandle, *const c_char, *mut c_char, c_int) -> c_int;
/// `int i18n_get_meta_plural_rule(void*)`
pub type PluralRuleFn = unsafe extern "C" fn(RawHandle) -> c_int;
/// `uint32_t i18n_abi_version(void)`
pub type VersionFn = unsafe extern "C" fn() -> u32;

/// Function pointer table for one engine implementation.
///
/// Required entries are plain function pointers; optional entries are
/// `None` when the engine does not export them.
#[derive(Clone, Copy)]
pub struct EngineSymbols {
    /// `i18n_new`
    pub create: CreateFn,
    /// `i18n_free`
    pub free: FreeFn,
    /// `i18n_load_txt_file`
    pub load_file: LoadFn,
    /// `i18n_translate`
    pub translate: TranslateFn,
    /// `i18n_translate_plural`
    pub translate_plural: TranslatePluralFn,
    /// `i18n_export_binary`
    pub export_binary: ExportFn,
    /// `i18n_last_error_copy`
    pub last_error_copy: CopyFn,
    /// `i18n_get_meta_locale_copy`
    pub meta_locale_copy: CopyFn,
    /// `i18n_get_meta_fallback_copy`
    pub meta_fallback_copy: CopyFn,
    /// `i18n_get_meta_note_copy`
    pub meta_note_copy: CopyFn,
    /// `i18n_get_meta_plural_rule`
    pub meta_plural_rule: PluralRuleFn,
    /// `i18n_load_txt`
    pub load_text: Option<LoadFn>,
    /// `i18n_reload`
    pub reload: Option<ReloadFn>,
    /// `i18n_print`
    pub print: Option<CopyFn>,
    /// `i18n_find`
    pub find: Option<FindFn>,
    /// `i18n_check`
    pub check: Option<CopyFn>,
    /// `i18n_abi_version`
    pub abi_version: Option<VersionFn>,
    /// `i18n_binary_version_supported_max`
    pub binary_version_max: Option<VersionFn>,
}

impl std::fmt::Debug for EngineSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSymbols")
            .field("load_text", &self.load_text.is_some())
            .field("reload", &self.reload.is_some())
            .field("print", &self.print.is_some())
            .field("find", &self.find.is_some())
            .field("check", &self.check.is_some())
            .field("abi_version", &self.abi_version.is_some())
            .field("binary_version_max", &self.binary_version_max.is_some())
            .finish_non_exhaustive()
    }
}

/// Resolve a required symbol and copy the function pointer out.
///
/// # Safety
/// `T` must match the symbol's real signature, and the returned pointer must
/// not be called after `library` is unloaded.
unsafe fn required<T: Copy>(library: &Library, path: &Path, symbol: &'static str) -> Result<T> {
    let name = format!("{}\0", symbol);
    match library.get::<T>(name.as_bytes()) {
        Ok(sym) => Ok(*sym),
        Err(_) => Err(LibraryError::SymbolNotFound {
            symbol,
            path: path.to_path_buf(),
        }
        .into()),
    }
}

/// Resolve an optional symbol.
///
/// # Safety
/// Same contract as [`required`].
unsafe fn optional<T: Copy>(library: &Library, symbol: &'static str) -> Option<T> {
    let name = format!("{}\0", symbol);
    match library.get::<T>(name.as_bytes()) {
        Ok(sym) => Some(*sym),
        Err(_) => {
            debug!(symbol, "Optional engine symbol not exported");
            None
        }
    }
}

impl EngineSymbols {
    /// Resolve every engine symbol from a loaded library.
    ///
    /// # Safety
    /// The library must implement the i18n engine ABI: each exported symbol
    /// must have exactly the signature of the corresponding type alias.
    pub unsafe fn resolve(library: &Library, path: &Path) -> Result<Self> {
        Ok(Self {
            create: required(library, path, "i18n_new")?,
            free: required(library, path, "i18n_free")?,
            load_file: required(library, path, "i18n_load_txt_file")?,
            translate: required(library, path, "i18n_translate")?,
            translate_plural: required(library, path, "i18n_translate_plural")?,
            export_binary: required(library, path, "i18n_export_binary")?,
            last_error_copy: required(library, path, "i18n_last_error_copy")?,
            meta_locale_copy: required(library, path, "i18n_get_meta_locale_copy")?,
            meta_fallback_copy: required(library, path, "i18n_get_meta_fallback_copy")?,
            meta_note_copy: required(library, path, "i18n_get_meta_note_copy")?,
            meta_plural_rule: required(library, path, "i18n_get_meta_plural_rule")?,
            load_text: optional(library, "i18n_load_txt"),
            reload: optional(library, "i18n_reload"),
            print: optional(library, "i18n_print"),
            find: optional(library, "i18n_find"),
            check: optional(library, "i18n_check"),
            abi_version: optional(library, "i18n_abi_version"),
            binary_version_max: optional(library, "i18n_binary_version_supported_max"),
        })
    }
}

/// A resolved engine call surface.
///
/// Either backed by a dynamically loaded library (kept mapped for the
/// lifetime of this value) or by statically linked functions.
pub struct EngineLibrary {
    symbols: EngineSymbols,
    path: Option<PathBuf>,
    _library: Option<Library>,
}

impl EngineLibrary {
    /// Load the engine shared library at `path` and resolve its symbols.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Loading runs the library's initializers; the caller chose the path.
        let library = unsafe { Library::new(path) }.map_err(|source| LibraryError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let symbols = unsafe { EngineSymbols::resolve(&library, path)? };
        debug!(path = %path.display(), symbols = ?symbols, "Engine library loaded");

        Ok(Self {
            symbols,
            path: Some(path.to_path_buf()),
            _library: Some(library),
        })
    }

    /// Wrap a table of statically linked engine functions.
    ///
    /// # Safety
    /// Every pointer in `symbols` must implement the documented engine
    /// contract and stay callable for the lifetime of the returned value.
    pub unsafe fn from_symbols(symbols: EngineSymbols) -> Self {
        Self {
            symbols,
            path: None,
            _library: None,
        }
    }

    /// The resolved function table
    pub fn symbols(&self) -> &EngineSymbols {
        &self.symbols
    }

    /// Path of the loaded library, `None` for statically linked engines
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for EngineLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineLibrary")
            .field("path", &self.path)
            .field("symbols", &self.symbols)
            .finish()
    }
}
