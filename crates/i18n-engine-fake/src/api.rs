//! Exported engine functions
//!
//! Every function follows the engine conventions: the opaque handle comes
//! first, text results are copied with the probe/fill convention (return the
//! full length, copy at most `buf_size - 1` bytes plus a NUL), and failures
//! return a negative code and set the per-engine error record.
//!
//! A few reserved tokens exist so tests can provoke boundary conditions:
//! - `__hold__` parks the probe at the global gate (see [`crate::hold_gate`])
//! - `__shifting__` reports a different length on fill than on probe
//! - `__latin1__` produces bytes that are not UTF-8

use std::borrow::Cow;
use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::boundary::{guarded, FAILURE};
use crate::catalog::Catalog;
use crate::control;

/// ABI version implemented by this engine
pub const ABI_VERSION: u32 = 1;

/// Newest binary catalog format written by [`i18n_export_binary`]
pub const BINARY_VERSION_SUPPORTED_MAX: u32 = 2;

/// Results at or above this size are refused with `RESULT_TOO_LARGE`
pub const RESULT_LIMIT: usize = 16 * 1024 * 1024;

const BINARY_MAGIC: &[u8; 4] = b"I18B";

#[derive(Default)]
struct State {
    catalog: Catalog,
    last_error: String,
    source: Option<(PathBuf, bool)>,
}

#[derive(Default)]
struct FakeEngine {
    state: Mutex<State>,
}

impl FakeEngine {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a regular call: count it and clear the error record
    fn begin(&self) -> MutexGuard<'_, State> {
        control::record_call();
        let mut state = self.lock();
        state.last_error.clear();
        state
    }
}

unsafe fn engine<'a>(ptr: *mut c_void) -> Option<&'a FakeEngine> {
    (ptr as *const FakeEngine).as_ref()
}

unsafe fn read_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy())
    }
}

unsafe fn read_args(args: *const *const c_char, len: c_int) -> Vec<String> {
    if args.is_null() || len <= 0 {
        return Vec::new();
    }
    (0..len as usize)
        .map(|i| read_str(*args.add(i)).map(Cow::into_owned).unwrap_or_default())
        .collect()
}

/// Copy `bytes` with the probe/fill convention
unsafe fn copy_out(bytes: &[u8], out: *mut c_char, size: c_int) -> c_int {
    if !out.is_null() && size > 0 {
        let n = bytes.len().min(size as usize - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), out.cast::<u8>(), n);
        *out.add(n) = 0;
    }
    bytes.len() as c_int
}

/// Copy a result, refusing oversized ones
unsafe fn copy_result(state: &mut State, bytes: &[u8], out: *mut c_char, size: c_int) -> c_int {
    if bytes.len() >= RESULT_LIMIT {
        state.last_error = "RESULT_TOO_LARGE".to_string();
        return FAILURE;
    }
    copy_out(bytes, out, size)
}

/// Create an engine
#[no_mangle]
pub unsafe extern "C" fn i18n_new() -> *mut c_void {
    guarded(std::ptr::null_mut(), || {
        control::record_create();
        Box::into_raw(Box::<FakeEngine>::default()).cast::<c_void>()
    })
}

/// Create function that always fails, for initialization tests
#[no_mangle]
pub unsafe extern "C" fn i18n_new_failing() -> *mut c_void {
    std::ptr::null_mut()
}

/// Free an engine created by [`i18n_new`]
#[no_mangle]
pub unsafe extern "C" fn i18n_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    guarded((), || {
        drop(Box::from_raw(ptr.cast::<FakeEngine>()));
        control::record_free();
    })
}

/// Copy the error record of the last failed call; does not clear it
#[no_mangle]
pub unsafe extern "C" fn i18n_last_error_copy(
    ptr: *mut c_void,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        control::record_call();
        let state = engine.lock();
        copy_out(state.last_error.as_bytes(), out, size)
    })
}

fn load(engine: &FakeEngine, source: &str, strict: bool, path: Option<PathBuf>) -> c_int {
    let mut state = engine.begin();
    match Catalog::parse(source, strict) {
        Ok(catalog) => {
            state.catalog = catalog;
            if let Some(path) = path {
                state.source = Some((path, strict));
            }
            0
        }
        Err(err) => {
            state.last_error = err.to_string();
            FAILURE
        }
    }
}

/// Load a catalog from text
#[no_mangle]
pub unsafe extern "C" fn i18n_load_txt(
    ptr: *mut c_void,
    text: *const c_char,
    strict: c_int,
) -> c_int {
    let (Some(engine), Some(text)) = (engine(ptr), read_str(text)) else {
        return FAILURE;
    };
    guarded(FAILURE, || load(engine, &text, strict != 0, None))
}

/// Load a catalog from a file
#[no_mangle]
pub unsafe extern "C" fn i18n_load_txt_file(
    ptr: *mut c_void,
    path: *const c_char,
    strict: c_int,
) -> c_int {
    let (Some(engine), Some(path)) = (engine(ptr), read_str(path)) else {
        return FAILURE;
    };
    guarded(FAILURE, || match std::fs::read(&*path) {
        Ok(bytes) => load(
            engine,
            &String::from_utf8_lossy(&bytes),
            strict != 0,
            Some(PathBuf::from(&*path)),
        ),
        Err(err) => {
            engine.begin().last_error = format!("cannot open {}: {}", path, err);
            FAILURE
        }
    })
}

/// Reload the last file loaded with [`i18n_load_txt_file`]
#[no_mangle]
pub unsafe extern "C" fn i18n_reload(ptr: *mut c_void) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let source = engine.begin().source.clone();
        let Some((path, strict)) = source else {
            engine.lock().last_error = "no catalog file loaded".to_string();
            return FAILURE;
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => load(engine, &text, strict, Some(path)),
            Err(err) => {
                engine.lock().last_error = format!("cannot open {}: {}", path.display(), err);
                FAILURE
            }
        }
    })
}

/// Translate a token with positional arguments
#[no_mangle]
pub unsafe extern "C" fn i18n_translate(
    ptr: *mut c_void,
    token: *const c_char,
    args: *const *const c_char,
    args_len: c_int,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    let (Some(engine), Some(token)) = (engine(ptr), read_str(token)) else {
        return FAILURE;
    };
    let args = read_args(args, args_len);
    guarded(FAILURE, || {
        if let Some(bytes) = reserved(&token, out.is_null()) {
            let mut state = engine.begin();
            return copy_result(&mut state, &bytes, out, size);
        }
        let mut state = engine.begin();
        match state.catalog.translate(&token, &args) {
            Some(text) => copy_result(&mut state, text.as_bytes(), out, size),
            None => {
                state.last_error = format!("unknown token '{}'", token);
                FAILURE
            }
        }
    })
}

/// Translate the plural form of a token
#[no_mangle]
pub unsafe extern "C" fn i18n_translate_plural(
    ptr: *mut c_void,
    token: *const c_char,
    count: c_int,
    args: *const *const c_char,
    args_len: c_int,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    let (Some(engine), Some(token)) = (engine(ptr), read_str(token)) else {
        return FAILURE;
    };
    let args = read_args(args, args_len);
    guarded(FAILURE, || {
        let mut state = engine.begin();
        match state.catalog.translate_plural(&token, count, &args) {
            Some(text) => copy_result(&mut state, text.as_bytes(), out, size),
            None => {
                state.last_error = format!("unknown token '{}'", token);
                FAILURE
            }
        }
    })
}

/// Results for reserved test tokens; `probe` is true for the length query
fn reserved(token: &str, probe: bool) -> Option<Vec<u8>> {
    match token {
        "__hold__" => {
            if probe {
                control::pass_gate();
            }
            Some(b"released".to_vec())
        }
        "__shifting__" if probe => Some(b"short".to_vec()),
        "__shifting__" => Some(b"considerably longer".to_vec()),
        "__latin1__" => Some(b"caf\xE9".to_vec()),
        _ => None,
    }
}

/// Copy a human-readable table of the catalog
#[no_mangle]
pub unsafe extern "C" fn i18n_print(ptr: *mut c_void, out: *mut c_char, size: c_int) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let mut state = engine.begin();
        let table = state.catalog.dump();
        copy_result(&mut state, table.as_bytes(), out, size)
    })
}

/// Copy all entries whose token or text contains `query`
#[no_mangle]
pub unsafe extern "C" fn i18n_find(
    ptr: *mut c_void,
    query: *const c_char,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    let (Some(engine), Some(query)) = (engine(ptr), read_str(query)) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let mut state = engine.begin();
        let hits = state.catalog.find(&query);
        copy_result(&mut state, hits.as_bytes(), out, size)
    })
}

/// Run the catalog self-check; returns the status and copies a truncated report
#[no_mangle]
pub unsafe extern "C" fn i18n_check(ptr: *mut c_void, out: *mut c_char, size: c_int) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let state = engine.begin();
        let (status, report) = state.catalog.check();
        copy_out(report.as_bytes(), out, size);
        status
    })
}

/// Write the catalog as a binary file
#[no_mangle]
pub unsafe extern "C" fn i18n_export_binary(ptr: *mut c_void, path: *const c_char) -> c_int {
    let (Some(engine), Some(path)) = (engine(ptr), read_str(path)) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let mut state = engine.begin();
        if state.catalog.is_empty() {
            state.last_error = "catalog is empty".to_string();
            return FAILURE;
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(BINARY_MAGIC);
        bytes.extend_from_slice(&BINARY_VERSION_SUPPORTED_MAX.to_le_bytes());
        bytes.extend_from_slice(&(state.catalog.entries.len() as u32).to_le_bytes());
        for (token, text) in &state.catalog.entries {
            for field in [token.as_bytes(), text.as_bytes()] {
                bytes.extend_from_slice(&(field.len() as u32).to_le_bytes());
                bytes.extend_from_slice(field);
            }
        }

        match std::fs::write(&*path, &bytes) {
            Ok(()) => 0,
            Err(err) => {
                state.last_error = format!("cannot write {}: {}", path, err);
                FAILURE
            }
        }
    })
}

unsafe fn copy_meta(
    ptr: *mut c_void,
    out: *mut c_char,
    size: c_int,
    field: fn(&Catalog) -> &str,
) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || {
        let mut state = engine.begin();
        let value = field(&state.catalog).to_string();
        copy_result(&mut state, value.as_bytes(), out, size)
    })
}

/// Copy the catalog locale
#[no_mangle]
pub unsafe extern "C" fn i18n_get_meta_locale_copy(
    ptr: *mut c_void,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    copy_meta(ptr, out, size, |catalog| catalog.locale.as_str())
}

/// Copy the catalog fallback locale
#[no_mangle]
pub unsafe extern "C" fn i18n_get_meta_fallback_copy(
    ptr: *mut c_void,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    copy_meta(ptr, out, size, |catalog| catalog.fallback.as_str())
}

/// Copy the catalog note
#[no_mangle]
pub unsafe extern "C" fn i18n_get_meta_note_copy(
    ptr: *mut c_void,
    out: *mut c_char,
    size: c_int,
) -> c_int {
    copy_meta(ptr, out, size, |catalog| catalog.note.as_str())
}

/// Plural rule code of the catalog, passed through unvalidated
#[no_mangle]
pub unsafe extern "C" fn i18n_get_meta_plural_rule(ptr: *mut c_void) -> c_int {
    let Some(engine) = engine(ptr) else {
        return FAILURE;
    };
    guarded(FAILURE, || engine.begin().catalog.plural_code)
}

/// ABI version
#[no_mangle]
pub unsafe extern "C" fn i18n_abi_version() -> u32 {
    ABI_VERSION
}

/// Newest supported binary catalog version
#[no_mangle]
pub unsafe extern "C" fn i18n_binary_version_supported_max() -> u32 {
    BINARY_VERSION_SUPPORTED_MAX
}
