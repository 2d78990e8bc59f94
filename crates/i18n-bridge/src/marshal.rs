//! Argument marshaling
//!
//! Converts Rust strings into the C representations the engine reads:
//! single NUL-terminated strings for tokens and paths, and an
//! [`ArgumentSet`] (owned C strings plus a pointer table) for argument lists.
//!
//! # Memory Safety
//!
//! - Every entry is a heap `CString`; its bytes never move while the set lives
//! - The pointer table is built once, after all entries exist
//! - Entries and table are released together when the set is dropped

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;

use crate::error::{Error, Result};

/// Anything that can stand in one slot of an argument list.
///
/// `None` marks an absent element; it is passed as an empty string.
pub trait MarshalArg {
    /// The text for this slot, `None` when absent
    fn as_arg(&self) -> Option<&str>;
}

impl MarshalArg for &str {
    fn as_arg(&self) -> Option<&str> {
        Some(self)
    }
}

impl MarshalArg for String {
    fn as_arg(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl MarshalArg for &String {
    fn as_arg(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl MarshalArg for Option<&str> {
    fn as_arg(&self) -> Option<&str> {
        *self
    }
}

impl MarshalArg for Option<String> {
    fn as_arg(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Encode one string as a C string, rejecting interior NULs.
pub fn encode_str(what: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|err| {
        Error::invalid_argument(
            what,
            format!("contains a NUL byte at offset {}", err.nul_position()),
        )
    })
}

/// Encode a filesystem path; the engine expects UTF-8 paths.
pub fn encode_path(what: &'static str, path: &Path) -> Result<CString> {
    let text = path.to_str().ok_or_else(|| {
        Error::invalid_argument(what, format!("{} is not valid UTF-8", path.display()))
    })?;
    encode_str(what, text)
}

/// Owned, address-stable argument list for a single boundary call.
///
/// # Example
///
/// ```
/// use i18n_bridge::ArgumentSet;
///
/// let args = ArgumentSet::marshal(["Ada", "3"]).unwrap();
/// assert_eq!(args.count(), 2);
/// assert!(!args.as_ptr().is_null());
/// // table and entries are released here
/// ```
#[derive(Debug, Default)]
pub struct ArgumentSet {
    entries: Vec<CString>,
    table: Vec<*const c_char>,
}

impl ArgumentSet {
    /// Marshal an ordered list of arguments.
    ///
    /// Fails with [`Error::InvalidArgument`] if any element contains a NUL
    /// byte or the list is too long for a C `int` count.
    pub fn marshal<I>(args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: MarshalArg,
    {
        let entries = args
            .into_iter()
            .map(|arg| encode_str("argument", arg.as_arg().unwrap_or("")))
            .collect::<Result<Vec<_>>>()?;

        if c_int::try_from(entries.len()).is_err() {
            return Err(Error::invalid_argument(
                "argument list",
                format!("{} entries exceed the C int range", entries.len()),
            ));
        }

        let table = entries.iter().map(|entry| entry.as_ptr()).collect();
        Ok(Self { entries, table })
    }

    /// Pointer table to pass as the `args` parameter; null when empty
    pub fn as_ptr(&self) -> *const *const c_char {
        if self.table.is_empty() {
            std::ptr::null()
        } else {
            self.table.as_ptr()
        }
    }

    /// Number of entries as the C `args_len` parameter
    pub fn count(&self) -> c_int {
        // checked in `marshal`
        self.table.len() as c_int
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The encoded entries, in order
    pub fn entries(&self) -> impl Iterator<Item = &CStr> {
        self.entries.iter().map(CString::as_c_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn read_table(set: &ArgumentSet) -> Vec<String> {
        (0..set.count() as usize)
            .map(|i| unsafe {
                let ptr = *set.as_ptr().add(i);
                assert!(!ptr.is_null());
                CStr::from_ptr(ptr).to_str().unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_empty_list_passes_null_table() {
        let set = ArgumentSet::marshal(crate::NO_ARGS).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.count(), 0);
        assert!(set.as_ptr().is_null());
    }

    #[test]
    fn test_absent_elements_become_empty_strings() {
        let set = ArgumentSet::marshal([Some("Ada"), None, Some("Lovelace")]).unwrap();
        assert_eq!(read_table(&set), vec!["Ada", "", "Lovelace"]);
    }

    #[test]
    fn test_owned_and_borrowed_inputs() {
        let owned = vec!["x".to_string(), "y".to_string()];
        let borrowed = ArgumentSet::marshal(&owned).unwrap();
        assert_eq!(read_table(&borrowed), vec!["x", "y"]);

        let moved = ArgumentSet::marshal(owned).unwrap();
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let err = ArgumentSet::marshal(["fine", "bro\0ken"]).unwrap_err();
        match err {
            Error::InvalidArgument { what, reason } => {
                assert_eq!(what, "argument");
                assert!(reason.contains("offset 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_utf8_path_is_rejected() {
        #[cfg(unix)]
        {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;
            let path = Path::new(OsStr::from_bytes(b"/tmp/\xFFcatalog.txt"));
            assert!(matches!(
                encode_path("catalog path", path),
                Err(Error::InvalidArgument { .. })
            ));
        }
        assert!(encode_path("catalog path", Path::new("locale/de.txt")).is_ok());
    }

    proptest! {
        #[test]
        fn prop_marshal_round_trips(
            input in proptest::collection::vec(proptest::option::of("\\PC{0,24}"), 0..16)
        ) {
            let set = ArgumentSet::marshal(input.iter().map(|s| s.as_deref())).unwrap();
            prop_assert_eq!(set.len(), input.len());
            prop_assert_eq!(set.count() as usize, input.len());

            let expected: Vec<String> = input
                .iter()
                .map(|s| s.clone().unwrap_or_default())
                .collect();
            if expected.is_empty() {
                prop_assert!(set.as_ptr().is_null());
            } else {
                prop_assert_eq!(read_table(&set), expected);
            }
        }
    }
}
