//! Shared path and sort utilities for tree walking

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Compare two names ordinally, ignoring case.
///
/// Each char is mapped through its simple uppercase form (chars whose uppercase
/// expands to several chars compare as themselves), then compared by code point.
/// The comparison never consults the locale. Bytes that are not valid UTF-8
/// take the lone-surrogate code point `U+DC00 + byte`, so every name is keyed
/// the same way and the order stays total.
pub fn compare_ordinal_ignore_case(a: &OsStr, b: &OsStr) -> Ordering {
    folded_units(a).cmp(folded_units(b))
}

const INVALID_BYTE_BASE: u32 = 0xDC00;

fn folded_units(name: &OsStr) -> impl Iterator<Item = u32> + '_ {
    name.as_encoded_bytes().utf8_chunks().flat_map(|chunk| {
        let valid = chunk.valid().chars().map(|c| u32::from(fold_char(c)));
        let invalid = chunk
            .invalid()
            .iter()
            .map(|&byte| INVALID_BYTE_BASE | u32::from(byte));
        valid.chain(invalid)
    })
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Sort sibling paths by name, ordinal and case-insensitive.
///
/// Names equal ignoring case ("a" and "A" on a case-sensitive filesystem) are
/// ordered by plain ordinal comparison so the result is deterministic.
pub fn sort_ordinal_ignore_case(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        let a_name = a.file_name().unwrap_or(a.as_os_str());
        let b_name = b.file_name().unwrap_or(b.as_os_str());
        compare_ordinal_ignore_case(a_name, b_name).then_with(|| a_name.cmp(b_name))
    });
}

/// Check whether `path` itself is a reparse point (symlink, junction, ...).
///
/// Never fails: a path that is missing or cannot be queried is not a reparse point.
pub fn is_reparse_point(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| metadata_is_reparse_point(&meta))
        .unwrap_or(false)
}

#[cfg(windows)]
fn metadata_is_reparse_point(meta: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;
    meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

#[cfg(not(windows))]
fn metadata_is_reparse_point(meta: &Metadata) -> bool {
    meta.file_type().is_symlink()
}

/// The immediate children of a directory, split and sorted.
#[derive(Debug, Default)]
pub struct Children {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// List a directory once, splitting entries into files and subdirectories.
///
/// A symlink whose target is a directory counts as a subdirectory (the walker
/// visits it as a reparse point). Everything else, dangling links included, is
/// a file. Both lists come back sorted by [`sort_ordinal_ignore_case`].
pub fn read_sorted_children(dir: &Path) -> io::Result<Children> {
    let mut children = Children::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        let is_dir = if file_type.is_symlink() {
            fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            file_type.is_dir()
        };

        if is_dir {
            children.dirs.push(path);
        } else {
            children.files.push(path);
        }
    }

    sort_ordinal_ignore_case(&mut children.files);
    sort_ordinal_ignore_case(&mut children.dirs);
    Ok(children)
}

/// Convert an absolute Windows path string to its extended-length (`\\?\`) form.
///
/// Returns `None` when the path is already verbatim or device-prefixed, or is
/// not an absolute drive or UNC path. Forward slashes are rewritten since the
/// verbatim form passes the string to the filesystem unparsed.
pub fn extended_length_form(path: &str) -> Option<String> {
    if path.starts_with(r"\\?\") || path.starts_with(r"\\.\") {
        return None;
    }

    if let Some(unc) = path.strip_prefix(r"\\") {
        if unc.is_empty() {
            return None;
        }
        return Some(format!(r"\\?\UNC\{}", unc.replace('/', r"\")));
    }

    let bytes = path.as_bytes();
    let is_drive_absolute = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/');

    is_drive_absolute.then(|| format!(r"\\?\{}", path.replace('/', r"\")))
}

/// Rewrite `path` in extended-length form where the platform has one.
///
/// On Windows this lets a walk reach past the 260-character path ceiling; the
/// path should already be absolute and normalized. Elsewhere the path is
/// returned unchanged.
pub fn to_extended_length(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        if let Some(extended) = path.to_str().and_then(extended_length_form) {
            return PathBuf::from(extended);
        }
    }
    path.to_path_buf()
}
