use std::{
    borrow::Cow,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use log::debug;

const FILE_SCHEME: &str = "file://";

/// Converts a player location (`file://` URI or bare path) into a local filesystem path.
///
/// Returns `None` for empty locations, for other schemes such as network streams and for
/// `file://` URIs naming a remote host.
pub fn location_to_path(location: &str) -> Option<PathBuf> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    let Some(rest) = location.strip_prefix(FILE_SCHEME) else {
        if location.contains("://") {
            return None;
        }
        return Some(native_path(location));
    };

    let (authority, encoded_path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
        debug!("Location names remote host {}: {}", authority, location);
        return None;
    }
    if encoded_path.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode_binary(encoded_path.as_bytes()).into_owned();
    let path = decoded_path(decoded);
    if path.is_none() {
        debug!("Cannot decode file location: {}", location);
    }
    path
}

#[cfg(unix)]
fn decoded_path(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStringExt;

    Some(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn decoded_path(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(|text| native_path(&text))
}

#[cfg(windows)]
fn native_path(raw: &str) -> PathBuf {
    let bytes = raw.as_bytes();
    let without_root_slash = if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' {
        &raw[1..]
    } else {
        raw
    };
    PathBuf::from(without_root_slash.replace('/', "\\"))
}

#[cfg(not(windows))]
fn native_path(raw: &str) -> PathBuf {
    PathBuf::from(raw)
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().replace('\\', "/").into_bytes())
}

/// Builds a `file://` URI for a local path. Bytes that are not valid UTF-8 are
/// percent-encoded as is.
pub fn path_to_location(path: &Path) -> String {
    let bytes = path_bytes(path);
    let encoded: Vec<Cow<'_, str>> = bytes
        .split(|byte| *byte == b'/')
        .map(|segment| {
            let is_drive =
                segment.len() == 2 && segment[0].is_ascii_alphabetic() && segment[1] == b':';
            if is_drive {
                String::from_utf8_lossy(segment)
            } else {
                urlencoding::encode_binary(segment)
            }
        })
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("{FILE_SCHEME}{joined}")
    } else {
        format!("{FILE_SCHEME}/{joined}")
    }
}

/// Lists regular files directly inside `directory` whose extension equals `extension`,
/// sorted by file name. Subdirectories are neither returned nor descended into.
pub fn collect_sibling_files(
    directory: &Path,
    extension: Option<&OsStr>,
) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(
                    "Failed to read a directory entry in {}: {}",
                    directory.display(),
                    err
                );
                continue;
            }
        };

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                debug!("Failed to inspect {}: {}", path.display(), err);
                continue;
            }
        };

        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && path.extension() == extension {
            files.push(path);
        }
    }

    files.sort_unstable_by(|left, right| left.file_name().cmp(&right.file_name()));
    Ok(files)
}
