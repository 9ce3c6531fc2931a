//! Reading and rewriting `key = "value"` assignments in the flake file.
//!
//! The file is never parsed as Nix; only the key/quoted-value shape matters.
//! Everything outside the quoted value is preserved byte-for-byte.

use regex::{Captures, Regex};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::error::UpdateError;

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// One key and the value it should be set to.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Matches `key = "value"` anywhere on a line, capturing the value.
fn value_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#"\b{}\s*=\s*"([^"]+)""#, regex::escape(key)))
        .expect("escaped key always forms a valid pattern")
}

/// Matches the leading whitespace, key and `=` (group 1) plus the quoted value.
fn assignment_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#"(\s*\b{}\s*=\s*)"[^"]*""#, regex::escape(key)))
        .expect("escaped key always forms a valid pattern")
}

/// Returns the value of the first `key = "value"` line in `path`.
pub fn read_version(path: &Path, key: &str) -> Result<String, UpdateError> {
    let file = fs::File::open(path).map_err(|e| UpdateError::io(path, e))?;
    let re = value_pattern(key);
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| UpdateError::io(path, e))?;
        if let Some(caps) = re.captures(&line) {
            return Ok(caps[1].to_string());
        }
    }
    Err(UpdateError::VersionNotFound {
        key: key.to_string(),
        path: path.to_path_buf(),
    })
}

/// Replace every quoted value assigned to `key`. Returns the new text and the
/// number of replacements.
pub fn rewrite(content: &str, key: &str, value: &str) -> (String, usize) {
    let re = assignment_pattern(key);
    let mut count = 0;
    let out = re.replace_all(content, |caps: &Captures| {
        count += 1;
        format!("{}\"{}\"", &caps[1], value)
    });
    (out.into_owned(), count)
}

/// Rewrite `fields` in `path` and write the result back atomically.
///
/// Every key must match at least once; otherwise nothing is written.
pub fn update_file(path: &Path, fields: &[Field<'_>]) -> Result<(), UpdateError> {
    let mut text = fs::read_to_string(path).map_err(|e| UpdateError::io(path, e))?;
    for field in fields {
        let (next, count) = rewrite(&text, field.key, field.value);
        if count == 0 {
            return Err(UpdateError::FieldNotFound {
                key: field.key.to_string(),
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(key = field.key, count, "rewrote field");
        text = next;
    }
    write_atomic(path, text.as_bytes())
}

/// Write via a temp file next to the real target, then rename over it.
///
/// Symlinks are resolved first so the link stays a link and its target gets
/// the new content. If the directory is not writable, the file is rewritten in
/// place instead.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), UpdateError> {
    let target = fs::canonicalize(path).map_err(|e| UpdateError::io(path, e))?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = match tempfile::NamedTempFile::new_in(dir) {
        Ok(tmp) => tmp,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::debug!("{} not writable, rewriting in place", dir.display());
            return write_in_place(&target, data);
        }
        Err(e) => return Err(UpdateError::io(dir, e)),
    };
    tmp.write_all(data).map_err(|e| UpdateError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| UpdateError::io(tmp.path(), e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(FILE_MODE))
            .map_err(|e| UpdateError::io(tmp.path(), e))?;
    }
    tmp.persist(&target)
        .map_err(|e| UpdateError::io(&target, e.error))?;
    Ok(())
}

fn write_in_place(target: &Path, data: &[u8]) -> Result<(), UpdateError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(target)
        .map_err(|e| UpdateError::io(target, e))?;
    file.write_all(data)
        .and_then(|()| file.sync_all())
        .map_err(|e| UpdateError::io(target, e))
}
