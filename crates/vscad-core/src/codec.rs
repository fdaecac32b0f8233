//! Name codec for storage-safe identifiers.
//!
//! Virtual Satellite names and uuids may contain spaces, dashes and dots,
//! none of which are allowed in document or object names of the host. The
//! codec maps them onto runs of underscores:
//!
//! | Input | Encoded |
//! |-------|---------|
//! | `_`   | `__`    |
//! | `-`   | `___`   |
//! | ` `   | `____`  |
//! | `.`   | `_____` |
//!
//! Decoding applies the inverse substitutions from the longest run to the
//! shortest. Inputs whose escaped runs touch each other (for example `_-`)
//! cannot be told apart from a longer run and do not round-trip. The same
//! holds at the `_` between name and uuid: a name ending or a uuid starting
//! with an escaped character merges its run with the separator.

use crate::errors::{ModelError, Result};

const UNDERSCORE: &str = "__";
const DASH: &str = "___";
const SPACE: &str = "____";
const DOT: &str = "_____";

/// Encode a free-form identifier into the restricted alphabet.
pub fn encode_name(name: &str) -> String {
    name.replace('_', UNDERSCORE)
        .replace('-', DASH)
        .replace(' ', SPACE)
        .replace('.', DOT)
}

/// Decode an identifier produced by [`encode_name`].
pub fn decode_name(encoded: &str) -> String {
    encoded
        .replace(DOT, ".")
        .replace(SPACE, " ")
        .replace(DASH, "-")
        .replace(UNDERSCORE, "_")
}

/// Build a `<prefix><name>_<uuid>` unique name with both parts encoded.
pub fn unique_name(prefix: &str, name: &str, uuid: &str) -> String {
    format!("{}{}_{}", prefix, encode_name(name), encode_name(uuid))
}

/// Split a unique name back into its decoded name and uuid.
///
/// The separator is the last underscore run of length exactly one. Escaped
/// runs are two or more characters long, but one touching the separator
/// absorbs it, so `Sat-` with uuid `u` yields no separator at all. Callers
/// that need exact identities read them from an attribute table instead.
pub fn split_unique_name(prefix: &str, unique: &str) -> Result<(String, String)> {
    let body = unique
        .strip_prefix(prefix)
        .ok_or_else(|| ModelError::InvalidUniqueName {
            name: unique.to_string(),
            reason: format!("expected prefix '{}'", prefix),
        })?;

    let separator = find_separator(body).ok_or_else(|| ModelError::InvalidUniqueName {
        name: unique.to_string(),
        reason: "no name/uuid separator".to_string(),
    })?;

    let (name, uuid) = (&body[..separator], &body[separator + 1..]);
    if name.is_empty() || uuid.is_empty() {
        return Err(ModelError::InvalidUniqueName {
            name: unique.to_string(),
            reason: "empty name or uuid".to_string(),
        });
    }

    Ok((decode_name(name), decode_name(uuid)))
}

fn find_separator(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'_' {
                i += 1;
            }
            if i - start == 1 {
                found = Some(start);
            }
        } else {
            i += 1;
        }
    }
    found
}
