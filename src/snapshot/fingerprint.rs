//! Content fingerprints using blake3.
//!
//! A fingerprint covers everything that matters for the published object:
//! a format-version tag, the cache-control value, the content-type value,
//! and the hash of the body bytes. Identical inputs always produce the same
//! fingerprint; changing any one of them changes it.

use std::fmt;

/// Bumped whenever the fingerprint input layout changes, so stale remote
/// metadata never compares equal to a fresh computation.
const FORMAT_VERSION: &[u8] = b"stasis-v1";

/// A short hex content fingerprint, stored as remote object metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of (cache-control, content-type, body).
    pub fn compute(body: &[u8], content_type: Option<&str>, cache_control: Option<&str>) -> Self {
        let body_hash = blake3::hash(body);

        let mut hasher = blake3::Hasher::new();
        hasher.update(FORMAT_VERSION);
        update_optional(&mut hasher, cache_control);
        update_optional(&mut hasher, content_type);
        hasher.update(body_hash.as_bytes());

        Self(hex::encode(&hasher.finalize().as_bytes()[..8]))
    }

    /// Wrap a fingerprint read back from remote metadata.
    pub fn from_metadata(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash an optional header value, keeping `None` distinct from `Some("")`.
fn update_optional(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(&[1]);
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
    hasher.update(&[0xff]);
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
