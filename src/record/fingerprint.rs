//! Deterministic record identity.
//!
//! The identity is the hex SHA-1 of the record's canonical JSON encoding with
//! the identity itself cleared. `serde_json` writes struct fields in
//! declaration order and the empty enrichment fields are skipped, so equal
//! field values always produce equal bytes.

use sha1::{Digest, Sha1};

use super::types::Record;

/// Length of a hex encoded SHA-1 digest.
pub const FINGERPRINT_HEX_LEN: usize = 40;

/// Computes the fingerprint of `record`, ignoring its current `id`.
///
/// # Errors
///
/// Returns the `serde_json` error if the record cannot be encoded.
pub fn fingerprint(record: &Record) -> Result<String, serde_json::Error> {
    let mut hasher = Sha1::new();
    if record.id.is_empty() {
        serde_json::to_writer(HashWriter(&mut hasher), record)?;
    } else {
        let mut cleared = record.clone();
        cleared.id.clear();
        serde_json::to_writer(HashWriter(&mut hasher), &cleared)?;
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Adapts a digest to `io::Write` so records are hashed without an
/// intermediate buffer.
struct HashWriter<'a>(&'a mut Sha1);

impl std::io::Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Record {
    /// Sets `id` to the fingerprint of every other field.
    ///
    /// Must run after enrichment: enrichment changes the fields hashed here.
    pub fn generate_id(&mut self) -> Result<&str, serde_json::Error> {
        self.id.clear();
        self.id = fingerprint(self)?;
        Ok(&self.id)
    }
}
