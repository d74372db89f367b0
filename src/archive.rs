// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Self-serializing archive capability
//!
//! Array-backed dataset containers (NetCDF-style gridded data and friends)
//! are not inspected by the classifier. They opt in through this trait: the
//! relay asks the adapter to write a self-contained binary file and ships a
//! reference to that file. Archive payloads are always spooled; there is no
//! inline form for them, whatever their size.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Capability contract for dataset values that can serialize themselves
/// into a single self-contained archive file.
///
/// Implementors write the complete dataset to `path`; the relay owns the
/// file's lifetime from that point on (the consumer deletes it, not the
/// producer).
pub trait SelfSerializingArchive: Send + Sync {
    /// File suffix for the spooled archive
    fn archive_suffix(&self) -> &str {
        ".nc"
    }

    /// Write the dataset as a self-contained archive at `path`
    fn write_archive(&self, path: &Path) -> anyhow::Result<()>;
}

/// SHA-256 of a spooled archive file, hex-encoded.
///
/// The whole file is read back into memory; archive files are bounded by
/// what the adapter could materialize in the first place.
pub(crate) fn hash_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(digest))
}
