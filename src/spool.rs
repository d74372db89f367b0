// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Spool writer
//!
//! Oversized payloads are written to uniquely-named temp files and shipped
//! by reference. Files created here are persisted past the call: the
//! consumer reads them from the shared filesystem and owns their deletion.

use crate::archive::SelfSerializingArchive;
use crate::error::RelayError;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;
use tracing::debug;

const SPOOL_PREFIX: &str = "checkpoint-";

/// Write `bytes` to a new collision-free temp file tagged with `suffix`
/// and keep it on disk. Returns the absolute path.
pub(crate) fn spool(bytes: &[u8], suffix: &str) -> Result<PathBuf, RelayError> {
    let mut file = Builder::new()
        .prefix(SPOOL_PREFIX)
        .suffix(suffix)
        .tempfile()
        .map_err(RelayError::Spool)?;
    file.write_all(bytes).map_err(RelayError::Spool)?;

    let (_file, path) = file.keep().map_err(|e| RelayError::Spool(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "spooled payload");
    Ok(path)
}

/// Reserve a kept temp path and let the archive adapter fill it
pub(crate) fn spool_archive(
    archive: &dyn SelfSerializingArchive,
) -> Result<PathBuf, RelayError> {
    let file = Builder::new()
        .prefix(SPOOL_PREFIX)
        .suffix(archive.archive_suffix())
        .tempfile()
        .map_err(RelayError::Spool)?;
    let (_file, path) = file.keep().map_err(|e| RelayError::Spool(e.error))?;

    archive.write_archive(&path).map_err(RelayError::Archive)?;
    debug!(path = %path.display(), "spooled archive");
    Ok(path)
}
