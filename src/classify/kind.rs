// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Content kinds and their wire labels

use std::path::Path;

/// Inferred semantic category of a checkpoint value.
///
/// Drives both the MIME-style `dataType` label on the envelope and which
/// encoder path runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// The value is a path to an existing file; the consumer reads it in place
    FileReference,

    /// Structured record serialized as canonical JSON
    Json,

    /// Raw binary payload
    Binary,

    /// Delimited tabular text
    CsvText,

    /// Prose / unstructured text
    PlainText,

    /// Self-contained archive file written by a dataset adapter
    ArchiveBinary,

    /// Nothing recognizable; the envelope carries no payload
    Unknown,
}

impl ContentKind {
    /// Fixed MIME-style label.
    ///
    /// `FileReference` labels depend on the file name (see
    /// [`guess_file_label`]) and `Unknown` has no label at all, so both
    /// return `None` here.
    pub fn mime_label(&self) -> Option<&'static str> {
        match self {
            ContentKind::Json => Some("application/json"),
            ContentKind::Binary => Some("application/octet-stream"),
            ContentKind::CsvText => Some("text/csv"),
            ContentKind::PlainText => Some("text/plain"),
            ContentKind::ArchiveBinary => Some("application/x-netcdf"),
            ContentKind::FileReference | ContentKind::Unknown => None,
        }
    }

    /// Suffix for spooled temp files of this kind. Kinds that never reach
    /// the spool writer fall back to the generic binary suffix.
    pub fn spool_suffix(&self) -> &'static str {
        match self {
            ContentKind::Json => ".json",
            ContentKind::CsvText => ".csv",
            ContentKind::PlainText => ".txt",
            ContentKind::ArchiveBinary => ".nc",
            ContentKind::Binary | ContentKind::FileReference | ContentKind::Unknown => ".bin",
        }
    }
}

/// MIME label for a referenced file, guessed from its name, with the
/// historical `"binary"` fallback for anything unrecognized
pub(crate) fn guess_file_label(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| "binary".to_string())
}
