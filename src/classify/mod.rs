// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Content classification
//!
//! Decides what a checkpoint value *is* before anything touches the wire:
//! an existing file, a structured record, an archive-capable dataset, raw
//! binary, delimited text, or prose. First match wins, and an existing file
//! path beats every other reading of the same string, including strings
//! whose content would parse as JSON.
//!
//! Classification never fails on content: anything unrecognizable degrades
//! to `Unknown` with an empty payload. Only filesystem and archive-adapter
//! errors surface, because those abort the checkpoint itself.

pub mod classifier;
pub mod kind;
pub mod sniff;

pub use classifier::Classification;
pub use kind::ContentKind;

pub(crate) use classifier::classify;
