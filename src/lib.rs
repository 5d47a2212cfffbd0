//! `eafutils` — a small, focused converter from ELAN `.eaf` transcriptions
//! to Kaldi data directories.
//!
//! This crate provides:
//! - Parsing of the `.eaf` XML subset used by spoken-corpus transcriptions
//! - Tier selection, tokenization, and digit anonymization
//! - Phone splitting for the pronunciation lexicon
//! - Pluggable output encoders (Kaldi data directory, JSON)
//!
//! The library is designed to be used by both CLI tools and batch corpus
//! builds, with an emphasis on clarity, deterministic output, and minimal
//! surprises.

// High-level API (most consumers should start here).
pub mod convert;
pub mod opts;

// The ELAN document model and its parser.
pub mod eaf;
pub mod parser;

// Transcript normalization.
pub mod phones;
pub mod tokenize;

// Utterance assembly.
pub mod utterance;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod utterance_encoder;

// Output encoders that serialize utterances into various formats.
pub mod data_dir;
pub mod json_array_encoder;

// Corpus discovery.
pub mod discover;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub mod error;

pub use error::{Error, Result};
