//! High-level API for running conversions with eafutils.
//!
//! We expose a single, ergonomic entry point (`Converter`) that wires up the
//! lower-level parsing, tier selection, tokenization, and encoding logic.
//!
//! The intent is:
//! - We construct the converter once with its options and anonymizer.
//! - We reuse it to convert one file or a whole corpus tree.
//! - Callers choose output format by passing the matching encoder.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::discover::find_eaf_files;
use crate::eaf::EafDocument;
use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::parser;
use crate::tokenize::Anonymizer;
use crate::utterance::utterances_from_document;
use crate::utterance_encoder::UtteranceEncoder;

/// Counts for a single converted file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStats {
    pub utterances: usize,
}

/// Counts for a whole conversion run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertStats {
    pub files: usize,
    pub utterances: usize,
}

/// The main high-level conversion entry point.
///
/// `Converter` owns the conversion options and the anonymization state, so
/// anonymization draws stay consistent across all files of one run.
///
/// Typical usage:
/// - Construct once.
/// - Call `convert_tree` (or `convert_file` repeatedly) with an encoder.
pub struct Converter {
    opts: Opts,
    anonymizer: Anonymizer,
}

impl Converter {
    pub fn new(opts: Opts) -> Self {
        Self::with_anonymizer(opts, Anonymizer::new())
    }

    /// Create a converter with an explicit anonymizer.
    ///
    /// Seeded anonymizers make corpus builds reproducible; tests rely on
    /// this too.
    pub fn with_anonymizer(opts: Opts, anonymizer: Anonymizer) -> Self {
        Self { opts, anonymizer }
    }

    /// Access the configured options.
    pub fn opts(&self) -> &Opts {
        &self.opts
    }

    /// Convert a single `.eaf` file, streaming its utterances into `encoder`.
    ///
    /// The caller is responsible for calling `encoder.close()` once all
    /// files of the run have been converted.
    pub fn convert_file(
        &mut self,
        path: &Path,
        encoder: &mut dyn UtteranceEncoder,
    ) -> Result<FileStats> {
        let xml = fs::read_to_string(path)
            .map_err(|err| Error::msg(format!("failed to read {}: {err}", path.display())))?;
        let doc = parser::parse_str(&xml)
            .map_err(|err| Error::msg(format!("{}: {err}", path.display())))?;

        let recording_id = recording_id_for(path)?;
        let media_path = media_path(&doc);

        let utterances = utterances_from_document(
            &doc,
            &self.opts,
            &mut self.anonymizer,
            &recording_id,
            media_path.as_deref(),
        )
        .map_err(|err| Error::msg(format!("{}: {err}", path.display())))?;

        for utterance in &utterances {
            encoder.write_utterance(utterance)?;
        }

        info!(
            file = %path.display(),
            utterances = utterances.len(),
            "converted"
        );

        Ok(FileStats {
            utterances: utterances.len(),
        })
    }

    /// Convert every `.eaf` file under `root`.
    ///
    /// Conversion fails fast: the first file that does not parse aborts the
    /// run, so a corpus build never silently loses sessions.
    pub fn convert_tree(
        &mut self,
        root: &Path,
        encoder: &mut dyn UtteranceEncoder,
    ) -> Result<ConvertStats> {
        let files = find_eaf_files(root)?;
        if files.is_empty() {
            warn!(root = %root.display(), "no .eaf files found");
        }

        let mut stats = ConvertStats::default();
        for file in &files {
            let file_stats = self.convert_file(file, encoder)?;
            stats.files += 1;
            stats.utterances += file_stats.utterances;
        }
        Ok(stats)
    }
}

/// The recording id of a source file: its stem.
fn recording_id_for(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| Error::msg(format!("cannot derive a recording id from {}", path.display())))
}

/// The audio path for a document, from its first media descriptor.
///
/// The relative URL is preferred: corpus trees move between machines, and
/// the absolute `MEDIA_URL` tends to point at the transcriber's desktop.
fn media_path(doc: &EafDocument) -> Option<String> {
    let descriptor = doc.media.first()?;
    if let Some(relative) = &descriptor.relative_media_url {
        return Some(relative.clone());
    }
    descriptor
        .media_url
        .as_ref()
        .map(|url| url.strip_prefix("file://").unwrap_or(url).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eaf::MediaDescriptor;

    #[test]
    fn recording_id_is_the_file_stem() -> Result<()> {
        assert_eq!(
            recording_id_for(Path::new("/corpus/session one.eaf"))?,
            "session one"
        );
        Ok(())
    }

    #[test]
    fn media_path_prefers_the_relative_url() {
        let doc = EafDocument {
            media: vec![MediaDescriptor {
                media_url: Some("file:///home/jana/rec1.wav".to_string()),
                relative_media_url: Some("./rec1.wav".to_string()),
                mime_type: None,
            }],
            ..EafDocument::default()
        };
        assert_eq!(media_path(&doc).as_deref(), Some("./rec1.wav"));
    }

    #[test]
    fn media_path_strips_the_file_scheme() {
        let doc = EafDocument {
            media: vec![MediaDescriptor {
                media_url: Some("file:///home/jana/rec1.wav".to_string()),
                relative_media_url: None,
                mime_type: None,
            }],
            ..EafDocument::default()
        };
        assert_eq!(media_path(&doc).as_deref(), Some("/home/jana/rec1.wav"));
    }

    #[test]
    fn media_path_is_none_without_descriptors() {
        assert_eq!(media_path(&EafDocument::default()), None);
    }
}
