//! Kaldi data-directory output.
//!
//! A Kaldi data directory is a set of whitespace-delimited text tables, all
//! sorted by their first field:
//!
//! - `text` — `<utt-id> <word>...`
//! - `segments` — `<utt-id> <recording-id> <start> <end>` (seconds)
//! - `utt2spk` — `<utt-id> <speaker>`
//! - `wav.scp` — `<recording-id> <audio path>`
//! - `lexicon.txt` — `<word> <phone>...`
//!
//! Utterances arrive in document order, which is not sorted order, and the
//! lexicon can only be finished once every utterance has been seen. The
//! encoder therefore accumulates everything and writes the directory on
//! `close`.

use std::collections::{BTreeMap, BTreeSet, btree_map};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::utterance::Utterance;
use crate::utterance_encoder::UtteranceEncoder;

/// An `UtteranceEncoder` that writes a Kaldi data directory.
pub struct DataDirEncoder {
    dir: PathBuf,

    /// Utterance tables keyed by utterance id; `BTreeMap` gives us the
    /// sorted order Kaldi requires for free.
    utterances: BTreeMap<String, UttRecord>,

    /// Recording id → audio path, first descriptor seen wins.
    recordings: BTreeMap<String, String>,

    /// Word → set of phone strings. A word heard with several
    /// pronunciations gets one lexicon line per pronunciation.
    lexicon: BTreeMap<String, BTreeSet<String>>,

    closed: bool,
}

struct UttRecord {
    recording_id: String,
    speaker: String,
    start_seconds: f64,
    end_seconds: f64,
    transcript: String,
}

impl DataDirEncoder {
    /// Create an encoder that will write into `dir` on `close`.
    ///
    /// Nothing touches the filesystem until `close`; a conversion that
    /// fails midway leaves no partial directory behind.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            utterances: BTreeMap::new(),
            recordings: BTreeMap::new(),
            lexicon: BTreeMap::new(),
            closed: false,
        }
    }

    fn write_table<I, F>(&self, name: &str, rows: I, mut format_row: F) -> Result<()>
    where
        I: IntoIterator,
        F: FnMut(&mut BufWriter<File>, I::Item) -> std::io::Result<()>,
    {
        let path = self.dir.join(name);
        let file = File::create(&path)
            .map_err(|err| Error::msg(format!("failed to create {}: {err}", path.display())))?;
        let mut w = BufWriter::new(file);
        for row in rows {
            format_row(&mut w, row)?;
        }
        w.flush()?;
        Ok(())
    }
}

impl UtteranceEncoder for DataDirEncoder {
    fn write_utterance(&mut self, utterance: &Utterance) -> Result<()> {
        if self.closed {
            return Err(Error::msg(
                "cannot write utterance: encoder is already closed",
            ));
        }

        let record = UttRecord {
            recording_id: utterance.recording_id.clone(),
            speaker: utterance.speaker.clone(),
            start_seconds: utterance.start_seconds,
            end_seconds: utterance.end_seconds,
            transcript: utterance.words.join(" "),
        };

        match self.utterances.entry(utterance.id.clone()) {
            btree_map::Entry::Occupied(_) => {
                return Err(Error::msg(format!(
                    "duplicate utterance id {}",
                    utterance.id
                )));
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }

        self.recordings
            .entry(utterance.recording_id.clone())
            .or_insert_with(|| {
                utterance
                    .media_path
                    .clone()
                    .unwrap_or_else(|| format!("{}.wav", utterance.recording_id))
            });

        if !utterance.pronunciations.is_empty() {
            for (word, phones) in utterance.words.iter().zip(&utterance.pronunciations) {
                self.lexicon
                    .entry(word.clone())
                    .or_default()
                    .insert(phones.clone());
            }
        }

        Ok(())
    }

    /// Write all five tables. Idempotent; the first call does the work.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|err| {
            Error::msg(format!(
                "failed to create data directory {}: {err}",
                self.dir.display()
            ))
        })?;

        self.write_table("text", &self.utterances, |w, (id, record)| {
            writeln!(w, "{id} {}", record.transcript)
        })?;

        self.write_table("segments", &self.utterances, |w, (id, record)| {
            writeln!(
                w,
                "{id} {} {:.3} {:.3}",
                record.recording_id, record.start_seconds, record.end_seconds
            )
        })?;

        self.write_table("utt2spk", &self.utterances, |w, (id, record)| {
            writeln!(w, "{id} {}", record.speaker)
        })?;

        self.write_table("wav.scp", &self.recordings, |w, (recording_id, path)| {
            writeln!(w, "{recording_id} {path}")
        })?;

        self.write_table("lexicon.txt", &self.lexicon, |w, (word, pronunciations)| {
            for phones in pronunciations {
                writeln!(w, "{word} {phones}")?;
            }
            Ok(())
        })?;

        debug!(
            dir = %self.dir.display(),
            utterances = self.utterances.len(),
            recordings = self.recordings.len(),
            lexicon_words = self.lexicon.len(),
            "wrote data directory"
        );

        self.closed = true;
        Ok(())
    }
}
