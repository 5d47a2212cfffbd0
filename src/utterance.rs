//! Timed, speaker-attributed utterances assembled from a parsed document.
//!
//! This is the pivot between the ELAN model and the Kaldi output: each
//! orthographic alignable annotation becomes one utterance, with its timing
//! resolved through the time order and its phonetic transcription joined on
//! via the reference-annotation link.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::eaf::{Annotation, EafDocument, Tier, TimeSlot};
use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::phones::split_phones;
use crate::tokenize::{Anonymizer, kaldi_tokenize};

/// One converted utterance.
#[derive(Debug, Serialize, Clone)]
pub struct Utterance {
    /// Unique id, `{speaker}-{recording}-{start_ms}-{end_ms}`.
    ///
    /// Kaldi sorts its tables by utterance id and expects ids to share a
    /// prefix with their speaker id, so the speaker comes first.
    pub id: String,

    /// Speaker code, taken from the tier id.
    pub speaker: String,

    /// Recording id, taken from the source file stem.
    pub recording_id: String,

    /// Path of the recording's audio file, when the document names one.
    pub media_path: Option<String>,

    pub start_seconds: f64,
    pub end_seconds: f64,

    /// Orthographic transcript words, already tokenized for Kaldi.
    pub words: Vec<String>,

    /// Phone strings parallel to `words` (`"ch r ou s t"` per word), or
    /// empty when the phonetic tier is absent or could not be paired
    /// word-for-word.
    pub pronunciations: Vec<String>,
}

/// Whether a tier is excluded from conversion regardless of its type.
fn tier_is_ignored(tier: &Tier, opts: &Opts) -> bool {
    if let Some(annotator) = &tier.annotator {
        if opts.ignored_annotators.iter().any(|a| a == annotator) {
            return true;
        }
    }
    opts.ignored_tier_prefixes
        .iter()
        .any(|prefix| tier.tier_id.starts_with(prefix.as_str()))
}

fn tiers_of_type<'a>(
    doc: &'a EafDocument,
    opts: &'a Opts,
    linguistic_type: &'a str,
) -> impl Iterator<Item = &'a Tier> {
    doc.tiers
        .iter()
        .filter(move |tier| tier.linguistic_type == linguistic_type)
        .filter(move |tier| !tier_is_ignored(tier, opts))
}

/// Resolve a time-slot reference to milliseconds.
///
/// A dangling reference is a structural error. A slot without a time value
/// is legal ELAN (unaligned annotation) and resolves to `None`.
fn resolve_ms(
    slots: &HashMap<&str, &TimeSlot>,
    slot_ref: &str,
    annotation_id: &str,
) -> Result<Option<u64>> {
    let slot = slots.get(slot_ref).ok_or_else(|| {
        Error::msg(format!(
            "annotation {annotation_id} references unknown time slot {slot_ref}"
        ))
    })?;
    Ok(slot.value_ms)
}

/// Assemble all utterances of a parsed document, in document order.
pub fn utterances_from_document(
    doc: &EafDocument,
    opts: &Opts,
    anonymizer: &mut Anonymizer,
    recording_id: &str,
    media_path: Option<&str>,
) -> Result<Vec<Utterance>> {
    let slots = doc.time_slots_by_id();
    let fon_by_ref =
        doc.ref_annotations_by_ref(tiers_of_type(doc, opts, &opts.phonetic_tier_type));

    let mut utterances = Vec::new();
    for tier in tiers_of_type(doc, opts, &opts.orthographic_tier_type) {
        let Some(speaker) = tier.speaker() else {
            warn!(tier_id = %tier.tier_id, "skipping tier with blank tier id");
            continue;
        };

        for annotation in &tier.annotations {
            // Orthographic tiers carry alignable annotations only; anything
            // else has no timing and cannot become an utterance.
            let Annotation::Alignable {
                id,
                start_slot,
                end_slot,
                value,
            } = annotation
            else {
                continue;
            };

            let start_ms = resolve_ms(&slots, start_slot, id)?;
            let end_ms = resolve_ms(&slots, end_slot, id)?;
            let (Some(start_ms), Some(end_ms)) = (start_ms, end_ms) else {
                warn!(annotation = %id, "skipping unaligned annotation (time slot without value)");
                continue;
            };
            if end_ms <= start_ms {
                warn!(annotation = %id, start_ms, end_ms, "skipping annotation with empty time span");
                continue;
            }

            let anon = if opts.anonymize_digits {
                Some(&mut *anonymizer)
            } else {
                None
            };
            let words = kaldi_tokenize(value, anon);
            if words.is_empty() {
                continue;
            }

            let pronunciations = match fon_by_ref.get(id.as_str()) {
                Some(fon) => {
                    let anon = if opts.anonymize_digits {
                        Some(&mut *anonymizer)
                    } else {
                        None
                    };
                    let fon_words = kaldi_tokenize(fon.value(), anon);
                    if fon_words.len() == words.len() {
                        fon_words.iter().map(|word| split_phones(word)).collect()
                    } else {
                        warn!(
                            annotation = %id,
                            orthographic = words.len(),
                            phonetic = fon_words.len(),
                            "phonetic and orthographic word counts differ; dropping pronunciations"
                        );
                        Vec::new()
                    }
                }
                None => Vec::new(),
            };

            utterances.push(Utterance {
                id: format!("{speaker}-{recording_id}-{start_ms:08}-{end_ms:08}"),
                speaker: speaker.to_string(),
                recording_id: recording_id.to_string(),
                media_path: media_path.map(str::to_owned),
                start_seconds: start_ms as f64 / 1000.0,
                end_seconds: end_ms as f64 / 1000.0,
                words,
                pronunciations,
            });
        }
    }

    Ok(utterances)
}
