//! In-memory model of the subset of the ELAN `.eaf` schema we consume.
//!
//! ELAN stores one annotation document per recording session. The pieces we
//! care about:
//! - the time order: a list of `TIME_SLOT`s mapping slot ids to milliseconds
//! - tiers: per-speaker annotation layers, tagged with a linguistic type
//! - annotations: time-aligned (`ALIGNABLE_ANNOTATION`) on the orthographic
//!   layers, and reference (`REF_ANNOTATION`) on the phonetic layers, the
//!   latter pointing back at an orthographic annotation id
//! - media descriptors from the header, which tell us which audio file the
//!   transcription belongs to

use std::collections::HashMap;

/// A fully parsed `.eaf` document.
#[derive(Debug, Default, Clone)]
pub struct EafDocument {
    /// Media descriptors from the document header, in document order.
    pub media: Vec<MediaDescriptor>,

    /// All time slots from the `TIME_ORDER` element, in document order.
    pub time_order: Vec<TimeSlot>,

    /// All tiers, in document order.
    pub tiers: Vec<Tier>,
}

/// A `MEDIA_DESCRIPTOR` entry from the document header.
#[derive(Debug, Default, Clone)]
pub struct MediaDescriptor {
    pub media_url: Option<String>,
    pub relative_media_url: Option<String>,
    pub mime_type: Option<String>,
}

/// A single `TIME_SLOT`.
///
/// ELAN permits unaligned slots: a slot may omit `TIME_VALUE` entirely, in
/// which case its position is only constrained by document order.
#[derive(Debug, Clone)]
pub struct TimeSlot {
    pub id: String,
    pub value_ms: Option<u64>,
}

/// A single annotation tier.
#[derive(Debug, Default, Clone)]
pub struct Tier {
    pub tier_id: String,
    pub linguistic_type: String,
    pub participant: Option<String>,
    pub annotator: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl Tier {
    /// The speaker code for this tier: the first whitespace-delimited token
    /// of the tier id (ORTOFON tier ids look like `"S1 ortografický"`).
    ///
    /// Returns `None` for an empty or all-whitespace tier id.
    pub fn speaker(&self) -> Option<&str> {
        self.tier_id.split_whitespace().next()
    }
}

/// An annotation inside a tier.
#[derive(Debug, Clone)]
pub enum Annotation {
    /// Time-aligned annotation: both ends reference a time slot.
    Alignable {
        id: String,
        start_slot: String,
        end_slot: String,
        value: String,
    },

    /// Reference annotation: points at another annotation instead of
    /// carrying its own timing.
    Ref {
        id: String,
        annotation_ref: String,
        value: String,
    },
}

impl Annotation {
    pub fn id(&self) -> &str {
        match self {
            Annotation::Alignable { id, .. } => id,
            Annotation::Ref { id, .. } => id,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Annotation::Alignable { value, .. } => value,
            Annotation::Ref { value, .. } => value,
        }
    }
}

impl EafDocument {
    /// Index the time order by slot id.
    pub fn time_slots_by_id(&self) -> HashMap<&str, &TimeSlot> {
        self.time_order
            .iter()
            .map(|slot| (slot.id.as_str(), slot))
            .collect()
    }

    /// Index the reference annotations of the given tiers by the annotation
    /// id they point at.
    ///
    /// This is the join used to attach a phonetic transcription to its
    /// orthographic annotation: the phonetic `REF_ANNOTATION`'s
    /// `ANNOTATION_REF` names the orthographic `ALIGNABLE_ANNOTATION`'s id.
    pub fn ref_annotations_by_ref<'a>(
        &'a self,
        tiers: impl IntoIterator<Item = &'a Tier>,
    ) -> HashMap<&'a str, &'a Annotation> {
        let mut by_ref = HashMap::new();
        for tier in tiers {
            for annotation in &tier.annotations {
                if let Annotation::Ref { annotation_ref, .. } = annotation {
                    by_ref.insert(annotation_ref.as_str(), annotation);
                }
            }
        }
        by_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_is_first_token_of_tier_id() {
        let tier = Tier {
            tier_id: "S1 ortografický".to_string(),
            ..Tier::default()
        };
        assert_eq!(tier.speaker(), Some("S1"));
    }

    #[test]
    fn speaker_of_blank_tier_id_is_none() {
        let tier = Tier {
            tier_id: "   ".to_string(),
            ..Tier::default()
        };
        assert_eq!(tier.speaker(), None);
    }

    #[test]
    fn ref_annotations_index_by_their_target() {
        let tier = Tier {
            tier_id: "S1 fonetický".to_string(),
            annotations: vec![Annotation::Ref {
                id: "a2".to_string(),
                annotation_ref: "a1".to_string(),
                value: "ahoj".to_string(),
            }],
            ..Tier::default()
        };
        let doc = EafDocument {
            tiers: vec![tier],
            ..EafDocument::default()
        };

        let by_ref = doc.ref_annotations_by_ref(&doc.tiers);
        assert_eq!(by_ref.get("a1").map(|a| a.value()), Some("ahoj"));
        assert!(by_ref.get("a2").is_none());
    }
}
