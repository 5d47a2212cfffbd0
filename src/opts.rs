use crate::output_type::OutputType;

/// Options that control how a conversion is performed.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (batch jobs, tests) can construct options programmatically
#[derive(Debug, Clone)]
pub struct Opts {
    /// `LINGUISTIC_TYPE_REF` of the orthographic tiers. Annotations on these
    /// tiers are time-aligned and become the utterance transcripts.
    pub orthographic_tier_type: String,

    /// `LINGUISTIC_TYPE_REF` of the phonetic tiers. Annotations on these
    /// tiers reference an orthographic annotation and feed the lexicon.
    pub phonetic_tier_type: String,

    /// Tiers whose `ANNOTATOR` matches an entry here are skipped entirely.
    ///
    /// The ORTOFON corpus adds machine-generated verification tiers under
    /// the `TransVer` annotator; those duplicate the human transcription.
    pub ignored_annotators: Vec<String>,

    /// Tiers whose `TIER_ID` starts with one of these prefixes are skipped.
    pub ignored_tier_prefixes: Vec<String>,

    /// Whether to replace digit runs in annotation values with a random
    /// anonymization code.
    ///
    /// Digits in ORTOFON transcripts mark redacted personal data, so this
    /// defaults to on. Turn it off only for corpora that use digits
    /// literally.
    pub anonymize_digits: bool,

    /// The desired output format for converted utterances.
    pub output_type: OutputType,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            orthographic_tier_type: "ortografický".to_string(),
            phonetic_tier_type: "fonetický".to_string(),
            ignored_annotators: vec!["TransVer".to_string()],
            ignored_tier_prefixes: vec!["JO".to_string(), "anom".to_string()],
            anonymize_digits: true,
            output_type: OutputType::DataDir,
        }
    }
}
