/// The supported output formats for converted utterances.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of output formats
///   across the CLI and library code.
/// - Using an enum avoids stringly-typed conditionals and keeps format
///   selection explicit and discoverable.
///
/// Integration notes:
/// - `ValueEnum` (under the `cli` feature) allows this enum to be used
///   directly as a CLI flag with `clap`.
/// - Each variant maps to a concrete `UtteranceEncoder` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Write a Kaldi data directory (`text`, `segments`, `utt2spk`,
    /// `wav.scp`, `lexicon.txt`).
    DataDir,

    /// Output utterances as a JSON array.
    Json,
}
