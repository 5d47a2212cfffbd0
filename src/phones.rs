//! Phone-level splitting of phonetic transcriptions.
//!
//! The phonetic tier writes each word as a run of phones (`"chroust"`), but
//! the Kaldi lexicon wants phones whitespace-separated (`"ch r ou s t"`).
//! Czech digraphs (`ch`, `ou`, `ʒʒ`) count as one phone and are re-joined
//! after the per-character split.

/// Words that are treated as atomic units rather than phone runs.
const ATOMIC_WORDS: [&str; 2] = ["hmm", "emm"];

/// Convert a single phonetically transcribed word to explicit,
/// whitespace-separated phones.
///
/// Returned unchanged (atomic): `hmm`, `emm`, and any word containing a
/// non-word character or an ASCII uppercase letter. Uppercase words are the
/// anonymization codes, which have no phonetic content.
pub fn split_phones(fon_word: &str) -> String {
    if is_atomic(fon_word) {
        return fon_word.to_string();
    }

    let mut spaced = String::with_capacity(fon_word.len() * 2);
    for (i, c) in fon_word.chars().enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    // Collapse digraphs back into single phones. Order matters: `ch`
    // before `ou` keeps words like "ouch" splitting as "ou ch".
    let spaced = spaced.replace("c h", "ch");
    let spaced = spaced.replace("o u", "ou");
    spaced.replace("ʒ ʒ", "ʒʒ")
}

fn is_atomic(word: &str) -> bool {
    if ATOMIC_WORDS.contains(&word) {
        return true;
    }
    word.chars()
        .any(|c| !(c.is_alphanumeric() || c == '_') || c.is_ascii_uppercase())
}
