use std::io::Write;

use crate::Result;
use crate::utterance::Utterance;
use crate::utterance_encoder::UtteranceEncoder;

/// An `UtteranceEncoder` that writes utterances as a single JSON array.
///
/// Design:
/// - We stream output directly to a `Write` implementation to avoid buffering
///   all utterances in memory.
/// - The encoder is stateful so we can emit a well-formed JSON array incrementally.
///
/// Example output:
/// ```json
/// [
///   { "id": "S1-rec1-00001000-00002500", "speaker": "S1", "words": ["dobrý", "den"] }
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    /// The underlying writer we stream JSON into.
    w: W,

    /// Whether we have written the opening `[` of the JSON array.
    started: bool,

    /// Whether the next element will be the first element in the array.
    /// This lets us correctly place commas between elements.
    first: bool,

    /// Whether the encoder has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Create a new JSON array encoder that writes to the given writer.
    ///
    /// At creation time:
    /// - We have not written anything yet.
    /// - The JSON array is opened lazily on the first write or on close.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    /// Write the opening `[` of the JSON array if we have not already done so.
    ///
    /// We defer writing the opening bracket so that:
    /// - Empty output still results in valid JSON (`[]`)
    /// - We do not emit partial output unless an utterance is actually written
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> UtteranceEncoder for JsonArrayEncoder<W> {
    /// Serialize a single utterance and append it to the JSON array.
    fn write_utterance(&mut self, utterance: &Utterance) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write utterance: encoder is already closed",
            ));
        }

        // Ensure the JSON array has been started.
        self.start_if_needed()?;

        // Write a comma before every element except the first.
        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        // Stream the utterance directly into the writer as JSON.
        serde_json::to_writer(&mut self.w, utterance)?;

        // Flush so streaming consumers (stdout, pipes) see output promptly.
        self.w.flush()?;

        Ok(())
    }

    /// Finalize the JSON array and flush the underlying writer.
    ///
    /// This method is idempotent:
    /// - Calling `close()` multiple times is safe.
    /// - After closing, no further utterances may be written.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        // Ensure we still output a valid JSON array even if no utterances were written.
        self.start_if_needed()?;

        // Close the JSON array.
        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(id: &str, words: &[&str]) -> Utterance {
        Utterance {
            id: id.to_string(),
            speaker: "S1".to_string(),
            recording_id: "rec1".to_string(),
            media_path: None,
            start_seconds: 0.0,
            end_seconds: 1.0,
            words: words.iter().map(|w| w.to_string()).collect(),
            pronunciations: Vec::new(),
        }
    }

    #[test]
    fn json_array_close_without_utterances_emits_empty_array() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "[]");
        Ok(())
    }

    #[test]
    fn json_array_writes_valid_json_incrementally() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);

        enc.write_utterance(&utterance("u1", &["dobrý", "den"]))?;
        enc.write_utterance(&utterance("u2", &["ahoj"]))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        let parsed: serde_json::Value = serde_json::from_str(s)?;
        let arr = parsed.as_array().expect("expected JSON array");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["id"], "u1");
        assert_eq!(arr[1]["words"][0], "ahoj");
        Ok(())
    }

    #[test]
    fn json_array_close_is_idempotent() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "[]");
        Ok(())
    }

    #[test]
    fn json_array_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_utterance(&utterance("u1", &["nic"])).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
