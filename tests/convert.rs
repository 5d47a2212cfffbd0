use std::fs;
use std::path::Path;

use eafutils::convert::Converter;
use eafutils::data_dir::DataDirEncoder;
use eafutils::json_array_encoder::JsonArrayEncoder;
use eafutils::opts::Opts;
use eafutils::tokenize::{ANOM_CODES, Anonymizer};
use eafutils::utterance_encoder::UtteranceEncoder;

const FIXTURE: &str = "tests/fixtures/ortofon_session.eaf";

fn converter() -> Converter {
    Converter::with_anonymizer(Opts::default(), Anonymizer::with_seed(11))
}

#[test]
fn converts_a_session_to_a_data_dir() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("data");
    let mut encoder = DataDirEncoder::new(&dir);

    let mut converter = converter();
    let stats = converter.convert_file(Path::new(FIXTURE), &mut encoder)?;
    encoder.close()?;

    // Three utterances survive: the TransVer, JO, and anom tiers are skipped.
    assert_eq!(stats.utterances, 3);

    let text = fs::read_to_string(dir.join("text"))?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "S1-ortofon_session-00000000-00001200 dobrý den");
    assert_eq!(
        lines[2],
        "S2-ortofon_session-00001200-00002600 no hluk jasně jasný"
    );

    // The digit run in the second S1 annotation is anonymized.
    let words: Vec<&str> = lines[1].split_whitespace().collect();
    assert_eq!(words[0], "S1-ortofon_session-00002600-00004100");
    assert_eq!(words[1], "bydlím");
    assert_eq!(words[2], "tam");
    assert!(ANOM_CODES.contains(&words[3]));
    assert_eq!(words[4], "let");

    let segments = fs::read_to_string(dir.join("segments"))?;
    assert_eq!(
        segments,
        "S1-ortofon_session-00000000-00001200 ortofon_session 0.000 1.200\n\
         S1-ortofon_session-00002600-00004100 ortofon_session 2.600 4.100\n\
         S2-ortofon_session-00001200-00002600 ortofon_session 1.200 2.600\n"
    );

    let utt2spk = fs::read_to_string(dir.join("utt2spk"))?;
    assert_eq!(
        utt2spk,
        "S1-ortofon_session-00000000-00001200 S1\n\
         S1-ortofon_session-00002600-00004100 S1\n\
         S2-ortofon_session-00001200-00002600 S2\n"
    );

    let wav_scp = fs::read_to_string(dir.join("wav.scp"))?;
    assert_eq!(wav_scp, "ortofon_session ./ortofon_session.wav\n");

    // Only the first S1 utterance has a phonetic annotation, so only its
    // words reach the lexicon.
    let lexicon = fs::read_to_string(dir.join("lexicon.txt"))?;
    assert_eq!(lexicon, "den d e n\ndobrý d o b r í\n");

    Ok(())
}

#[test]
fn converts_a_session_to_json() -> anyhow::Result<()> {
    let mut out = Vec::new();
    let mut encoder = JsonArrayEncoder::new(&mut out);

    let mut converter = converter();
    converter.convert_file(Path::new(FIXTURE), &mut encoder)?;
    encoder.close()?;

    let parsed: serde_json::Value = serde_json::from_slice(&out)?;
    let utterances = parsed.as_array().expect("expected JSON array");
    assert_eq!(utterances.len(), 3);

    assert_eq!(utterances[0]["id"], "S1-ortofon_session-00000000-00001200");
    assert_eq!(utterances[0]["speaker"], "S1");
    assert_eq!(utterances[0]["start_seconds"], 0.0);
    assert_eq!(utterances[0]["end_seconds"], 1.2);
    assert_eq!(utterances[0]["words"][1], "den");
    assert_eq!(utterances[0]["pronunciations"][0], "d o b r í");
    assert_eq!(utterances[0]["media_path"], "./ortofon_session.wav");

    // Document order, not sorted order: S2 overlaps between the S1 turns.
    assert_eq!(utterances[2]["speaker"], "S2");
    assert_eq!(utterances[2]["pronunciations"].as_array().unwrap().len(), 0);

    Ok(())
}

#[test]
fn convert_tree_walks_the_fixture_directory() -> anyhow::Result<()> {
    let mut out = Vec::new();
    let mut encoder = JsonArrayEncoder::new(&mut out);

    let mut converter = converter();
    let stats = converter.convert_tree(Path::new("tests/fixtures"), &mut encoder)?;
    encoder.close()?;

    assert_eq!(stats.files, 1);
    assert_eq!(stats.utterances, 3);
    Ok(())
}

#[test]
fn keep_digits_disables_anonymization() -> anyhow::Result<()> {
    let mut out = Vec::new();
    let mut encoder = JsonArrayEncoder::new(&mut out);

    let opts = Opts {
        anonymize_digits: false,
        ..Opts::default()
    };
    let mut converter = Converter::with_anonymizer(opts, Anonymizer::with_seed(11));
    converter.convert_file(Path::new(FIXTURE), &mut encoder)?;
    encoder.close()?;

    let parsed: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(parsed[1]["words"][2], "12");
    Ok(())
}

#[test]
fn missing_file_is_a_readable_error() {
    let mut out = Vec::new();
    let mut encoder = JsonArrayEncoder::new(&mut out);

    let mut converter = converter();
    let err = converter
        .convert_file(Path::new("tests/fixtures/missing.eaf"), &mut encoder)
        .unwrap_err();
    assert!(err.to_string().contains("missing.eaf"));
}
