use anyhow::Result;
use clap::Parser;

use std::io::{self, BufWriter};
use std::path::PathBuf;

use eafutils::convert::{ConvertStats, Converter};
use eafutils::data_dir::DataDirEncoder;
use eafutils::json_array_encoder::JsonArrayEncoder;
use eafutils::logging;
use eafutils::opts::Opts;
use eafutils::output_type::OutputType;
use eafutils::utterance_encoder::UtteranceEncoder;

fn main() -> Result<()> {
    logging::init();
    let params = get_params()?;

    let opts = Opts {
        orthographic_tier_type: params.ort_tier_type.clone(),
        phonetic_tier_type: params.fon_tier_type.clone(),
        anonymize_digits: !params.keep_digits,
        output_type: params.output_type.clone(),
        ..Opts::default()
    };
    let mut converter = Converter::new(opts);

    let stdout = io::stdout();
    let mut encoder: Box<dyn UtteranceEncoder> = match params.output_type {
        OutputType::DataDir => Box::new(DataDirEncoder::new(&params.out_dir)),
        OutputType::Json => Box::new(JsonArrayEncoder::new(BufWriter::new(stdout.lock()))),
    };

    let run_res = converter.convert_tree(&params.input, &mut *encoder);
    let close_res = encoder.close();

    let stats: ConvertStats = match (run_res, close_res) {
        (Ok(stats), Ok(())) => stats,
        (Ok(_), Err(close_err)) => return Err(close_err.into()),
        (Err(err), Ok(())) => return Err(err.into()),
        (Err(err), Err(close_err)) => {
            return Err(anyhow::Error::from(err).context(close_err));
        }
    };

    tracing::info!(
        files = stats.files,
        utterances = stats.utterances,
        "conversion finished"
    );
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "eaf2kaldi")]
#[command(about = "Convert ELAN .eaf transcriptions into Kaldi data directories")]
struct Params {
    /// An .eaf file, or a directory searched recursively.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Where the Kaldi data directory is written (data-dir output only).
    #[arg(short = 'o', long = "out-dir", default_value = "data")]
    pub out_dir: PathBuf,

    #[arg(
        short = 't',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::DataDir
    )]
    pub output_type: OutputType,

    /// LINGUISTIC_TYPE_REF of the orthographic tiers.
    #[arg(long = "ort-tier-type", default_value = "ortografický")]
    pub ort_tier_type: String,

    /// LINGUISTIC_TYPE_REF of the phonetic tiers.
    #[arg(long = "fon-tier-type", default_value = "fonetický")]
    pub fon_tier_type: String,

    /// Keep digit runs as-is instead of anonymizing them.
    #[arg(long = "keep-digits", default_value_t = false)]
    pub keep_digits: bool,
}

fn get_params() -> Result<Params> {
    let params = Params::parse();
    if !params.input.exists() {
        anyhow::bail!("input path does not exist: {}", params.input.display());
    }
    Ok(params)
}
