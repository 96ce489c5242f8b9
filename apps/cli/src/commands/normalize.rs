use std::path::PathBuf;

use anyhow::Context;
use cast_transcript::{RawTranscript, SplitConfig, TranscriptNormalizer, UuidIdGen, compact};

pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

pub fn run(args: Args, split: SplitConfig) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let raw = RawTranscript::from_json(&json)
        .with_context(|| format!("{} is not a transcript", args.input.display()))?;

    let utterances = raw.utterances.len();
    let words = raw.words.len();
    let transcript = TranscriptNormalizer::with_config(split, UuidIdGen).normalize(raw);

    let persisted = compact(&transcript);
    let body = if args.pretty {
        persisted.to_json_pretty()?
    } else {
        persisted.to_json()?
    };

    match &args.output {
        Some(path) => std::fs::write(path, format!("{body}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{body}"),
    }

    tracing::info!(
        utterances,
        words,
        segments = transcript.len(),
        "transcript_written"
    );
    Ok(())
}
