use std::path::PathBuf;

use anyhow::Context;
use cast_playback::SegmentIndex;
use cast_transcript::{
    RawTranscript, SequentialIdGen, SplitConfig, Timed, Transcript, TranscriptNormalizer,
};

const PREVIEW_CHARS: usize = 60;

pub struct Args {
    pub input: PathBuf,
    pub at: Option<i64>,
}

pub fn run(args: Args, split: SplitConfig) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    // Compact files parse as raw input with ids already set, and come back
    // from the normalizer unchanged.
    let raw = RawTranscript::from_json(&json)
        .with_context(|| format!("{} is not a transcript", args.input.display()))?;
    let transcript = TranscriptNormalizer::with_config(split, SequentialIdGen::new()).normalize(raw);

    println!("{}", render_table(&transcript));

    if let Some(at) = args.at {
        let index = SegmentIndex::new(&transcript);
        match index.active_at(at).and_then(|id| transcript.get(id)) {
            Some(segment) => println!("\n@{} -> {} {}", clock(at), segment.id, segment.text),
            None => println!("\n@{} -> (no segment)", clock(at)),
        }
    }

    Ok(())
}

fn render_table(transcript: &Transcript) -> String {
    let mut lines: Vec<String> = transcript
        .iter()
        .map(|u| {
            format!(
                "{:<12} {} {} {:>7}ms {:<10} {}",
                u.id,
                clock(u.start_ms),
                clock(u.end_ms),
                u.duration_ms(),
                u.speaker.as_deref().unwrap_or("-"),
                preview(&u.text),
            )
        })
        .collect();

    lines.push(format!(
        "{} segments, {}",
        transcript.len(),
        clock(transcript.duration_ms())
    ));
    lines.join("\n")
}

fn clock(ms: i64) -> String {
    let ms = ms.max(0);
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / 3_600_000,
        ms / 60_000 % 60,
        ms / 1_000 % 60,
        ms % 1_000
    )
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
