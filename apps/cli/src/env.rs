use cast_playback::PlaybackConfig;
use cast_transcript::SplitConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Settings {
    pub split: SplitConfig,
    pub playback: PlaybackConfig,
}

/// Reads an optional `.env`, then `SEGMENT_*` and `PLAYBACK_*` variables.
/// Anything unset keeps its default.
pub fn load() -> anyhow::Result<Settings> {
    let _ = dotenvy::dotenv();

    Ok(Settings {
        split: envy::prefixed("SEGMENT_").from_env()?,
        playback: envy::prefixed("PLAYBACK_").from_env()?,
    })
}
