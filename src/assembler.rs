//! Timeline assembly and export

use crate::audio::mix::write_f32le;
use crate::audio::{decode_audio, AudioPcm, AudioTrack, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::encoder::ffmpeg::find_ffmpeg;
use crate::encoder::{create_encoder, AudioInput, EncoderConfig, Frame};
use crate::image_loader;
use crate::{Error, Result, SceneClip, DEFAULT_FPS};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for exporting a timeline
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Output file path
    pub output_path: PathBuf,
    /// Directory for intermediate files (the raw audio mix)
    pub scratch_dir: PathBuf,
    /// Frame rate
    pub fps: u32,
    /// Quality (0-100, where 100 is highest quality)
    pub quality: u8,
    /// Background music file, looped or trimmed to the timeline
    pub background_music: Option<PathBuf>,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Path to ffmpeg executable
    pub ffmpeg_path: Option<String>,
}

impl AssembleOptions {
    pub fn new(output_path: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            scratch_dir: scratch_dir.into(),
            fps: DEFAULT_FPS,
            quality: 55,
            background_music: None,
            music_volume: 0.3,
            ffmpeg_path: None,
        }
    }
}

/// Start offset of every clip on the timeline, in seconds
pub fn clip_starts(clips: &[SceneClip]) -> Vec<f64> {
    clips
        .iter()
        .scan(0.0, |acc, clip| {
            let start = *acc;
            *acc += clip.duration();
            Some(start)
        })
        .collect()
}

/// Total timeline duration in seconds
pub fn timeline_duration(clips: &[SceneClip]) -> f64 {
    clips.iter().map(SceneClip::duration).sum()
}

/// Output frame indices of every clip.
///
/// Clip boundaries are snapped to the frame grid of the whole timeline, so the
/// ranges are contiguous and together hold `round(timeline_duration * fps)` frames.
pub fn clip_frame_ranges(clips: &[SceneClip], fps: u32) -> Vec<Range<u64>> {
    let to_frame = |secs: f64| (secs * fps as f64).round() as u64;
    clips
        .iter()
        .zip(clip_starts(clips))
        .map(|(clip, start)| to_frame(start)..to_frame(start + clip.duration()))
        .collect()
}

/// Mix narration and background music into one soundtrack spanning the timeline.
///
/// Narration that fails to decode is skipped for its scene. Music that is
/// missing or fails to decode is skipped as a whole. Returns `None` when no
/// layer made it in.
pub fn build_soundtrack<D>(
    clips: &[SceneClip],
    background_music: Option<&Path>,
    music_volume: f32,
    decode: D,
) -> Option<AudioPcm>
where
    D: Fn(&Path) -> Result<AudioPcm>,
{
    let mut track = AudioTrack::new(timeline_duration(clips));

    for (i, (clip, start)) in clips.iter().zip(clip_starts(clips)).enumerate() {
        let Some(voice) = clip.narration() else {
            continue;
        };
        match decode(voice) {
            Ok(pcm) => {
                track.place(&pcm, start, clip.duration());
                debug!("Narration placed for scene {} at {:.2}s", i + 1, start);
            }
            Err(e) => warn!("Could not add voice to scene {}: {}", i + 1, e),
        }
    }

    match background_music {
        Some(music) if music.exists() => {
            info!("Adding background music...");
            let result = decode(music).and_then(|pcm| track.add_fitted(&pcm, music_volume));
            if let Err(e) = result {
                warn!("Could not add background music: {}", e);
            }
        }
        Some(music) => debug!("Background music {} not found, skipping", music.display()),
        None => {}
    }

    track.finish()
}

/// Concatenate clips in order, attach the soundtrack and export the final video.
///
/// Frames are sampled at `options.fps` from each clip in turn. Clips whose
/// size differs from the first clip are resized to match.
pub fn assemble(clips: &[SceneClip], options: &AssembleOptions) -> Result<PathBuf> {
    if clips.is_empty() {
        return Err(Error::InvalidInput("No scene clips provided".to_string()));
    }

    let ffmpeg = find_ffmpeg(options.ffmpeg_path.as_deref())?;
    let width = (clips[0].width() / 2) * 2;
    let height = (clips[0].height() / 2) * 2;

    info!("Combining {} clips...", clips.len());
    let soundtrack = build_soundtrack(
        clips,
        options.background_music.as_deref(),
        options.music_volume,
        |path| decode_audio(path, &ffmpeg),
    );

    let audio = match soundtrack {
        Some(pcm) => {
            let path = options.scratch_dir.join("mix.f32le");
            write_f32le(&pcm, &path)?;
            Some(AudioInput {
                path,
                sample_rate: MIX_SAMPLE_RATE,
                channels: MIX_CHANNELS,
            })
        }
        None => None,
    };

    let encoder_config = EncoderConfig {
        width,
        height,
        fps: options.fps,
        quality: options.quality,
        output_path: options.output_path.clone(),
        audio,
        ffmpeg_path: Some(ffmpeg),
    };

    info!("Exporting video to {}...", options.output_path.display());
    let mut encoder = create_encoder(encoder_config)?;

    let fps = options.fps as f64;
    let starts = clip_starts(clips);
    let ranges = clip_frame_ranges(clips, options.fps);

    for ((clip, start), frames) in clips.iter().zip(starts).zip(ranges) {
        for n in frames {
            let t = (n as f64 / fps - start).max(0.0);
            let mut image = clip.frame_at(t);
            if image.dimensions() != (width, height) {
                image = image_loader::resize(&image, width, height);
            }

            let frame = Frame {
                width,
                height,
                data: image.into_raw(),
            };
            encoder.encode(&frame)?;
        }
    }

    encoder.finish()?;

    info!("Video generated successfully: {}", options.output_path.display());
    Ok(options.output_path.clone())
}
