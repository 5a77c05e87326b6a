//! End-to-end tests for video generation
//!
//! These need ffmpeg with libx264 and aac and are skipped otherwise.

mod common;

use common::*;
use promptreel::narration::Narrator;
use promptreel::{
    CameraEffect, FrameSize, GeneratorConfig, VideoGenerator, VideoRequest, VisualEffect,
};
use std::path::Path;
use tempfile::TempDir;

/// AAC encoder priming and frame padding
const AUDIO_TOLERANCE: f64 = 0.15;

fn generator(dir: &Path) -> VideoGenerator {
    let config = GeneratorConfig {
        frame_size: FrameSize::new(160, 90),
        font_candidates: Vec::new(),
        ..GeneratorConfig::new(dir.join("generated_videos"))
    };
    VideoGenerator::with_narrator(config, Narrator::disabled()).unwrap()
}

/// Two silent scenes give a 10 second video-only file
#[test]
fn test_two_scenes_without_audio() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let generator = generator(temp_dir.path());

    let request = VideoRequest::new(["A", "B"])
        .scene_duration(5.0)
        .output_filename("silent.mp4");
    let path = generator.generate_video(&request).unwrap();

    assert_eq!(path, generator.output_dir().join("silent.mp4"));
    assert!(verify_file_exists_with_size(&path));

    let summary = inspect_mp4(&path);
    assert_eq!((summary.width, summary.height), (160, 90));
    assert_secs_near(summary.video_secs.unwrap(), 10.0, 0.05);
    assert!(summary.audio_secs.is_none());
}

/// Short music is looped to cover the whole timeline
#[test]
fn test_music_looped_to_video_length() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let music = temp_dir.path().join("music.wav");
    write_sine_wav(&music, 3.0, 440.0).unwrap();

    let generator = generator(temp_dir.path());
    let request = VideoRequest::new(["A", "B"])
        .scene_duration(5.0)
        .camera_effects([CameraEffect::Pan, CameraEffect::Static])
        .visual_effects([VisualEffect::Vignette, VisualEffect::Blur])
        .background_music(&music)
        .music_volume(0.3)
        .output_filename("looped.mp4");
    let path = generator.generate_video(&request).unwrap();

    let summary = inspect_mp4(&path);
    assert_secs_near(summary.video_secs.unwrap(), 10.0, 0.05);
    assert_secs_near(summary.audio_secs.unwrap(), 10.0, AUDIO_TOLERANCE);
}

/// Long music is trimmed to the timeline
#[test]
fn test_music_trimmed_to_video_length() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let music = temp_dir.path().join("long.wav");
    write_sine_wav(&music, 8.0, 220.0).unwrap();

    let generator = generator(temp_dir.path());
    let request = VideoRequest::new(["Only scene"])
        .scene_duration(3.0)
        .background_music(&music)
        .output_filename("trimmed.mp4");
    let path = generator.generate_video(&request).unwrap();

    let summary = inspect_mp4(&path);
    assert_secs_near(summary.video_secs.unwrap(), 3.0, 0.05);
    assert_secs_near(summary.audio_secs.unwrap(), 3.0, AUDIO_TOLERANCE);
}

/// Scene lengths off the frame grid keep video and audio the same length
#[test]
fn test_fractional_scene_durations_stay_in_sync() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let music = temp_dir.path().join("music.wav");
    write_sine_wav(&music, 2.0, 440.0).unwrap();

    let generator = generator(temp_dir.path());
    // 1.3 s is 31.2 frames at 24 fps
    let request = VideoRequest::new(["A", "B", "C"])
        .scene_duration(1.3)
        .camera_effects([CameraEffect::Static; 3])
        .background_music(&music)
        .output_filename("fractional.mp4");
    let path = generator.generate_video(&request).unwrap();

    let summary = inspect_mp4(&path);
    let video = summary.video_secs.unwrap();
    assert_secs_near(video, 94.0 / 24.0, 0.01);
    assert_secs_near(video, summary.audio_secs.unwrap(), 1.0 / 24.0 + AUDIO_TOLERANCE);
}

/// A missing music file and unavailable narration still produce a video
#[test]
fn test_optional_audio_degrades_gracefully() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let generator = generator(temp_dir.path());

    let request = VideoRequest::new(["A", "B"])
        .scene_duration(2.0)
        .text_overlays(["Hello\nworld"])
        .voice_over_texts(["Welcome.", "Goodbye."])
        .background_music(temp_dir.path().join("missing.mp3"))
        .output_filename("fallback.mp4");
    let path = generator.generate_video(&request).unwrap();

    let summary = inspect_mp4(&path);
    assert_secs_near(summary.video_secs.unwrap(), 4.0, 0.05);
    assert!(summary.audio_secs.is_none());
}

/// Scratch files are produced per scene and removed by cleanup
#[test]
fn test_cleanup_after_generation() {
    if !ffmpeg_available() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let music = temp_dir.path().join("music.wav");
    write_sine_wav(&music, 1.0, 330.0).unwrap();

    let generator = generator(temp_dir.path());
    let request = VideoRequest::new(["A", "B", "C"])
        .scene_duration(2.0)
        .background_music(&music)
        .output_filename("cleanup.mp4");
    let path = generator.generate_video(&request).unwrap();

    for i in 0..3 {
        assert!(generator.temp_dir().join(format!("scene_{}.png", i)).exists());
    }
    assert!(generator.temp_dir().join("mix.f32le").exists());

    // 3 stills and the audio mix
    assert_eq!(generator.cleanup_temp_files().unwrap(), 4);
    assert!(path.exists());
}
