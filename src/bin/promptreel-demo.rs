//! Generates a six-scene demo video into `generated_videos/`

use promptreel::clip::FADE_SECS;
use promptreel::{CameraEffect, GeneratorConfig, VideoGenerator, VideoRequest, VisualEffect};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

const PROMPTS: [&str; 6] = [
    "A serene mountain landscape at sunrise with golden light",
    "A bustling futuristic city with flying cars and neon lights",
    "An underwater coral reef teeming with colorful fish",
    "A cozy coffee shop with warm lighting and books on shelves",
    "A peaceful zen garden with cherry blossoms falling",
    "A dramatic storm over an ocean with lightning strikes",
];

const TEXT_OVERLAYS: [&str; 6] = [
    "Our journey begins in the mountains,\nwhere peace meets adventure",
    "The future awaits with endless\npossibilities and new discoveries",
    "Deep beneath the waves,\nlife thrives in vibrant colors",
    "Finding comfort in simple moments,\nwhere stories come alive",
    "Nature's beauty reminds us to\nstay calm and centered",
    "Even in chaos, there is power\nand breathtaking beauty",
];

const VOICE_OVERS: [&str; 6] = [
    "Welcome to a journey through different worlds.",
    "Each scene tells a unique story.",
    "From the depths of the ocean to the heights of mountains.",
    "Finding peace in every moment.",
    "Embracing nature's tranquility.",
    "And discovering beauty in the storm.",
];

const CAMERA_EFFECTS: [&str; 6] = ["zoom", "pan", "zoom", "static", "zoom", "pan"];

const VISUAL_EFFECTS: [&str; 6] = [
    "gradient", "vignette", "gradient", "blur", "gradient", "vignette",
];

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    if let Err(e) = promptreel::available(None) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let generator = match VideoGenerator::new(GeneratorConfig::default()) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Failed to set up generator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = VideoRequest::new(PROMPTS)
        .scene_duration(7.0)
        .text_overlays(TEXT_OVERLAYS)
        .camera_effects(CAMERA_EFFECTS.map(CameraEffect::from_name))
        .visual_effects(VISUAL_EFFECTS.map(VisualEffect::from_name))
        .voice_over_texts(VOICE_OVERS)
        .background_music("music.mp3")
        .music_volume(0.3)
        .output_filename("my_ai_video.mp4");

    info!(
        "{} scenes of {:.1}s each, {:.1}s fades",
        request.prompts.len(),
        request.scene_duration,
        FADE_SECS
    );

    let video_path = match generator.generate_video(&request) {
        Ok(path) => path,
        Err(e) => {
            error!("Video generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = generator.cleanup_temp_files() {
        warn!("Could not clean up temporary files: {}", e);
    }

    info!("All done! Your video is ready at: {}", video_path.display());
    ExitCode::SUCCESS
}
