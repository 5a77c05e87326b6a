//! End-to-end video generation from prompts

use crate::assembler::{assemble, AssembleOptions};
use crate::font::{Typeface, DEFAULT_FONT_CANDIDATES};
use crate::narration::{Narrator, VoiceSettings};
use crate::scene_image::SceneImageRenderer;
use crate::{CameraEffect, Error, FrameSize, Result, SceneClip, VisualEffect, DEFAULT_FPS};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the scratch subdirectory inside the output directory
pub const TEMP_DIR_NAME: &str = "temp";

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory receiving the finished videos
    pub output_dir: PathBuf,
    /// Size of rendered frames
    pub frame_size: FrameSize,
    /// Output frame rate
    pub fps: u32,
    /// Quality (0-100, where 100 is highest quality)
    pub quality: u8,
    /// Path to ffmpeg executable
    pub ffmpeg_path: Option<String>,
    /// Font files tried in order for captions
    pub font_candidates: Vec<PathBuf>,
    /// Narration voice
    pub voice: VoiceSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated_videos"),
            frame_size: FrameSize::default(),
            fps: DEFAULT_FPS,
            quality: 55,
            ffmpeg_path: None,
            font_candidates: DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
            voice: VoiceSettings::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.frame_size.validate()?;
        if self.fps == 0 {
            return Err(Error::InvalidInput("fps must be non-zero".to_string()));
        }
        if self.quality > 100 {
            return Err(Error::InvalidInput(format!(
                "quality must be 0-100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// One video to generate.
///
/// Per-scene lists are matched to prompts by index. Missing entries fall back
/// to: no overlay, `VisualEffect::None`, `CameraEffect::Zoom`, no narration.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompts: Vec<String>,
    /// Seconds per scene
    pub scene_duration: f64,
    pub text_overlays: Option<Vec<String>>,
    /// Defaults to `Zoom` for every scene when absent
    pub camera_effects: Option<Vec<CameraEffect>>,
    /// Defaults to `Gradient` for every scene when absent
    pub visual_effects: Option<Vec<VisualEffect>>,
    pub voice_over_texts: Option<Vec<String>>,
    pub background_music: Option<PathBuf>,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// File name of the video inside the output directory
    pub output_filename: String,
}

impl VideoRequest {
    pub fn new<S: Into<String>>(prompts: impl IntoIterator<Item = S>) -> Self {
        Self {
            prompts: prompts.into_iter().map(Into::into).collect(),
            scene_duration: 7.0,
            text_overlays: None,
            camera_effects: None,
            visual_effects: None,
            voice_over_texts: None,
            background_music: None,
            music_volume: 0.3,
            output_filename: "output_video.mp4".to_string(),
        }
    }

    pub fn scene_duration(mut self, secs: f64) -> Self {
        self.scene_duration = secs;
        self
    }

    pub fn text_overlays<S: Into<String>>(mut self, overlays: impl IntoIterator<Item = S>) -> Self {
        self.text_overlays = Some(overlays.into_iter().map(Into::into).collect());
        self
    }

    pub fn camera_effects(mut self, effects: impl IntoIterator<Item = CameraEffect>) -> Self {
        self.camera_effects = Some(effects.into_iter().collect());
        self
    }

    pub fn visual_effects(mut self, effects: impl IntoIterator<Item = VisualEffect>) -> Self {
        self.visual_effects = Some(effects.into_iter().collect());
        self
    }

    pub fn voice_over_texts<S: Into<String>>(mut self, texts: impl IntoIterator<Item = S>) -> Self {
        self.voice_over_texts = Some(texts.into_iter().map(Into::into).collect());
        self
    }

    pub fn background_music(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_music = Some(path.into());
        self
    }

    pub fn music_volume(mut self, volume: f32) -> Self {
        self.music_volume = volume;
        self
    }

    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = name.into();
        self
    }

    /// Validate the request
    pub fn validate(&self) -> Result<()> {
        if self.prompts.is_empty() {
            return Err(Error::InvalidInput("No prompts provided".to_string()));
        }
        if !self.scene_duration.is_finite() || self.scene_duration <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "scene duration must be positive, got {}",
                self.scene_duration
            )));
        }
        if self.output_filename.trim().is_empty() {
            return Err(Error::InvalidInput("output filename is empty".to_string()));
        }
        Ok(())
    }

    /// Overlay text of scene `i`, if any
    pub fn overlay(&self, i: usize) -> Option<&str> {
        self.text_overlays
            .as_ref()
            .and_then(|v| v.get(i))
            .map(String::as_str)
    }

    /// Visual effect of scene `i`
    pub fn visual_effect(&self, i: usize) -> VisualEffect {
        match &self.visual_effects {
            None => VisualEffect::Gradient,
            Some(v) => v.get(i).copied().unwrap_or(VisualEffect::None),
        }
    }

    /// Camera effect of scene `i`
    pub fn camera_effect(&self, i: usize) -> CameraEffect {
        self.camera_effects
            .as_ref()
            .and_then(|v| v.get(i).copied())
            .unwrap_or(CameraEffect::Zoom)
    }

    /// Narration text of scene `i`, if any
    pub fn voice_over(&self, i: usize) -> Option<&str> {
        self.voice_over_texts
            .as_ref()
            .and_then(|v| v.get(i))
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    fn warn_on_length_mismatch(&self) {
        let n = self.prompts.len();
        let lists = [
            ("text overlays", self.text_overlays.as_ref().map(Vec::len)),
            ("camera effects", self.camera_effects.as_ref().map(Vec::len)),
            ("visual effects", self.visual_effects.as_ref().map(Vec::len)),
            ("voice overs", self.voice_over_texts.as_ref().map(Vec::len)),
        ];
        for (name, len) in lists {
            if let Some(len) = len.filter(|&len| len != n) {
                warn!(
                    "{} {} given for {} prompts; missing entries use defaults",
                    len, name, n
                );
            }
        }
    }
}

/// Generates videos into an output directory
pub struct VideoGenerator {
    config: GeneratorConfig,
    output_dir: PathBuf,
    temp_dir: PathBuf,
    renderer: SceneImageRenderer,
    narrator: Narrator,
}

impl VideoGenerator {
    /// Create a generator, ensuring the output and scratch directories exist.
    ///
    /// Narration uses an installed espeak-ng/espeak when one is found.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let narrator = Narrator::detect(config.voice);
        Self::with_narrator(config, narrator)
    }

    /// Create a generator with an explicit narration backend
    pub fn with_narrator(config: GeneratorConfig, narrator: Narrator) -> Result<Self> {
        config.validate()?;

        let output_dir = config.output_dir.clone();
        let temp_dir = output_dir.join(TEMP_DIR_NAME);
        std::fs::create_dir_all(&temp_dir)?;

        let font = Typeface::resolve(&config.font_candidates);
        let renderer = SceneImageRenderer::new(config.frame_size, font);

        Ok(Self {
            config,
            output_dir,
            temp_dir,
            renderer,
            narrator,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render the still frame of scene `index` and save it to the scratch directory
    pub fn generate_image_from_prompt(
        &self,
        prompt: &str,
        index: usize,
        text_overlay: Option<&str>,
        visual_effect: VisualEffect,
    ) -> Result<PathBuf> {
        let img = self
            .renderer
            .render(prompt, index, text_overlay, visual_effect);
        let path = self.temp_dir.join(format!("scene_{}.png", index));
        img.save(&path)?;
        Ok(path)
    }

    /// Build a clip from a saved still frame
    pub fn create_scene<P: AsRef<Path>>(
        &self,
        image_path: P,
        duration: f64,
        effect: CameraEffect,
    ) -> Result<SceneClip> {
        SceneClip::load(image_path, duration, effect)
    }

    /// Render narration for `text`; `false` when speech is unavailable or fails
    pub fn text_to_speech<P: AsRef<Path>>(&self, text: &str, output_path: P) -> bool {
        self.narrator.text_to_speech(text, output_path.as_ref())
    }

    /// Generate a complete video and return its path
    pub fn generate_video(&self, request: &VideoRequest) -> Result<PathBuf> {
        request.validate()?;
        request.warn_on_length_mismatch();
        info!("Starting video generation...");

        let music_volume = if (0.0..=1.0).contains(&request.music_volume) {
            request.music_volume
        } else {
            let clamped = request.music_volume.clamp(0.0, 1.0);
            warn!(
                "Music volume {} outside 0.0-1.0, using {}",
                request.music_volume, clamped
            );
            clamped
        };

        let voice_files = self.generate_voice_overs(request);

        let count = request.prompts.len();
        info!("Generating {} scenes...", count);
        let mut image_paths = Vec::with_capacity(count);
        for (i, prompt) in request.prompts.iter().enumerate() {
            info!("  Scene {}/{}: {}", i + 1, count, prompt);
            let path = self.generate_image_from_prompt(
                prompt,
                i,
                request.overlay(i),
                request.visual_effect(i),
            )?;
            image_paths.push(path);
        }

        info!("Creating video clips with effects...");
        let mut clips = Vec::with_capacity(count);
        for (i, path) in image_paths.iter().enumerate() {
            let mut clip = self.create_scene(path, request.scene_duration, request.camera_effect(i))?;
            if let Some(Some(voice)) = voice_files.get(i) {
                clip = clip.with_narration(voice);
            }
            clips.push(clip);
        }

        let mut options = AssembleOptions::new(
            self.output_dir.join(&request.output_filename),
            &self.temp_dir,
        );
        options.fps = self.config.fps;
        options.quality = self.config.quality;
        options.ffmpeg_path = self.config.ffmpeg_path.clone();
        options.background_music = request.background_music.clone();
        options.music_volume = music_volume;

        assemble(&clips, &options)
    }

    /// Narration file per scene index; `None` where no text was given or synthesis failed
    fn generate_voice_overs(&self, request: &VideoRequest) -> Vec<Option<PathBuf>> {
        let Some(texts) = request.voice_over_texts.as_ref() else {
            return Vec::new();
        };

        info!("Generating voice overs...");
        (0..texts.len())
            .map(|i| {
                let text = request.voice_over(i)?;
                let path = self.temp_dir.join(format!("voice_{}.wav", i));
                if self.text_to_speech(text, &path) {
                    info!("  Voice over {} generated", i + 1);
                    Some(path)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Delete every file in the scratch directory and return how many were removed
    pub fn cleanup_temp_files(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.temp_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        info!("Temporary files cleaned up ({} removed)", removed);
        Ok(removed)
    }
}
