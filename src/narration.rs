//! Best-effort narration through an offline text-to-speech engine
//!
//! Speech is optional: a missing engine or a failed run is logged and reported
//! as `false`, never as an error, so video generation carries on without it.

use crate::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Engines tried in order when none is configured
const ESPEAK_PROGRAMS: &[&str] = &["espeak-ng", "espeak"];

/// Highest espeak amplitude
const ESPEAK_MAX_AMPLITUDE: f32 = 200.0;

/// Speech rate and loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    /// Words per minute
    pub rate_wpm: u32,
    /// Fraction of maximum volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate_wpm: 150,
            volume: 0.9,
        }
    }
}

/// An offline engine that renders text to an audio file
pub trait SpeechEngine {
    /// Engine name for log output
    fn name(&self) -> &str;

    /// Render `text` to `output_path`, blocking until done
    fn synthesize(&self, text: &str, output_path: &Path, voice: &VoiceSettings) -> Result<()>;
}

/// espeak / espeak-ng command-line engine writing WAV files
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    program: String,
}

impl EspeakEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find an installed espeak binary
    pub fn detect() -> Option<Self> {
        ESPEAK_PROGRAMS
            .iter()
            .find(|program| {
                Command::new(program)
                    .arg("--version")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map(|s| s.success())
                    .unwrap_or(false)
            })
            .map(|program| Self::new(*program))
    }

    fn amplitude(voice: &VoiceSettings) -> u32 {
        (voice.volume.clamp(0.0, 1.0) * ESPEAK_MAX_AMPLITUDE).round() as u32
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn synthesize(&self, text: &str, output_path: &Path, voice: &VoiceSettings) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-s")
            .arg(voice.rate_wpm.to_string())
            .arg("-a")
            .arg(Self::amplitude(voice).to_string())
            .arg("-w")
            .arg(output_path)
            .arg("--")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Speech(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Speech(format!(
                "{} exited with status {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Optional narration capability
pub struct Narrator {
    engine: Option<Box<dyn SpeechEngine>>,
    voice: VoiceSettings,
}

impl Narrator {
    /// Narrator backed by whatever espeak binary is installed, if any
    pub fn detect(voice: VoiceSettings) -> Self {
        let engine = EspeakEngine::detect();
        match &engine {
            Some(e) => debug!("Using text-to-speech engine {}", e.name()),
            None => info!("No text-to-speech engine found; narration disabled"),
        }
        Self {
            engine: engine.map(|e| Box::new(e) as Box<dyn SpeechEngine>),
            voice,
        }
    }

    pub fn with_engine(engine: Box<dyn SpeechEngine>, voice: VoiceSettings) -> Self {
        Self {
            engine: Some(engine),
            voice,
        }
    }

    /// Narrator that never produces audio
    pub fn disabled() -> Self {
        Self {
            engine: None,
            voice: VoiceSettings::default(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Render `text` to `output_path`; `false` when the engine is missing or fails
    pub fn text_to_speech(&self, text: &str, output_path: &Path) -> bool {
        let Some(engine) = self.engine.as_ref() else {
            warn!("Text-to-speech engine not installed (espeak-ng or espeak)");
            return false;
        };

        match engine.synthesize(text, output_path, &self.voice) {
            Ok(()) if output_path.exists() => true,
            Ok(()) => {
                warn!(
                    "Text-to-speech produced no output at {}",
                    output_path.display()
                );
                false
            }
            Err(e) => {
                warn!("Text-to-speech failed: {}", e);
                false
            }
        }
    }
}
