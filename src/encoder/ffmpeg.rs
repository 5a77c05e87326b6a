//! H.264/AAC MP4 encoder using an ffmpeg external process

use super::{Encoder, EncoderConfig, Frame};
use crate::{Error, Result};
use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};
use tracing::debug;

/// FFmpeg-based encoder: raw RGBA frames on stdin, finished MP4 on disk
pub struct FfmpegEncoder {
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    config: EncoderConfig,
    frame_count: u64,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Result<Self> {
        let ffmpeg = find_ffmpeg(config.ffmpeg_path.as_deref())?;
        let args = build_args(&config);
        debug!("Spawning {} {}", ffmpeg, args.join(" "));

        let mut process = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Ffmpeg(format!("Failed to start ffmpeg: {}", e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::Ffmpeg("FFmpeg stdin not available".to_string()))?;

        Ok(Self {
            process: Some(process),
            stdin: Some(stdin),
            config,
            frame_count: 0,
        })
    }

    /// Number of frames written so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reap ffmpeg after a failed write and report why it stopped reading
    fn abort(&mut self, write_err: std::io::Error) -> Error {
        drop(self.stdin.take());

        let Some(process) = self.process.take() else {
            return Error::Ffmpeg(format!("Failed to write frame: {}", write_err));
        };

        match process.wait_with_output() {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Error::Ffmpeg(format!(
                    "ffmpeg stopped accepting frames after {} frames ({}): {}",
                    self.frame_count,
                    output.status,
                    stderr.trim()
                ))
            }
            Err(e) => Error::Ffmpeg(format!("Failed to write frame: {} ({})", write_err, e)),
        }
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&mut self, frame: &Frame) -> Result<()> {
        if frame.width != self.config.width || frame.height != self.config.height {
            return Err(Error::Encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Ffmpeg("FFmpeg encoder is already finished".to_string()))?;

        // Write raw RGBA frame data
        if let Err(e) = stdin.write_all(&frame.data) {
            return Err(self.abort(e));
        }

        self.frame_count += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        // Close stdin to signal end of input
        drop(self.stdin.take());

        let process = self
            .process
            .take()
            .ok_or_else(|| Error::Ffmpeg("FFmpeg process not available".to_string()))?;

        let output = process
            .wait_with_output()
            .map_err(|e| Error::Ffmpeg(format!("FFmpeg process error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        debug!(
            "Encoded {} frames to {}",
            self.frame_count,
            self.config.output_path.display()
        );
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // Kill the process if it's still running
        drop(self.stdin.take());
        if let Some(mut process) = self.process.take() {
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}

/// Command-line arguments for one export
fn build_args(config: &EncoderConfig) -> Vec<String> {
    let mut args: Vec<String> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{}x{}", config.width, config.height));
    args.extend(["-r".to_string(), config.fps.to_string()]);
    args.extend(["-i".to_string(), "pipe:0".to_string()]);

    if let Some(audio) = &config.audio {
        args.extend([
            "-f".to_string(),
            "f32le".to_string(),
            "-ar".to_string(),
            audio.sample_rate.to_string(),
            "-ac".to_string(),
            audio.channels.to_string(),
            "-i".to_string(),
            audio.path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
        ]);
    }

    args.extend([
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-crf".to_string(),
        config.crf().to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);

    if config.audio.is_some() {
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            "192k".to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }

    args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    args.push(config.output_path.to_string_lossy().to_string());
    args
}

/// Find ffmpeg executable
pub fn find_ffmpeg(custom_path: Option<&str>) -> Result<String> {
    if let Some(path) = custom_path {
        if std::path::Path::new(path).exists() {
            return Ok(path.to_string());
        }
        return Err(Error::Ffmpeg(format!("FFmpeg not found at: {}", path)));
    }

    // Try to find ffmpeg in PATH
    let paths = [
        "ffmpeg",
        "/usr/bin/ffmpeg",
        "/usr/local/bin/ffmpeg",
        "/opt/homebrew/bin/ffmpeg",
    ];

    for path in paths {
        if Command::new(path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
        {
            return Ok(path.to_string());
        }
    }

    Err(Error::Ffmpeg("FFmpeg not found in PATH".to_string()))
}

/// Check if ffmpeg with libx264 and aac support is available
pub fn check_available(ffmpeg_path: Option<&str>) -> Result<()> {
    let ffmpeg = find_ffmpeg(ffmpeg_path)?;

    let output = Command::new(&ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|e| Error::Ffmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    let encoders = String::from_utf8_lossy(&output.stdout);
    for required in ["libx264", "aac"] {
        if !encoders.split_whitespace().any(|name| name == required) {
            return Err(Error::Ffmpeg(format!(
                "FFmpeg does not have {} support",
                required
            )));
        }
    }
    Ok(())
}
