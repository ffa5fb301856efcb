use crate::config::NarrationConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::process::Command;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Drives the external text-to-speech engine.
///
/// The engine consumes plain text and a language code and writes the audio
/// file itself; nothing here touches samples on the synthesis path.
pub struct NarrationEngine {
    binary: String,
    lang: String,
}

impl NarrationEngine {
    pub fn new(config: &NarrationConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            lang: config.lang.clone(),
        }
    }

    /// Check if the speech engine binary is on PATH
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary).arg("--version").output().is_ok()
    }

    /// Synthesize `text` into an audio file at `output`
    pub fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let text = Self::normalize(text);
        if text.is_empty() {
            anyhow::bail!("Narration text is empty");
        }

        println!("🗣️  Synthesizing narration ({} chars)...", text.len());

        let result = Command::new(&self.binary)
            .arg(&text)
            .arg("--lang")
            .arg(&self.lang)
            .arg("--output")
            .arg(output)
            .output()
            .with_context(|| format!("Failed to launch speech engine '{}'", self.binary))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            anyhow::bail!("Speech synthesis failed: {}", stderr.trim());
        }

        // Duration is informational only; a probe failure is not a pipeline failure
        match Self::probe_duration(output) {
            Ok(seconds) => println!("  ✓ Narration ready ({:.1}s)", seconds),
            Err(e) => eprintln!("  ⚠️  Could not probe narration duration: {}", e),
        }

        Ok(())
    }

    /// Collapse runs of whitespace so the text survives as a single CLI argument
    fn normalize(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Decode the synthesized audio to report its duration in seconds
    pub fn probe_duration(path: &Path) -> Result<f32> {
        let src = File::open(path).context("Failed to open audio file")?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .context("Unsupported audio format")?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No supported audio track found")?;

        let track_id = track.id;
        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

        // Containers that carry a frame count up front don't need decoding
        if let Some(n_frames) = track.codec_params.n_frames {
            return Ok(n_frames as f32 / sample_rate as f32);
        }

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &dec_opts)
            .context("Unsupported codec")?;

        let mut frames: u64 = 0;
        while let Ok(packet) = format.next_packet() {
            if packet.track_id() != track_id {
                continue;
            }
            if let Ok(decoded) = decoder.decode(&packet) {
                frames += decoded.frames() as u64;
            }
        }

        Ok(frames as f32 / sample_rate as f32)
    }
}
