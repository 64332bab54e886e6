use super::frame::{split_frames, to_pcm16, AudioFrame};
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::info;

/// A recording decoded to mono 16-bit PCM at the requested sample rate
pub struct RecordingFile {
    pub path: String,
    pub duration_seconds: f64,
    pub source_sample_rate: u32,
    pub source_channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl RecordingFile {
    /// Decode the first audio track of a video or audio container (blocking)
    pub fn open(path: impl AsRef<Path>, target_sample_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening recording: {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open recording: {}", path.display()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .context("Unsupported recording format")?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("Recording has no audio track")?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let source_rate = codec_params
            .sample_rate
            .context("Recording audio track has no sample rate")?;
        let channels = codec_params.channels.map_or(1, |c| c.count()).max(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .context("Failed to create audio decoder")?;

        let mut mono: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e).context("Failed to read recording packet"),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder.decode(&packet).context("Failed to decode audio packet")?;

            let spec = *decoded.spec();
            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);

            // Mix to mono
            for chunk in buffer.samples().chunks(channels) {
                mono.push(chunk.iter().sum::<f32>() / channels as f32);
            }
        }

        if mono.is_empty() {
            anyhow::bail!("Recording contains no audio samples: {}", path.display());
        }

        let duration_seconds = mono.len() as f64 / source_rate as f64;

        if source_rate != target_sample_rate {
            mono = resample(&mono, source_rate, target_sample_rate)?;
        }

        let samples = to_pcm16(&mono);

        info!(
            "Recording decoded: {:.1}s, {}Hz {}ch -> {}Hz mono, {} samples",
            duration_seconds,
            source_rate,
            channels,
            target_sample_rate,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            source_sample_rate: source_rate,
            source_channels: channels as u16,
            sample_rate: target_sample_rate,
            samples,
        })
    }

    /// Split the decoded audio into fixed-duration frames for publishing
    pub fn frames(&self, frame_ms: u64) -> Vec<AudioFrame> {
        split_frames(&self.samples, self.sample_rate, 1, frame_ms)
    }
}

/// Resample mono audio from `from_rate` to `to_rate`
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .context("Failed to create resampler")?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let mut input = chunk.to_vec();
        // Pad last chunk with silence
        input.resize(chunk_size, 0.0);

        let resampled = resampler
            .process(&[input], None)
            .context("Failed to resample audio")?;

        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    // Drop the padding added to the final chunk
    output.truncate((samples.len() as f64 * ratio).ceil() as usize);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_downsample_ratio() {
        let samples: Vec<f32> = (0..48000).map(|i| (i as f32 / 48000.0).sin()).collect();
        let result = resample(&samples, 48000, 16000).unwrap();
        let ratio = result.len() as f64 / samples.len() as f64;
        assert!((ratio - 1.0 / 3.0).abs() < 0.05, "ratio: {ratio}");
    }

    #[test]
    fn test_open_missing_file() {
        assert!(RecordingFile::open("/nonexistent/recording.mp4", 16000).is_err());
    }
}
