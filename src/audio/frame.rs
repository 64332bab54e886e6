/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Offset in milliseconds from the start of the recording
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Little-endian PCM bytes, as published to the STT service
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn duration_ms(&self) -> u64 {
        let per_channel = self.samples.len() as u64 / self.channels.max(1) as u64;
        per_channel * 1000 / self.sample_rate.max(1) as u64
    }
}

/// Split interleaved samples into frames of `frame_ms` each (last one may be shorter)
pub fn split_frames(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
    frame_ms: u64,
) -> Vec<AudioFrame> {
    let samples_per_frame =
        (sample_rate as u64 * frame_ms / 1000) as usize * channels.max(1) as usize;
    if samples_per_frame == 0 {
        return Vec::new();
    }

    samples
        .chunks(samples_per_frame)
        .enumerate()
        .map(|(index, chunk)| AudioFrame {
            samples: chunk.to_vec(),
            sample_rate,
            channels,
            timestamp_ms: index as u64 * frame_ms,
        })
        .collect()
}

/// Convert normalized f32 samples to 16-bit PCM with clipping
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}
