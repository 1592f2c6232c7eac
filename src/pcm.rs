//! Borrowed view over raw signed 16-bit little-endian mono PCM.

use crate::defaults::FRAME_SIZE;
use std::time::Duration;

/// Raw PCM bytes plus the sample rate they were captured at.
///
/// The bytes are not self-describing; the rate travels alongside. A trailing
/// partial frame is ignored by every accessor.
#[derive(Debug, Clone, Copy)]
pub struct PcmBuffer<'a> {
    bytes: &'a [u8],
    sample_rate: u32,
}

impl<'a> PcmBuffer<'a> {
    pub fn new(bytes: &'a [u8], sample_rate: u32) -> Self {
        Self { bytes, sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bytes truncated to the last whole frame.
    pub fn whole_frames(&self) -> &'a [u8] {
        &self.bytes[..self.frame_count() * FRAME_SIZE]
    }

    pub fn frame_count(&self) -> usize {
        self.bytes.len() / FRAME_SIZE
    }

    /// True when the buffer length is not a multiple of the frame size.
    pub fn has_partial_frame(&self) -> bool {
        self.bytes.len() % FRAME_SIZE != 0
    }

    /// Length in bytes of the whole-frame data.
    pub fn data_len(&self) -> usize {
        self.frame_count() * FRAME_SIZE
    }

    pub fn samples(&self) -> impl Iterator<Item = i16> + 'a {
        self.bytes
            .chunks_exact(FRAME_SIZE)
            .map(|frame| i16::from_le_bytes([frame[0], frame[1]]))
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

/// Encode samples as little-endian PCM bytes.
pub fn samples_to_le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
