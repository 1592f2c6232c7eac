//! In-process container writers for WAV, AU and AIFF.
//!
//! All three wrap 16-bit mono PCM with a header and need no external
//! tooling. WAV is written through `hound`. AU and AIFF headers are
//! big-endian and the caller's sample bytes follow them unchanged.

use crate::convert::backend::ConversionBackend;
use crate::defaults::{BITS_PER_SAMPLE, CHANNELS};
use crate::error::{PcmforgeError, Result};
use crate::format::{BackendKind, FormatTag};
use crate::pcm::PcmBuffer;
use std::io::Cursor;

/// Sun/NeXT `.snd` magic.
const AU_MAGIC: u32 = 0x2e73_6e64;
const AU_HEADER_LEN: u32 = 24;
/// 16-bit linear PCM.
const AU_ENCODING_LINEAR_16: u32 = 3;

/// COMM chunk body: channels(2) + frames(4) + bits(2) + rate(10).
const AIFF_COMM_LEN: u32 = 18;
/// SSND chunk prefix: offset(4) + block size(4).
const AIFF_SSND_PREFIX_LEN: u32 = 8;

/// Native encoder backend; deterministic and never spawns anything.
#[derive(Debug, Clone, Default)]
pub struct NativeEncoder;

impl NativeEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionBackend for NativeEncoder {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn name(&self) -> &str {
        "native encoder"
    }

    fn convert(&self, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>> {
        match format {
            FormatTag::Wav => encode_wav(pcm),
            FormatTag::Au => encode_au(pcm),
            FormatTag::Aiff => encode_aiff(pcm),
            other => Err(PcmforgeError::BackendFailure {
                backend: self.name().to_string(),
                message: format!("cannot produce {}", other),
            }),
        }
    }
}

/// Wrap PCM in a RIFF/WAVE container.
pub fn encode_wav(pcm: PcmBuffer<'_>) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate: pcm.sample_rate(),
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.data_len()));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for sample in pcm.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Wrap PCM in a Sun AU container (big-endian).
pub fn encode_au(pcm: PcmBuffer<'_>) -> Result<Vec<u8>> {
    let data_len = container_len(pcm.data_len(), "au")?;

    let mut out = Vec::with_capacity(AU_HEADER_LEN as usize + pcm.data_len());
    out.extend_from_slice(&AU_MAGIC.to_be_bytes());
    out.extend_from_slice(&AU_HEADER_LEN.to_be_bytes());
    out.extend_from_slice(&data_len.to_be_bytes());
    out.extend_from_slice(&AU_ENCODING_LINEAR_16.to_be_bytes());
    out.extend_from_slice(&pcm.sample_rate().to_be_bytes());
    out.extend_from_slice(&u32::from(CHANNELS).to_be_bytes());
    out.extend_from_slice(pcm.whole_frames());

    Ok(out)
}

/// Wrap PCM in an AIFF container (big-endian).
pub fn encode_aiff(pcm: PcmBuffer<'_>) -> Result<Vec<u8>> {
    let data_len = container_len(pcm.data_len(), "aiff")?;
    let frames = container_len(pcm.frame_count(), "aiff")?;
    let ssnd_len = checked_len(AIFF_SSND_PREFIX_LEN.checked_add(data_len), "aiff")?;
    // "AIFF" + COMM chunk + SSND chunk
    let form_len = checked_len(
        ssnd_len.checked_add(4 + (8 + AIFF_COMM_LEN) + 8),
        "aiff",
    )?;

    let mut out = Vec::with_capacity(8 + form_len as usize);
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&form_len.to_be_bytes());
    out.extend_from_slice(b"AIFF");

    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&AIFF_COMM_LEN.to_be_bytes());
    out.extend_from_slice(&CHANNELS.to_be_bytes());
    out.extend_from_slice(&frames.to_be_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_be_bytes());
    out.extend_from_slice(&extended_sample_rate(pcm.sample_rate()));

    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&ssnd_len.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // offset
    out.extend_from_slice(&0u32.to_be_bytes()); // block size
    out.extend_from_slice(pcm.whole_frames());

    Ok(out)
}

fn too_large(container: &str) -> PcmforgeError {
    PcmforgeError::BackendFailure {
        backend: "native encoder".to_string(),
        message: format!("audio does not fit an {} header", container),
    }
}

fn container_len(len: usize, container: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| too_large(container))
}

fn checked_len(len: Option<u32>, container: &str) -> Result<u32> {
    len.ok_or_else(|| too_large(container))
}

/// Sample rate as an 80-bit IEEE 754 extended float, as AIFF's COMM chunk
/// requires.
fn extended_sample_rate(rate: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if rate == 0 {
        return out;
    }
    let value = u64::from(rate);
    let shift = value.leading_zeros();
    let exponent = (16383 + 63 - shift) as u16;
    let mantissa = value << shift;
    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}
