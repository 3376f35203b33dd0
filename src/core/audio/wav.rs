//! RIFF/WAVE encoding of raw PCM audio.
//!
//! The provider streams headerless 16-bit little-endian PCM. Browsers and most
//! players need a container, so the accumulated payload is wrapped in the
//! canonical 44-byte WAV header before it is returned to the caller.

use bytes::{BufMut, Bytes, BytesMut};

/// Length of the canonical PCM WAV header
pub const WAV_HEADER_LEN: usize = 44;

/// Size of the `fmt ` sub-chunk body for integer PCM
const FMT_CHUNK_LEN: u32 = 16;

/// Format tag for uncompressed integer PCM
const FORMAT_PCM: u16 = 1;

/// PCM stream layout described by a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Bytes per second of audio
    pub const fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    /// Bytes per sample frame across all channels
    pub const fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }
}

/// Format of the audio produced by the Live API: 24 kHz mono 16-bit
pub const OUTPUT_FORMAT: WavFormat = WavFormat {
    sample_rate: 24_000,
    channels: 1,
    bits_per_sample: 16,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WavError {
    #[error("PCM payload of {0} bytes does not fit in a WAV container")]
    PayloadTooLarge(usize),
}

/// Wrap `pcm` in a WAV container using [`OUTPUT_FORMAT`].
pub fn encode_wav(pcm: &[u8]) -> Result<Bytes, WavError> {
    encode_wav_with_format(pcm, OUTPUT_FORMAT)
}

/// Wrap `pcm` in a WAV container describing `format`.
///
/// The payload is copied verbatim after the header; no resampling or
/// conversion takes place.
pub fn encode_wav_with_format(pcm: &[u8], format: WavFormat) -> Result<Bytes, WavError> {
    let data_len = u32::try_from(pcm.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(WavError::PayloadTooLarge(pcm.len()))?;

    let mut buf = BytesMut::with_capacity(WAV_HEADER_LEN + pcm.len());
    buf.put_slice(b"RIFF");
    buf.put_u32_le(36 + data_len);
    buf.put_slice(b"WAVE");

    buf.put_slice(b"fmt ");
    buf.put_u32_le(FMT_CHUNK_LEN);
    buf.put_u16_le(FORMAT_PCM);
    buf.put_u16_le(format.channels);
    buf.put_u32_le(format.sample_rate);
    buf.put_u32_le(format.byte_rate());
    buf.put_u16_le(format.block_align());
    buf.put_u16_le(format.bits_per_sample);

    buf.put_slice(b"data");
    buf.put_u32_le(data_len);
    buf.put_slice(pcm);

    Ok(buf.freeze())
}
