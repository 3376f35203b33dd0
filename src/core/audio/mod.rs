//! Audio container encoding.

pub mod wav;

pub use wav::{OUTPUT_FORMAT, WAV_HEADER_LEN, WavError, WavFormat, encode_wav};
