//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `tts` - Text-to-speech synthesis endpoint
//! - `voices` - Voice listing endpoint

pub mod api;
pub mod tts;
pub mod voices;
