//! Spoken verdict: text-to-speech PCM wrapped into a WAV container.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use crate::coaching::prompts::{build_speech_prompt, VERDICT_VOICE};
use crate::errors::AppError;
use crate::llm_client::{CallOptions, Content, LlmClient};

/// The speech model returns 16-bit little-endian mono PCM at 24 kHz.
pub const TTS_SAMPLE_RATE: u32 = 24_000;

/// Wraps raw PCM in a WAV header. An odd trailing byte is dropped.
pub fn pcm_to_wav(pcm: &[u8]) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TTS_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Speaks `verdict` and returns a playable WAV file.
pub async fn synthesize_verdict(llm: &LlmClient, verdict: &str) -> Result<Vec<u8>, AppError> {
    let prompt = build_speech_prompt(verdict);
    let response = llm
        .call(&[Content::user_text(prompt)], CallOptions::speech(VERDICT_VOICE))
        .await
        .map_err(|e| AppError::Llm(format!("Speech synthesis failed: {e}")))?;

    let audio = response
        .inline_data()
        .ok_or_else(|| AppError::Llm("Speech synthesis returned no audio".to_string()))?;

    let pcm = STANDARD
        .decode(audio.data.trim())
        .map_err(|e| AppError::Llm(format!("Speech audio is not valid base64: {e}")))?;
    debug!("Synthesized {} bytes of PCM ({})", pcm.len(), audio.mime_type);

    pcm_to_wav(&pcm).map_err(|e| AppError::Internal(e.into()))
}
