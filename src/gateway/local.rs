//! Offline gateway: Whisper for transcription, mistral.rs for text tasks
//!
//! Only WAV recordings can be transcribed offline; they are decoded,
//! down-mixed and resampled to the 16 kHz mono input Whisper expects.

use super::config::LocalModelConfig;
use super::media::MediaFile;
use super::prompts::{
    decisions_prompt, minutes_prompt, query_prompt, ANSWER_FALLBACK, DECISIONS_FALLBACK,
    MINUTES_FALLBACK,
};
use super::{text_or_fallback, AiGateway, QueryContext};
use crate::{Result, StudioError};
use hound::{SampleFormat, WavReader};
use mistralrs::{IsqType, TextMessageRole, TextMessages, TextModelBuilder};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::io::Cursor;
use tokio::runtime::Runtime;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

const WHISPER_SAMPLE_RATE: u32 = 16000;

pub struct LocalGateway {
    config: LocalModelConfig,
    whisper: WhisperContext,
    model: mistralrs::Model,
    runtime: Runtime,
}

impl LocalGateway {
    /// Load both models. This can take a while on first run.
    pub fn new(config: LocalModelConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.whisper_model);

        if !config.whisper_model.exists() {
            return Err(StudioError::ModelLoad(format!(
                "Model file not found: {:?}",
                config.whisper_model
            )));
        }

        let whisper = WhisperContext::new_with_params(
            config
                .whisper_model
                .to_str()
                .ok_or_else(|| StudioError::ModelLoad("Invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| StudioError::ModelLoad(format!("Failed to load Whisper model: {:?}", e)))?;

        let runtime = Runtime::new()
            .map_err(|e| StudioError::Config(format!("Failed to create runtime: {}", e)))?;

        info!("Loading text model: {}", config.llm_model_id);
        let model = runtime
            .block_on(
                TextModelBuilder::new(&config.llm_model_id)
                    .with_isq(IsqType::Q4K)
                    .build(),
            )
            .map_err(|e| StudioError::ModelLoad(format!("Failed to load LLM model: {}", e)))?;

        info!("Local gateway ready");

        Ok(Self {
            config,
            whisper,
            model,
            runtime,
        })
    }

    fn generate(&self, prompt: String) -> Result<Option<String>> {
        let messages = TextMessages::new().add_message(TextMessageRole::User, prompt);

        let response = self
            .runtime
            .block_on(self.model.send_chat_request(messages))
            .map_err(|e| StudioError::Gateway(format!("Chat request failed: {}", e)))?;

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone()))
    }
}

impl AiGateway for LocalGateway {
    fn transcribe(&self, media: &MediaFile) -> Result<String> {
        let samples = decode_for_whisper(media)?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.whisper_threads);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        if let Some(ref lang) = self.config.whisper_language {
            params.set_language(Some(lang));
        }

        let mut state = self.whisper.create_state().map_err(|e| {
            StudioError::Gateway(format!("Failed to create state: {:?}", e))
        })?;

        state
            .full(params, &samples)
            .map_err(|e| StudioError::Gateway(format!("Transcription failed: {:?}", e)))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| StudioError::Gateway(format!("Failed to get segments: {:?}", e)))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                StudioError::Gateway(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(StudioError::EmptyResult(
                "no transcription generated".to_string(),
            ));
        }
        Ok(text)
    }

    fn summarize(&self, transcription: &str) -> Result<String> {
        let text = self.generate(minutes_prompt(transcription))?;
        Ok(text_or_fallback(text, MINUTES_FALLBACK))
    }

    fn extract_decisions(&self, transcription: &str) -> Result<String> {
        let text = self.generate(decisions_prompt(transcription))?;
        Ok(text_or_fallback(text, DECISIONS_FALLBACK))
    }

    fn answer_query(&self, query: &str, context: &QueryContext) -> Result<String> {
        let text = self.generate(query_prompt(query, context))?;
        Ok(text_or_fallback(text, ANSWER_FALLBACK))
    }
}

/// Decode a WAV recording into 16 kHz mono f32 samples
fn decode_for_whisper(media: &MediaFile) -> Result<Vec<f32>> {
    if media.mime_type != "audio/wav" {
        return Err(StudioError::Media(format!(
            "offline transcription only supports WAV, got {}",
            media.mime_type
        )));
    }

    let mut reader = WavReader::new(Cursor::new(&media.data))
        .map_err(|e| StudioError::Media(format!("Failed to open WAV data: {}", e)))?;
    let spec = reader.spec();

    debug!(
        "Decoding WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let decoded: std::result::Result<Vec<f32>, hound::Error> =
        match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader.samples::<f32>().collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect(),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
            .collect(),
        (_, bits) => {
            return Err(StudioError::Media(format!("Unsupported bit depth: {}", bits)));
        }
    };
    let samples =
        decoded.map_err(|e| StudioError::Media(format!("Failed to read sample: {}", e)))?;

    let mono = downmix(&samples, spec.channels as usize);
    resample(&mono, spec.sample_rate, WHISPER_SAMPLE_RATE)
}

fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

fn resample(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = output_rate as f64 / input_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| StudioError::Media(format!("Failed to create resampler: {}", e)))?;

    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);
    for chunk in input.chunks(chunk_size) {
        // SincFixedIn wants exactly chunk_size frames per call
        let mut block = vec![0.0f32; chunk_size];
        block[..chunk.len()].copy_from_slice(chunk);

        let processed = resampler
            .process(&[block], None)
            .map_err(|e| StudioError::Media(format!("Resampling failed: {}", e)))?;

        let take = if chunk.len() < chunk_size {
            ((chunk.len() as f64) * ratio).ceil() as usize
        } else {
            processed[0].len()
        };
        output.extend_from_slice(&processed[0][..take.min(processed[0].len())]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix(&[0.5, 0.3, 0.7, 0.1], 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.4).abs() < 0.001);
        assert!((mono[1] - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_non_wav_is_rejected() {
        let media = MediaFile::new("a.mp3", "audio/mpeg", vec![1, 2, 3]);
        assert!(matches!(
            decode_for_whisper(&media),
            Err(StudioError::Media(_))
        ));
    }

    #[test]
    fn test_resample_halves_length() {
        let input: Vec<f32> = (0..32000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample(&input, 32000, 16000).unwrap();
        let expected = 16000.0;
        assert!((output.len() as f32 - expected).abs() / expected < 0.1);
    }
}
