//! Pop sound playback using the Web Audio API
//!
//! Graph per pop: buffer source -> highpass -> gain envelope -> destination.
//! The context is created on the first pop (a user gesture) and reused.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, BiquadFilterType};

use crate::sound::*;

fn describe(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn graph_err(e: JsValue) -> SoundError {
    SoundError::Graph(describe(&e))
}

pub struct SoundEngine {
    ctx: Option<AudioContext>,
    rng: Pcg32,
}

impl SoundEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            ctx: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Play one pop. Errors mean "no sound"; callers are expected to drop them.
    pub fn play_pop(&mut self) -> Result<(), SoundError> {
        if self.ctx.is_none() {
            let ctx = AudioContext::new().map_err(|e| SoundError::Unavailable(describe(&e)))?;
            log::info!("AudioContext created ({} Hz)", ctx.sample_rate());
            self.ctx = Some(ctx);
        }
        let Some(ctx) = self.ctx.as_ref() else {
            return Err(SoundError::Unavailable("no audio context".into()));
        };

        // Browsers start contexts suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let sample_rate = ctx.sample_rate();
        let samples = synthesize_pop(&mut self.rng, sample_rate);
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, sample_rate)
            .map_err(graph_err)?;
        buffer.copy_to_channel(&samples, 0).map_err(graph_err)?;

        let source = ctx.create_buffer_source().map_err(graph_err)?;
        source.set_buffer(Some(&buffer));

        let filter = ctx.create_biquad_filter().map_err(graph_err)?;
        filter.set_type(BiquadFilterType::Highpass);
        filter.frequency().set_value(POP_HIGHPASS_HZ);

        let gain = ctx.create_gain().map_err(graph_err)?;
        let t = ctx.current_time();
        gain.gain()
            .set_value_at_time(POP_GAIN_START, t)
            .map_err(graph_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(POP_GAIN_END, t + POP_DURATION_SECS)
            .map_err(graph_err)?;

        source.connect_with_audio_node(&filter).map_err(graph_err)?;
        filter.connect_with_audio_node(&gain).map_err(graph_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(graph_err)?;

        source.start().map_err(graph_err)?;
        source
            .stop_with_when(t + POP_DURATION_SECS + POP_TAIL_SECS)
            .map_err(graph_err)?;
        Ok(())
    }
}
