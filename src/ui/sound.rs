/// Sound engine: procedural retro sound effects via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).
///
/// ## Cue Table
/// ┌──────────┬───────────┬─────────────────────────┬────────┐
/// │ Cue      │ Wave      │ Pitch                   │ Length │
/// ├──────────┼───────────┼─────────────────────────┼────────┤
/// │ jump     │ sine      │ 150 → 300 Hz glide      │ 0.10 s │
/// │ attack   │ triangle  │ 100 → 50 Hz drop        │ 0.15 s │
/// │ hit      │ square    │ 150 → 50 Hz drop        │ 0.10 s │
/// │ block    │ sine      │ 880, then 1200 Hz       │ 0.30 s │
/// │ powerup  │ sine      │ A4 C#5 E5 steps         │ 0.40 s │
/// │ damage   │ sawtooth  │ 100 → 20 Hz glide       │ 0.30 s │
/// │ victory  │ triangle  │ A4 C#5 E5 A5 steps      │ 2.00 s │
/// │ collect  │ sine      │ 1200 → 1800 Hz glide    │ 0.10 s │
/// │ poison   │ sawtooth  │ 300 → 150 Hz wobble     │ 0.25 s │
/// └──────────┴───────────┴─────────────────────────┴────────┘

use crate::sim::event::AudioCue;
#[cfg(feature = "sound")]
use crate::sim::event::GameEvent;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{make_wav, synth, AudioCue, GameEvent};

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: HashMap<AudioCue, Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, continuing silently: {e}");
                    return None;
                }
            };

            let buffers = AudioCue::ALL
                .iter()
                .map(|&cue| (cue, Arc::new(make_wav(&synth(cue)))))
                .collect();

            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, cue: AudioCue) {
            let Some(buf) = self.buffers.get(&cue) else { return };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let cursor = Cursor::new(buf.as_ref().clone());
                    if let Ok(src) = rodio::Decoder::new(cursor) {
                        sink.append(src);
                        sink.detach(); // fire-and-forget
                    }
                }
                Err(e) => log::debug!("dropped '{}' cue: {e}", cue.tag()),
            }
        }

        /// Play the cue of every event from one tick.
        pub fn play_events(&self, events: &[GameEvent]) {
            for cue in events.iter().filter_map(GameEvent::cue) {
                self.play(cue);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
enum Wave {
    Sine,
    Triangle,
    Square,
    Saw,
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn oscillate(wave: Wave, phase: f32) -> f32 {
    let p = phase.fract();
    match wave {
        Wave::Sine => (p * 2.0 * std::f32::consts::PI).sin(),
        Wave::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        Wave::Square => if p < 0.5 { 1.0 } else { -1.0 },
        Wave::Saw => 2.0 * p - 1.0,
    }
}

/// Render `duration` seconds of `wave` whose frequency is `freq(t)` for
/// t in 0..1, with a linear fade from `volume` to silence.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn render(wave: Wave, duration: f32, volume: f32, freq: impl Fn(f32) -> f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            phase += freq(t) / SAMPLE_RATE as f32;
            oscillate(wave, phase) * (1.0 - t) * volume
        })
        .collect()
}

/// Piecewise-constant pitch: `notes[k]` for the k-th equal slice of time.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn steps(notes: &'static [f32]) -> impl Fn(f32) -> f32 {
    move |t| {
        let k = ((t * notes.len() as f32) as usize).min(notes.len() - 1);
        notes[k]
    }
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn synth(cue: AudioCue) -> Vec<f32> {
    match cue {
        AudioCue::Jump => render(Wave::Sine, 0.10, 0.3, |t| 150.0 + 150.0 * t),
        AudioCue::Attack => render(Wave::Triangle, 0.15, 0.3, |t| 100.0 * 0.5_f32.powf(t)),
        AudioCue::Hit => render(Wave::Square, 0.10, 0.2, |t| 150.0 * (1.0_f32 / 3.0).powf(t)),
        AudioCue::Block => render(Wave::Sine, 0.30, 0.4, |t| if t < 1.0 / 6.0 { 880.0 } else { 1200.0 }),
        AudioCue::PowerUp => render(Wave::Sine, 0.40, 0.3, steps(&[440.0, 554.0, 659.0, 659.0])),
        AudioCue::Damage => render(Wave::Saw, 0.30, 0.35, |t| 100.0 - 80.0 * t),
        AudioCue::Victory => render(Wave::Triangle, 2.00, 0.4, steps(&[440.0, 554.0, 659.0, 880.0, 880.0, 880.0, 880.0, 880.0, 880.0, 880.0])),
        AudioCue::Collect => render(Wave::Sine, 0.10, 0.3, |t| 1200.0 + 600.0 * t),
        AudioCue::Poison => render(Wave::Saw, 0.25, 0.25, |t| {
            300.0 - 150.0 * t + 40.0 * (t * 12.0 * std::f32::consts::PI).sin()
        }),
    }
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());

    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: AudioCue) {}
    pub fn play_events(&self, _events: &[crate::sim::event::GameEvent]) {}
}
