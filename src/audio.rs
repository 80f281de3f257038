//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! Each effect is a short list of enveloped oscillator tones; the tables are
//! platform-neutral, only playback needs a browser.

use crate::sim::GameEvent;
use Wave::{Sawtooth, Sine, Square, Triangle};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Land,
    /// Collapsing/disappearing platform stepped on
    Crumble,
    /// A hidden trap springs out
    TrapReveal,
    /// A falling spike lets go
    SpikeDrop,
    Death,
    LevelComplete,
    GameComplete,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Landed => Some(SoundEffect::Land),
            GameEvent::PlatformCrumbling { .. } => Some(SoundEffect::Crumble),
            GameEvent::TrapRevealed { .. } => Some(SoundEffect::TrapReveal),
            GameEvent::FallingSpikeTriggered { .. } => Some(SoundEffect::SpikeDrop),
            GameEvent::PlayerDied => Some(SoundEffect::Death),
            GameEvent::LevelComplete => Some(SoundEffect::LevelComplete),
            // Arming is silent; the reveal is the surprise
            GameEvent::TrapArmed { .. } => None,
        }
    }

    /// The tones that make up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Jump => JUMP,
            SoundEffect::Land => LAND,
            SoundEffect::Crumble => CRUMBLE,
            SoundEffect::TrapReveal => TRAP_REVEAL,
            SoundEffect::SpikeDrop => SPIKE_DROP,
            SoundEffect::Death => DEATH,
            SoundEffect::LevelComplete => LEVEL_COMPLETE,
            SoundEffect::GameComplete => GAME_COMPLETE,
        }
    }
}

const JUMP: &[Tone] = &[Tone::sweep(Triangle, 220.0, 520.0, 0.25, 0.0, 0.15)];
const LAND: &[Tone] = &[Tone::sweep(Sine, 140.0, 60.0, 0.35, 0.0, 0.08)];
const CRUMBLE: &[Tone] = &[
    Tone::sweep(Sawtooth, 90.0, 40.0, 0.25, 0.0, 0.3),
    Tone::sweep(Square, 300.0, 120.0, 0.08, 0.05, 0.2),
];
const TRAP_REVEAL: &[Tone] = &[
    Tone::sweep(Square, 900.0, 1400.0, 0.15, 0.0, 0.06),
    Tone::sweep(Sawtooth, 200.0, 80.0, 0.2, 0.03, 0.15),
];
const SPIKE_DROP: &[Tone] = &[Tone::sweep(Sine, 1200.0, 300.0, 0.2, 0.0, 0.35)];
const DEATH: &[Tone] = &[
    Tone::sweep(Sawtooth, 300.0, 40.0, 0.4, 0.0, 0.5),
    Tone::sweep(Square, 1500.0, 400.0, 0.12, 0.0, 0.1),
];
// C major arpeggio
const LEVEL_COMPLETE: &[Tone] = &[
    Tone::note(Triangle, 523.0, 0.3, 0.0, 0.25),
    Tone::note(Triangle, 659.0, 0.3, 0.1, 0.25),
    Tone::note(Triangle, 784.0, 0.3, 0.2, 0.4),
];
const GAME_COMPLETE: &[Tone] = &[
    Tone::note(Triangle, 523.0, 0.25, 0.0, 0.2),
    Tone::note(Triangle, 659.0, 0.25, 0.1, 0.2),
    Tone::note(Triangle, 784.0, 0.25, 0.2, 0.2),
    Tone::note(Triangle, 1047.0, 0.3, 0.3, 0.6),
    Tone::note(Sine, 262.0, 0.2, 0.3, 0.6),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds after the effect starts
    pub delay: f64,
    /// Seconds
    pub duration: f64,
}

impl Tone {
    const fn sweep(wave: Wave, from: f32, to: f32, gain: f32, delay: f64, duration: f64) -> Self {
        Self {
            wave,
            freq_start: from,
            freq_end: to,
            gain,
            delay,
            duration,
        }
    }

    const fn note(wave: Wave, freq: f32, gain: f32, delay: f64, duration: f64) -> Self {
        Self::sweep(wave, freq, freq, gain, delay, duration)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};

    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let now = ctx.current_time();
            for tone in effect.tones() {
                play_tone(ctx, tone, now, self.volume);
            }
        }
    }

    fn create_osc(ctx: &AudioContext, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
            Wave::Triangle => OscillatorType::Triangle,
        });
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, now: f64, volume: f32) {
        let Some((osc, gain)) = create_osc(ctx, tone.wave) else {
            return;
        };
        let t = now + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(tone.gain * volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        osc.frequency().set_value_at_time(tone.freq_start, t).ok();
        if tone.freq_end != tone.freq_start {
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.freq_end, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}
