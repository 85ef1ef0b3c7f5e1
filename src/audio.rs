//! Audio cues
//!
//! Four procedurally generated sound effects, no external files needed.
//! The puzzle core only emits events; the shell turns them into sounds
//! with [`SoundEffect::for_event`].

use crate::sim::PuzzleEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Piece picked up
    Pickup,
    /// Piece clicked into its slot
    Snap,
    /// Character completed
    Success,
    /// Celebration jingle
    Celebration,
}

impl SoundEffect {
    /// Sound for a core event, if it has one
    pub fn for_event(event: &PuzzleEvent) -> Option<Self> {
        match event {
            PuzzleEvent::Pickup(_) => Some(SoundEffect::Pickup),
            PuzzleEvent::Snap(_) => Some(SoundEffect::Snap),
            PuzzleEvent::Success => Some(SoundEffect::Success),
            PuzzleEvent::Celebration { .. } => Some(SoundEffect::Celebration),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager backed by Web Audio
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Pickup => self.play_pickup(ctx, vol),
                SoundEffect::Snap => self.play_snap(ctx, vol),
                SoundEffect::Success => self.play_success(ctx, vol),
                SoundEffect::Celebration => self.play_celebration(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pickup - soft upward blip
        fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Snap - bright click
        fn play_snap(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Success - C major arpeggio
        fn play_success(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                let delay = i as f64 * 0.12;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// Celebration - rising scale, alternating timbre
        fn play_celebration(&self, ctx: &AudioContext, vol: f32) {
            let melody = [523.0, 587.0, 659.0, 784.0, 880.0, 1047.0, 1175.0, 1319.0];
            for (i, freq) in melody.iter().enumerate() {
                let delay = i as f64 * 0.1;
                let osc_type = if i % 2 == 0 {
                    OscillatorType::Sine
                } else {
                    OscillatorType::Triangle
                };
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }
    }
}
