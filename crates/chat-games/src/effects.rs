//! Smile rain: chat lines with a bracket drop an emoji on the overlay.

use rand::Rng;
use serde::Serialize;

use crate::ChatMessage;

pub const PARTICLE_EMOJIS: [&str; 6] = ["😊", "😄", "✨", "🔥", "❤️", ")"];
/// How long the overlay keeps a particle on screen.
pub const PARTICLE_LIFETIME_MS: u64 = 4000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmileParticle {
    pub id: u64,
    /// Horizontal position in percent of the overlay width.
    pub left: f64,
    pub emoji: &'static str,
    pub lifetime_ms: u64,
}

pub fn triggers_smile(text: &str) -> bool {
    text.contains(')') || text.contains('(')
}

#[derive(Debug, Clone, Default)]
pub struct SmileRain {
    trigger: u64,
}

impl SmileRain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of particles spawned so far.
    pub fn trigger_count(&self) -> u64 {
        self.trigger
    }

    pub fn observe(&mut self, msg: &ChatMessage) -> Option<SmileParticle> {
        self.observe_with_rng(msg, &mut rand::thread_rng())
    }

    pub fn observe_with_rng<R: Rng + ?Sized>(
        &mut self,
        msg: &ChatMessage,
        rng: &mut R,
    ) -> Option<SmileParticle> {
        if !triggers_smile(&msg.message) {
            return None;
        }
        self.trigger += 1;
        Some(SmileParticle {
            id: self.trigger,
            left: rng.gen_range(5.0..95.0),
            emoji: PARTICLE_EMOJIS[rng.gen_range(0..PARTICLE_EMOJIS.len())],
            lifetime_ms: PARTICLE_LIFETIME_MS,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn chat(message: &str) -> ChatMessage {
        ChatMessage {
            id: "id".into(),
            username: "u".into(),
            message: message.into(),
            color: "#FFFFFF".into(),
        }
    }

    #[test]
    fn brackets_trigger_particles() {
        let mut rain = SmileRain::new();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(rain.observe_with_rng(&chat("привет )"), &mut rng).is_some());
        assert!(rain.observe_with_rng(&chat("(("), &mut rng).is_some());
        assert!(rain.observe_with_rng(&chat("no smile"), &mut rng).is_none());
        assert_eq!(rain.trigger_count(), 2);
    }

    #[test]
    fn particles_stay_within_bounds() {
        let mut rain = SmileRain::new();
        let mut rng = StdRng::seed_from_u64(1);
        for expected_id in 1..=200 {
            let p = rain.observe_with_rng(&chat(":)"), &mut rng).unwrap();
            assert_eq!(p.id, expected_id);
            assert!((5.0..95.0).contains(&p.left));
            assert!(PARTICLE_EMOJIS.contains(&p.emoji));
            assert_eq!(p.lifetime_ms, PARTICLE_LIFETIME_MS);
        }
    }
}
