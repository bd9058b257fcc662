//! Visual Effect Queue
//!
//! Short-lived particle overlays anchored to an agent: search pulses, typing
//! particles, run sparks, error bursts. Each effect carries a deterministic
//! seed so a frame redrawn at the same instant places its particles in the
//! same spots.
//!
//! Pruning builds a new survivor vector instead of mutating in place, so a
//! snapshot handed to the renderer for the current frame never changes
//! mid-draw.

use std::time::{Duration, Instant};

use crate::geometry::{clamp01, hash2d};

/// Particle style of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Expanding concentric rings.
    SearchPulse,
    /// Particles rising upward.
    TypeParticles,
    /// Radial spark flash.
    RunSpark,
    /// Explosive burst.
    ErrorBurst,
}

/// One live particle overlay.
#[derive(Clone, Debug)]
pub struct VisualEffect {
    pub id: u64,
    /// Agent the effect is anchored to.
    pub agent_id: String,
    pub kind: EffectKind,
    /// 0xRRGGBB color.
    pub color: u32,
    pub started_at: Instant,
    pub duration: Duration,
    /// Deterministic per-instance variation seed.
    pub seed: u32,
}

impl VisualEffect {
    /// Normalized lifetime progress at `now`, clamped to [0, 1].
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        clamp01(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Whether the effect has outlived its duration.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

/// Queue of live effects, pruned on a coarse cadence.
#[derive(Debug)]
pub struct EffectQueue {
    effects: Vec<VisualEffect>,
    next_id: u64,
    default_duration: Duration,
}

impl EffectQueue {
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            effects: Vec::new(),
            next_id: 0,
            default_duration,
        }
    }

    /// Append an effect anchored to `agent_id`.
    ///
    /// Returns the effect id.
    pub fn enqueue(
        &mut self,
        agent_id: impl Into<String>,
        kind: EffectKind,
        color: u32,
        duration: Option<Duration>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.effects.push(VisualEffect {
            id,
            agent_id: agent_id.into(),
            kind,
            color,
            started_at: now,
            duration: duration.unwrap_or(self.default_duration),
            seed: hash2d(id as i32, 193),
        });
        id
    }

    /// Drop effects whose duration has elapsed.
    pub fn prune_expired(&mut self, now: Instant) {
        if self.effects.iter().any(|e| e.is_expired(now)) {
            self.effects = std::mem::take(&mut self.effects)
                .into_iter()
                .filter(|e| !e.is_expired(now))
                .collect();
        }
    }

    /// Stable view of the live effects for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> &[VisualEffect] {
        &self.effects
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> EffectQueue {
        EffectQueue::new(Duration::from_millis(700))
    }

    #[test]
    fn test_enqueue_uses_default_duration() {
        let mut q = queue();
        let now = Instant::now();
        q.enqueue("developer", EffectKind::TypeParticles, 0x22c55e, None, now);

        let effect = &q.snapshot()[0];
        assert_eq!(effect.duration, Duration::from_millis(700));
        assert_eq!(effect.agent_id, "developer");
    }

    #[test]
    fn test_prune_keeps_live_effects() {
        let mut q = queue();
        let now = Instant::now();
        q.enqueue("explorer", EffectKind::SearchPulse, 0x06b6d4, None, now);
        q.enqueue(
            "operator",
            EffectKind::RunSpark,
            0xfbbf24,
            Some(Duration::from_millis(100)),
            now,
        );

        q.prune_expired(now + Duration::from_millis(300));
        assert_eq!(q.len(), 1);
        assert_eq!(q.snapshot()[0].agent_id, "explorer");

        q.prune_expired(now + Duration::from_millis(700));
        assert!(q.is_empty());
    }

    #[test]
    fn test_seed_is_deterministic_per_instance() {
        let mut a = queue();
        let mut b = queue();
        let now = Instant::now();

        for _ in 0..3 {
            a.enqueue("validator", EffectKind::ErrorBurst, 0xef4444, None, now);
            b.enqueue("validator", EffectKind::ErrorBurst, 0xef4444, None, now);
        }

        // Same creation order => same seeds, regardless of when they run
        for (ea, eb) in a.snapshot().iter().zip(b.snapshot()) {
            assert_eq!(ea.seed, eb.seed);
        }
        // Distinct instances still vary
        assert_ne!(a.snapshot()[0].seed, a.snapshot()[1].seed);
    }

    #[test]
    fn test_progress_clamps_both_ends() {
        let mut q = queue();
        let now = Instant::now();
        q.enqueue("liaison", EffectKind::TypeParticles, 0xec4899, None, now);
        let effect = &q.snapshot()[0];

        assert_eq!(effect.progress(now), 0.0);
        assert_eq!(effect.progress(now + Duration::from_secs(5)), 1.0);
        let mid = effect.progress(now + Duration::from_millis(350));
        assert!((mid - 0.5).abs() < 0.01);
    }
}
