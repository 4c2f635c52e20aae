//! Linear position tweens
//!
//! Minimal stand-in for an engine tween scheduler: each tween moves a point
//! from `from` to `to` over `duration` seconds after `delay` seconds, and a
//! `Timeline` advances a set of them on one clock.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    /// Seconds before the tween starts
    pub delay: f32,
    /// Seconds from start to finish
    pub duration: f32,
}

impl Tween {
    #[inline]
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Position at timeline time `t` (`None` before the tween starts)
    pub fn sample(&self, t: f32) -> Option<Vec2> {
        if t < self.delay {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(self.to);
        }
        let progress = ((t - self.delay) / self.duration).clamp(0.0, 1.0);
        Some(self.from.lerp(self.to, progress))
    }
}

/// One update emitted while advancing a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenUpdate {
    /// Index of the tween in the timeline
    pub index: usize,
    pub position: Vec2,
    /// This update is the tween's last
    pub finished: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
    done: Vec<bool>,
    elapsed: f32,
}

impl Timeline {
    /// Tweens played back to back: each waits for the ones before it
    pub fn sequence(legs: impl IntoIterator<Item = (Vec2, Vec2, f32)>) -> Self {
        let mut delay = 0.0;
        let tweens: Vec<Tween> = legs
            .into_iter()
            .map(|(from, to, duration)| {
                let tween = Tween {
                    from,
                    to,
                    delay,
                    duration,
                };
                delay += duration;
                tween
            })
            .collect();
        let done = vec![false; tweens.len()];
        Self {
            tweens,
            done,
            elapsed: 0.0,
        }
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        self.tweens.iter().map(Tween::end_time).fold(0.0, f32::max)
    }

    pub fn is_finished(&self) -> bool {
        self.done.iter().all(|d| *d)
    }

    /// Move the clock forward and report every running tween's position,
    /// in tween order
    pub fn advance(&mut self, dt: f32) -> Vec<TweenUpdate> {
        self.elapsed += dt.max(0.0);
        let now = self.elapsed;
        let mut updates = Vec::new();
        for (index, tween) in self.tweens.iter().enumerate() {
            if self.done[index] {
                continue;
            }
            let Some(position) = tween.sample(now) else {
                continue;
            };
            let finished = now >= tween.end_time();
            self.done[index] = finished;
            updates.push(TweenUpdate {
                index,
                position,
                finished,
            });
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_linear_and_clamped() {
        let t = Tween {
            from: Vec2::ZERO,
            to: Vec2::new(10.0, 0.0),
            delay: 1.0,
            duration: 2.0,
        };
        assert_eq!(t.sample(0.5), None);
        assert_eq!(t.sample(2.0), Some(Vec2::new(5.0, 0.0)));
        assert_eq!(t.sample(9.0), Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_sequence_runs_back_to_back() {
        let mut tl = Timeline::sequence([
            (Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0),
            (Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), 0.5),
        ]);
        assert_eq!(tl.tweens()[1].delay, 1.0);
        assert_eq!(tl.duration(), 1.5);

        let first = tl.advance(0.5);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].index, 0);
        assert!(!first[0].finished);

        // Crossing the boundary finishes the first and starts the second
        let second = tl.advance(0.75);
        assert_eq!(second.len(), 2);
        assert!(second[0].finished);
        assert_eq!(second[0].position, Vec2::new(1.0, 0.0));
        assert_eq!(second[1].index, 1);

        let last = tl.advance(1.0);
        assert_eq!(last.len(), 1);
        assert!(last[0].finished);
        assert!(tl.is_finished());
        assert!(tl.advance(1.0).is_empty());
    }

    #[test]
    fn test_zero_duration_fires_once() {
        let mut tl = Timeline::sequence([(Vec2::ZERO, Vec2::ONE, 0.0)]);
        let updates = tl.advance(0.0);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].position, Vec2::ONE);
        assert!(tl.is_finished());
    }

    #[test]
    fn test_empty_timeline_is_finished() {
        let mut tl = Timeline::sequence(std::iter::empty());
        assert!(tl.is_finished());
        assert!(tl.advance(1.0).is_empty());
    }
}
