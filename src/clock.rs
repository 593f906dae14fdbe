use std::time::{Duration, Instant};

/// Paces frames at a target rate, in the spirit of a game clock `tick`.
/// The event loop sleeps until `deadline()` instead of blocking a thread.
#[derive(Clone, Debug)]
pub struct FrameClock {
	deadline: Instant,
	last_frame: Option<Instant>,
	/// Smoothed measured rate, only for logs
	pub fps: f64,
}

impl FrameClock {
	pub fn new(now: Instant) -> Self {
		FrameClock { deadline: now, last_frame: None, fps: 0. }
	}

	pub fn deadline(&self) -> Instant {
		self.deadline
	}

	pub fn is_due(&self, now: Instant) -> bool {
		now >= self.deadline
	}

	/// Records a frame that ran at `now` and schedules the next one `interval` later.
	/// A late frame starts the schedule over instead of bursting to catch up.
	pub fn tick(&mut self, now: Instant, interval: Duration) {
		if let Some(last) = self.last_frame {
			let dt = now.saturating_duration_since(last).as_secs_f64();
			if dt > 0. {
				self.fps = if self.fps == 0. { 1. / dt } else { 0.9 * self.fps + 0.1 / dt };
			}
		}
		self.last_frame = Some(now);

		let next = self.deadline + interval;
		self.deadline = if next <= now { now + interval } else { next };
	}
}
