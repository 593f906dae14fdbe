use log::{debug, info};
use std::time::Duration;

use crate::world::{StepOutcome, World};

const PLAYING_FPS: u32 = 60;
const LOST_FPS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Playing,
	LostAwaitingDecision,
}

impl Phase {
	pub fn frame_interval(self) -> Duration {
		let fps = match self {
			Phase::Playing => PLAYING_FPS,
			Phase::LostAwaitingDecision => LOST_FPS,
		};
		Duration::from_secs(1) / fps
	}
}

/// What the player asked for, already stripped of keyboard details.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
	Jump,
	Restart,
	Decline,
	Close,
}

/// Quitting travels back up as a value, it is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Quit,
}

/// Outer "play until quit" cycle: owns the current round and which phase it is in.
#[derive(Debug)]
pub struct Session {
	phase: Phase,
	world: World,
	round: u32,
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

impl Session {
	pub fn new() -> Self {
		info!("Round 1 starts");
		Session { phase: Phase::Playing, world: World::start(), round: 1 }
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn world(&self) -> &World {
		&self.world
	}

	pub fn round(&self) -> u32 {
		self.round
	}

	/// Runs one frame with every command gathered since the previous one.
	/// The phase at the start of the frame decides how the whole batch is read.
	pub fn frame(&mut self, commands: &[Command]) -> Flow {
		match self.phase {
			Phase::Playing => self.playing_frame(commands),
			Phase::LostAwaitingDecision => self.lost_frame(commands),
		}
	}

	fn playing_frame(&mut self, commands: &[Command]) -> Flow {
		for command in commands {
			match command {
				Command::Close => return Flow::Quit,
				Command::Jump => {
					self.world.jump();
				},
				Command::Restart | Command::Decline => {},
			}
		}
		if self.world.step() == StepOutcome::Collision {
			info!("Round {} lost with score {}", self.round, self.world.score);
			self.enter(Phase::LostAwaitingDecision);
		}
		Flow::Continue
	}

	fn lost_frame(&mut self, commands: &[Command]) -> Flow {
		let mut restart = false;
		for command in commands {
			match command {
				Command::Close | Command::Decline => return Flow::Quit,
				Command::Restart => restart = true,
				Command::Jump => {},
			}
		}
		if restart {
			self.reset();
		}
		Flow::Continue
	}

	fn reset(&mut self) {
		self.world = World::start();
		self.round += 1;
		info!("Restarting, round {} starts", self.round);
		self.enter(Phase::Playing);
	}

	fn enter(&mut self, phase: Phase) {
		debug!("Phase {:?} -> {:?}", self.phase, phase);
		self.phase = phase;
	}
}
