use cgmath::Point2;
use log::debug;

use crate::coords::{Dimensions, Rect, RectF};

/// Fixed values every round starts from. Units are pixels and frames.
pub struct RoundConstants {
	pub playfield: Dimensions<f32>,
	pub player_start: Point2<f32>,
	pub player_size: Dimensions<f32>,
	pub jump_velocity: f32,
	pub gravity: f32,
	pub obstacle_y: f32,
	pub obstacle_size: Dimensions<f32>,
	pub obstacle_speed: f32,
}

pub const ROUND: RoundConstants = RoundConstants {
	playfield: Dimensions { w: 800., h: 400. },
	player_start: Point2 { x: 100., y: 300. },
	player_size: Dimensions { w: 40., h: 40. },
	jump_velocity: -10.,
	gravity: 0.5,
	obstacle_y: 300.,
	obstacle_size: Dimensions { w: 40., h: 40. },
	obstacle_speed: 5.,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
	pub pos: Point2<f32>,
	pub size: Dimensions<f32>,
	/// Vertical only, negative is upward
	pub vel_y: f32,
	pub airborne: bool,
}

impl Player {
	fn new() -> Self {
		Self { pos: ROUND.player_start, size: ROUND.player_size, vel_y: 0., airborne: false }
	}

	/// The ground is the height the player starts at.
	pub fn ground_y() -> f32 {
		ROUND.player_start.y
	}

	/// Returns false when already in the air, jumps don't stack.
	pub fn jump(&mut self) -> bool {
		if self.airborne {
			return false;
		}
		self.airborne = true;
		self.vel_y = ROUND.jump_velocity;
		true
	}

	fn update_pos(&mut self) {
		if !self.airborne {
			return;
		}
		self.pos.y += self.vel_y;
		self.vel_y += ROUND.gravity;
		if self.pos.y >= Self::ground_y() {
			self.pos.y = Self::ground_y();
			self.vel_y = 0.;
			self.airborne = false;
		}
	}

	pub fn rect(&self) -> RectF {
		Rect::new(self.pos, self.size)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
	pub pos: Point2<f32>,
	pub size: Dimensions<f32>,
	speed: f32,
}

impl Obstacle {
	fn new() -> Self {
		Self {
			pos: Point2 { x: ROUND.playfield.w, y: ROUND.obstacle_y },
			size: ROUND.obstacle_size,
			speed: ROUND.obstacle_speed,
		}
	}

	/// Moves left, and back to the right edge once fully off-screen.
	/// Returns true on the frame it wraps.
	fn update_pos(&mut self, playfield: Dimensions<f32>) -> bool {
		self.pos.x -= self.speed;
		if self.pos.x < -self.size.w {
			self.pos.x = playfield.w;
			return true;
		}
		false
	}

	pub fn rect(&self) -> RectF {
		Rect::new(self.pos, self.size)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
	Clear,
	Collision,
}

/// Everything a single round owns.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
	pub player: Player,
	pub obstacle: Obstacle,
	pub score: u32,
	boundaries: Dimensions<f32>,
}

impl World {
	pub fn start() -> Self {
		Self {
			player: Player::new(),
			obstacle: Obstacle::new(),
			score: 0,
			boundaries: ROUND.playfield,
		}
	}

	pub fn jump(&mut self) -> bool {
		self.player.jump()
	}

	/// Advances the round by one frame: jump arc, obstacle, then collision.
	pub fn step(&mut self) -> StepOutcome {
		self.player.update_pos();

		if self.obstacle.update_pos(self.boundaries) {
			self.score += 1;
			debug!("Obstacle passed, score is now {}", self.score);
		}

		if self.player.rect().collides(self.obstacle.rect()) {
			StepOutcome::Collision
		} else {
			StepOutcome::Clear
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Frames until the first collision when nobody presses anything
	fn frames_until_collision(world: &mut World) -> u32 {
		let mut frames = 0;
		loop {
			frames += 1;
			if world.step() == StepOutcome::Collision {
				return frames;
			}
			assert!(frames < 10_000, "never collided");
		}
	}

	#[test]
	fn start_matches_constants() {
		let world = World::start();
		assert_eq!(world.player.pos, Point2::new(100., 300.));
		assert_eq!(world.player.size, Dimensions { w: 40., h: 40. });
		assert_eq!(world.player.vel_y, 0.);
		assert!(!world.player.airborne);
		assert_eq!(world.obstacle.pos, Point2::new(800., 300.));
		assert_eq!(world.score, 0);
	}

	#[test]
	fn grounded_player_stays_put() {
		let mut world = World::start();
		for _ in 0..100 {
			world.step();
			assert_eq!(world.player.pos.y, 300.);
			assert_eq!(world.player.vel_y, 0.);
			assert!(!world.player.airborne);
		}
	}

	#[test]
	fn first_collision_on_frame_132() {
		let mut world = World::start();
		assert_eq!(frames_until_collision(&mut world), 132);
		// Touching edges already count
		assert_eq!(world.obstacle.pos.x, 140.);
	}

	#[test]
	fn no_collision_one_frame_earlier() {
		let mut world = World::start();
		for _ in 0..131 {
			assert_eq!(world.step(), StepOutcome::Clear);
		}
		assert_eq!(world.obstacle.pos.x, 145.);
	}

	#[test]
	fn jump_lands_after_41_frames() {
		let mut player = Player::new();
		assert!(player.jump());
		let mut frames = 0;
		while player.airborne {
			player.update_pos();
			frames += 1;
		}
		assert_eq!(frames, 41);
		assert_eq!(player.pos.y, 300.);
		assert_eq!(player.vel_y, 0.);
	}

	#[test]
	fn jump_rises_then_falls() {
		let mut player = Player::new();
		player.jump();
		let mut heights = vec![player.pos.y];
		while player.airborne {
			player.update_pos();
			heights.push(player.pos.y);
		}
		let apex = heights
			.iter()
			.cloned()
			.fold(f32::INFINITY, f32::min);
		assert_eq!(apex, 195.);
		let apex_index = heights.iter().position(|&y| y == apex).unwrap_or_default();
		assert!(heights[..=apex_index].windows(2).all(|w| w[1] <= w[0]));
		// The apex is held for one frame while the velocity crosses zero
		assert_eq!(heights[apex_index + 1], apex);
		assert!(heights[apex_index + 1..].windows(2).all(|w| w[1] > w[0]));
	}

	#[test]
	fn jump_ignored_while_airborne() {
		let mut player = Player::new();
		assert!(player.jump());
		player.update_pos();
		let vel = player.vel_y;
		assert!(!player.jump());
		assert_eq!(player.vel_y, vel);
	}

	#[test]
	fn obstacle_wraps_and_scores_once() {
		let mut world = World::start();
		let mut obstacle = world.obstacle.clone();
		let mut wraps = 0;
		for frame in 1..=400 {
			let before = obstacle.pos.x;
			if obstacle.update_pos(world.boundaries) {
				wraps += 1;
				assert_eq!(before - 5., -45.);
				assert_eq!(obstacle.pos.x, 800.);
				assert_eq!(frame % 169, 0);
			}
		}
		assert_eq!(wraps, 2);

		// Same thing through the world, with the player out of the way
		world.player.pos.y = -1000.;
		for _ in 0..168 {
			world.step();
		}
		assert_eq!(world.score, 0);
		assert_eq!(world.obstacle.pos.x, -40.);
		world.step();
		assert_eq!(world.score, 1);
		assert_eq!(world.obstacle.pos.x, 800.);
		world.step();
		assert_eq!(world.score, 1);
	}

	#[test]
	fn well_timed_jump_clears_obstacle() {
		let mut world = World::start();
		for _ in 0..119 {
			assert_eq!(world.step(), StepOutcome::Clear);
		}
		assert!(world.jump());
		for _ in 0..60 {
			assert_eq!(world.step(), StepOutcome::Clear);
		}
		assert_eq!(world.score, 1);
		assert!(!world.player.airborne);
		assert_eq!(world.player.pos.y, 300.);
		assert_eq!(world.obstacle.pos.x, 750.);
	}

	#[test]
	fn late_jump_still_collides() {
		let mut world = World::start();
		for _ in 0..131 {
			world.step();
		}
		world.jump();
		assert_eq!(frames_until_collision(&mut world), 1);
	}
}
