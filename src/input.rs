use log::trace;
use smol_str::SmolStr;
use winit::{
	event::ElementState,
	keyboard::{Key, NamedKey},
};

use crate::session::Command;

/// Commands coming from the window, held until the next frame reads them in order.
#[derive(Debug, Default)]
pub struct InputQueue {
	pending: Vec<Command>,
}

impl InputQueue {
	pub fn new() -> InputQueue {
		InputQueue { ..Default::default() }
	}

	pub fn push(&mut self, command: Command) {
		trace!("Queued {command:?}");
		self.pending.push(command);
	}

	pub fn push_key(&mut self, state: ElementState, key: &Key, repeat: bool) {
		if let Some(command) = command_for_key(state, key, repeat) {
			self.push(command);
		}
	}

	pub fn drain(&mut self) -> Vec<Command> {
		std::mem::take(&mut self.pending)
	}
}

/// Only fresh presses count, key repeat and releases are dropped.
pub fn command_for_key(state: ElementState, key: &Key, repeat: bool) -> Option<Command> {
	if !matches!(state, ElementState::Pressed) || repeat {
		return None;
	}
	match key {
		Key::Named(NamedKey::Space) => Some(Command::Jump),
		Key::Character(c) => command_for_char(c),
		_ => None,
	}
}

fn command_for_char(c: &SmolStr) -> Option<Command> {
	match c.as_str() {
		"y" | "Y" => Some(Command::Restart),
		"n" | "N" => Some(Command::Decline),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn character(s: &str) -> Key {
		Key::Character(SmolStr::new(s))
	}

	#[test]
	fn maps_the_three_keys() {
		let pressed = ElementState::Pressed;
		assert_eq!(command_for_key(pressed, &Key::Named(NamedKey::Space), false), Some(Command::Jump));
		assert_eq!(command_for_key(pressed, &character("y"), false), Some(Command::Restart));
		assert_eq!(command_for_key(pressed, &character("N"), false), Some(Command::Decline));
	}

	#[test]
	fn ignores_other_keys_releases_and_repeats() {
		assert_eq!(command_for_key(ElementState::Pressed, &character("x"), false), None);
		assert_eq!(
			command_for_key(ElementState::Pressed, &Key::Named(NamedKey::Escape), false),
			None
		);
		assert_eq!(
			command_for_key(ElementState::Released, &Key::Named(NamedKey::Space), false),
			None
		);
		assert_eq!(command_for_key(ElementState::Pressed, &character("y"), true), None);
	}

	#[test]
	fn queue_keeps_arrival_order_and_empties() {
		let mut queue = InputQueue::new();
		queue.push_key(ElementState::Pressed, &character("y"), false);
		queue.push_key(ElementState::Pressed, &character("q"), false);
		queue.push(Command::Close);
		queue.push_key(ElementState::Pressed, &Key::Named(NamedKey::Space), false);
		assert_eq!(queue.drain(), vec![Command::Restart, Command::Close, Command::Jump]);
		assert!(queue.drain().is_empty());
	}
}
