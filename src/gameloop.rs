use anyhow::{Context, Result};
use log::{error, info};
use std::time::Instant;
use winit::{
	application::ApplicationHandler,
	event::{KeyEvent, WindowEvent},
	event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
};

use crate::{
	fault,
	game::{FaultAction, Game, RunState},
	session::Command,
};

#[derive(Default)]
struct EventLoopState {
	game_opt: Option<Game>,
}

impl EventLoopState {
	/// The one place faults are caught. The first one is logged, written to
	/// `error.log` and shown on screen for a moment; anything after that, or a
	/// fault before there is a window to draw on, exits right away.
	fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
		fault::report("Unexpected fault", &err);
		let action = RunState::on_fault(self.game_opt.as_ref().map(|game| game.state));
		match (action, self.game_opt.as_mut()) {
			(FaultAction::ShowThenExit, Some(game)) => {
				if let Err(e) = game.show_fault(Instant::now()) {
					error!("Could not display the error screen: {}", fault::describe(&e));
					event_loop.exit();
				}
			},
			_ => event_loop.exit(),
		}
	}
}

impl ApplicationHandler for EventLoopState {
	fn resumed(&mut self, event_loop: &ActiveEventLoop) {
		if self.game_opt.is_some() {
			return;
		}
		match Game::launch(event_loop) {
			Ok(game) => self.game_opt = Some(game),
			Err(e) => self.fail(event_loop, e),
		}
	}

	fn window_event(
		&mut self,
		event_loop: &ActiveEventLoop,
		window_id: winit::window::WindowId,
		event: WindowEvent,
	) {
		let Some(game) = self.game_opt.as_mut() else {
			return;
		};
		if window_id != game.window.id() {
			return;
		}
		let result = match event {
			WindowEvent::CloseRequested => {
				if game.state == RunState::Running {
					game.inputs.push(Command::Close);
				} else {
					event_loop.exit();
				}
				Ok(())
			},
			WindowEvent::Resized(size) => game.resize(size),
			WindowEvent::RedrawRequested => game.render(),
			WindowEvent::KeyboardInput {
				event: KeyEvent { ref logical_key, state, repeat, .. }, ..
			} => {
				game.inputs.push_key(state, logical_key, repeat);
				Ok(())
			},
			_ => Ok(()),
		};
		if let Err(e) = result {
			self.fail(event_loop, e);
		}
	}

	fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
		let Some(game) = self.game_opt.as_mut() else {
			return;
		};
		let now = Instant::now();
		if let Err(e) = game.tick(now) {
			self.fail(event_loop, e);
		}
		let Some(game) = self.game_opt.as_ref() else {
			return;
		};
		match game.state {
			RunState::Quitting => event_loop.exit(),
			RunState::ShowingFault { until } if now >= until => event_loop.exit(),
			_ => event_loop.set_control_flow(ControlFlow::WaitUntil(game.deadline())),
		}
	}

	fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
		info!("Shutting down");
		// Surface and window are released here, before the loop returns
		self.game_opt = None;
	}
}

pub fn game_run() -> Result<()> {
	let event_loop = EventLoop::new().context("could not create the event loop")?;
	event_loop.set_control_flow(ControlFlow::Poll);
	let mut loop_state = EventLoopState::default();
	event_loop.run_app(&mut loop_state).context("event loop failed")
}
