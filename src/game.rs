use anyhow::Result;
use log::{info, trace};
use std::time::{Duration, Instant};
use winit::{dpi::PhysicalSize, event_loop::ActiveEventLoop, window::Window};

use crate::{
	clock::FrameClock,
	draw::{self, FrameBuffer, Sheets},
	input::InputQueue,
	session::{Flow, Session},
};

/// How long the error screen stays up before the process exits.
pub const FAULT_DISPLAY: Duration = Duration::from_millis(2500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	Running,
	ShowingFault { until: Instant },
	Quitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultAction {
	/// Put the error screen up, exit once it has been shown
	ShowThenExit,
	ExitNow,
}

impl RunState {
	/// Only a running game with a window gets to show a fault; a fault before
	/// the window exists, or while one is already on screen, exits right away.
	pub fn on_fault(state: Option<RunState>) -> FaultAction {
		match state {
			Some(RunState::Running) => FaultAction::ShowThenExit,
			Some(RunState::ShowingFault { .. } | RunState::Quitting) | None => FaultAction::ExitNow,
		}
	}

	/// State once the error screen is up at `now`.
	pub fn fault_shown(now: Instant) -> RunState {
		RunState::ShowingFault { until: now + FAULT_DISPLAY }
	}
}

/// Process-wide context, built once when the window comes up and dropped on exit.
pub struct Game {
	// Declared before `window` so the surface goes away first
	frame_buffer: FrameBuffer,
	pub window: Window,
	sheets: Sheets,
	session: Session,
	clock: FrameClock,
	pub inputs: InputQueue,
	pub state: RunState,
}

impl Game {
	pub fn launch(event_loop: &ActiveEventLoop) -> Result<Game> {
		let window = draw::create_window(event_loop)?;
		let frame_buffer = FrameBuffer::new(&window)?;
		let sheets = Sheets::load()?;
		info!("Window ready, {}x{}", frame_buffer.dims.w, frame_buffer.dims.h);
		Ok(Game {
			frame_buffer,
			window,
			sheets,
			session: Session::new(),
			clock: FrameClock::new(Instant::now()),
			inputs: InputQueue::new(),
			state: RunState::Running,
		})
	}

	/// When the event loop should wake us next.
	pub fn deadline(&self) -> Instant {
		match self.state {
			RunState::ShowingFault { until } => until,
			_ => self.clock.deadline(),
		}
	}

	/// Runs a frame if one is due: commands, simulation, drawing.
	pub fn tick(&mut self, now: Instant) -> Result<()> {
		if self.state != RunState::Running || !self.clock.is_due(now) {
			return Ok(());
		}
		let commands = self.inputs.drain();
		if !commands.is_empty() {
			trace!("Frame commands: {commands:?}");
		}
		if self.session.frame(&commands) == Flow::Quit {
			info!("Quitting after {} round(s)", self.session.round());
			self.state = RunState::Quitting;
			return Ok(());
		}

		self.draw_frame();
		self.render()?;

		self.clock.tick(now, self.session.phase().frame_interval());
		trace!("{:.1} fps", self.clock.fps);
		Ok(())
	}

	fn draw_frame(&mut self) {
		let mut canvas = self.frame_buffer.canvas();
		draw::draw_round(&mut canvas, &self.sheets, self.session.world(), self.session.phase());
	}

	/// Puts the error screen over whatever was last drawn.
	pub fn show_fault(&mut self, now: Instant) -> Result<()> {
		let mut canvas = self.frame_buffer.canvas();
		draw::draw_error_overlay(&mut canvas, &self.sheets);
		self.render()?;
		self.state = RunState::fault_shown(now);
		Ok(())
	}

	pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
		self.frame_buffer.resize_surface(size)
	}

	pub fn render(&self) -> Result<()> {
		self.frame_buffer.render()
	}
}
