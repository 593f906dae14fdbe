mod clock;
mod coords;
mod draw;
mod fault;
mod game;
mod gameloop;
mod input;
mod session;
mod world;

use log::info;

fn main() {
	env_logger::init();
	fault::install_panic_hook();
	info!("Starting");
	// Faults end the process normally, after they've been reported
	if let Err(e) = gameloop::game_run() {
		fault::report("Event loop failed", &e);
	}
}
