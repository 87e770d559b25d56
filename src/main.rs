use std::process::ExitCode;

use cube_viewer::{App, ViewerConfig, DEFAULT_LOG_FILTER};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Cannot create the event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(ViewerConfig::default());
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated abnormally: {err}");
        return ExitCode::FAILURE;
    }

    match app.take_setup_error() {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    }
}
