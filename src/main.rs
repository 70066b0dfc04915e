use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::info;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use trackball_controls::cli::Cli;
use trackball_controls::{ProvenanceGraph, ViewAdapter, WinitInputAdapter};

/// Interactive demo: drives the trackball controller and provenance graph
/// from real window events. No rendering; camera state goes to the log.
struct App {
    args: Cli,
    window: Option<Arc<Window>>,
    view: ViewAdapter,
    input: WinitInputAdapter,
    last_frame: Instant,
    recorded: usize,
}

impl App {
    fn new(args: Cli) -> Self {
        let graph = Rc::new(RefCell::new(ProvenanceGraph::new()));
        let view = ViewAdapter::new(graph);

        {
            let controller = view.controller();
            let mut controller = controller.borrow_mut();
            controller.rotate_speed = args.rotate_speed;
            controller.zoom_speed = args.zoom_speed;
            controller.pan_speed = args.pan_speed;
            controller.damping_factor = args.damping;
            controller.static_moving = args.static_moving;
            controller.min_distance = args.min_distance;
            controller.max_distance = args.max_distance;
        }

        Self {
            args,
            window: None,
            view,
            input: WinitInputAdapter::new(),
            last_frame: Instant::now(),
            recorded: 0,
        }
    }

    fn report_new_commands(&mut self) {
        let graph = self.view.graph();
        let graph = graph.borrow();
        for command in &graph.commands()[self.recorded..] {
            info!(
                "recorded {:?}: {:?} -> {:?}",
                command.kind, command.old.position, command.new.position
            );
        }
        self.recorded = graph.len();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Trackball Controls")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.args.width,
                        self.args.height,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            self.view
                .set_bounds(0.0, 0.0, size.width as f32, size.height as f32);
            self.input.attach(&self.view.controller().borrow());

            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(keycode),
                        repeat: false,
                        ..
                    },
                ..
            } if matches!(keycode, KeyCode::KeyZ | KeyCode::KeyY | KeyCode::KeyR) => {
                match keycode {
                    KeyCode::KeyZ => {
                        let undone = self.view.undo();
                        info!("undo: {}", undone);
                    }
                    KeyCode::KeyY => {
                        let redone = self.view.redo();
                        info!("redo: {}", redone);
                    }
                    KeyCode::KeyR => self.view.controller().borrow_mut().reset(),
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
                self.last_frame = now;

                self.view.update(dt_ms);
                self.report_new_commands();
            }
            other => {
                let controller = self.view.controller();
                let mut controller = controller.borrow_mut();
                self.input.process_event(&mut controller, &other);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let event_loop = EventLoop::new()?;
    let mut app = App::new(args);

    println!("Trackball demo - left drag rotates, right drag pans, wheel zooms");
    println!("Z undo, Y redo, R reset, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
