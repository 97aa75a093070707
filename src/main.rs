use anyhow::Context;
use clap::Parser;
use glam::{vec3, Vec3};
use glutin::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};
use log::{error, info, warn};
use std::path::PathBuf;
use whitted::{
    camera::Camera,
    cli::Args,
    config::Config,
    controls::Action,
    framebuffer::FrameBuffer,
    logger::init_logger,
    render::{render, RenderContext, RenderStats},
    scene::{Light, Scene},
    tracer::TraceSettings,
};

const MOVE_STEP: f32 = 0.25;
const TURN_STEP: f32 = 0.05;
const ROLL_STEP: f32 = 5.0;
const FOV_STEP: f32 = 5.0;
const LIGHT_STEP: f32 = 0.5;
const TINT_STEP: f32 = 0.1;

/// Owns everything a render pass needs and the buffer it writes to
struct Viewer {
    scene: Scene,
    light: Light,
    camera: Camera,
    settings: TraceSettings,
    threads: usize,
    buffer: FrameBuffer,
    output: PathBuf,
}

impl Viewer {
    fn new(config: &Config) -> Self {
        Self {
            scene: config.scene(),
            light: config.light(),
            camera: config.camera(),
            settings: config.settings(),
            threads: config.threads,
            buffer: FrameBuffer::new(config.width as usize, config.height as usize),
            output: config.output.clone(),
        }
    }

    fn render(&mut self) -> anyhow::Result<RenderStats> {
        let context = RenderContext {
            scene: &self.scene,
            light: &self.light,
            camera: &self.camera,
            settings: self.settings,
        };

        render(&context, &mut self.buffer, self.threads)
    }

    fn save(&self) -> anyhow::Result<()> {
        if self.buffer.as_bytes().is_empty() {
            warn!("Nothing to save, the frame buffer is empty");
            return Ok(());
        }

        self.buffer.save_png(&self.output)
    }
}

fn action_for(key: VirtualKeyCode) -> Option<Action> {
    let action = match key {
        VirtualKeyCode::Left => Action::MoveCamera(vec3(-MOVE_STEP, 0.0, 0.0)),
        VirtualKeyCode::Right => Action::MoveCamera(vec3(MOVE_STEP, 0.0, 0.0)),
        VirtualKeyCode::Up => Action::MoveCamera(vec3(0.0, MOVE_STEP, 0.0)),
        VirtualKeyCode::Down => Action::MoveCamera(vec3(0.0, -MOVE_STEP, 0.0)),
        VirtualKeyCode::PageUp => Action::MoveCamera(vec3(0.0, 0.0, -MOVE_STEP)),
        VirtualKeyCode::PageDown => Action::MoveCamera(vec3(0.0, 0.0, MOVE_STEP)),
        VirtualKeyCode::J => Action::TurnCamera(vec3(-TURN_STEP, 0.0, 0.0)),
        VirtualKeyCode::L => Action::TurnCamera(vec3(TURN_STEP, 0.0, 0.0)),
        VirtualKeyCode::I => Action::TurnCamera(vec3(0.0, TURN_STEP, 0.0)),
        VirtualKeyCode::K => Action::TurnCamera(vec3(0.0, -TURN_STEP, 0.0)),
        VirtualKeyCode::Q => Action::Roll(-ROLL_STEP),
        VirtualKeyCode::E => Action::Roll(ROLL_STEP),
        VirtualKeyCode::Minus => Action::Zoom(-FOV_STEP),
        VirtualKeyCode::Equals => Action::Zoom(FOV_STEP),
        VirtualKeyCode::Key1 => Action::MoveLight(vec3(-LIGHT_STEP, 0.0, 0.0)),
        VirtualKeyCode::Key2 => Action::MoveLight(vec3(LIGHT_STEP, 0.0, 0.0)),
        VirtualKeyCode::Key3 => Action::MoveLight(vec3(0.0, -LIGHT_STEP, 0.0)),
        VirtualKeyCode::Key4 => Action::MoveLight(vec3(0.0, LIGHT_STEP, 0.0)),
        VirtualKeyCode::Key5 => Action::MoveLight(vec3(0.0, 0.0, -LIGHT_STEP)),
        VirtualKeyCode::Key6 => Action::MoveLight(vec3(0.0, 0.0, LIGHT_STEP)),
        VirtualKeyCode::Key7 => Action::TintLight(Vec3::one() * -TINT_STEP),
        VirtualKeyCode::Key8 => Action::TintLight(Vec3::one() * TINT_STEP),
        _ => return None,
    };

    Some(action)
}

fn redraw(viewer: &mut Viewer, window: &Window) {
    match viewer.render() {
        Ok(stats) => window.set_title(&format!(
            "Whitted - {}x{} in {:.2?}",
            viewer.buffer.width(),
            viewer.buffer.height(),
            stats.duration
        )),
        Err(err) => error!("Render failed: {:?}", err),
    }
}

fn run_window(mut viewer: Viewer) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Whitted")
        .with_inner_size(PhysicalSize::new(
            viewer.buffer.width() as u32,
            viewer.buffer.height() as u32,
        ))
        .build(&event_loop)
        .context("Failed to create window")?;

    let size = window.inner_size();
    viewer.buffer.resize(size.width as usize, size.height as usize);
    redraw(&mut viewer, &window);

    // Main event loop
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    viewer.buffer.resize(size.width as usize, size.height as usize);
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match key {
                    VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                    VirtualKeyCode::R | VirtualKeyCode::Space => redraw(&mut viewer, &window),
                    VirtualKeyCode::S => {
                        info!("Saving rendered image...");
                        if let Err(err) = viewer.save() {
                            error!("{:?}", err);
                        }
                    }
                    key => {
                        if let Some(action) = action_for(key) {
                            action.apply(&mut viewer.camera, &mut viewer.light);
                            info!(
                                "{:?} -> camera {:?}, light {:?}",
                                action, viewer.camera, viewer.light
                            );
                            redraw(&mut viewer, &window);
                        }
                    }
                },
                _ => (),
            }
        }
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(output) = args.output {
        config.output = output;
    }

    let mut viewer = Viewer::new(&config);

    if args.headless {
        viewer.render()?;
        return viewer.save();
    }

    run_window(viewer)
}
