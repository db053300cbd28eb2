//! main.rs - Desktop simulator for the petalfall overlay
//! The window lives on the main thread; frames come from the draw thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use parking_lot::Mutex;

use petalfall::{
    DrawTargetCanvas, EffectController, EffectKind, Settings, Sprite, SurfaceError, SurfaceProvider,
};

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const PETAL_PINK: Rgb565 = Rgb565::new(31, 40, 26);

type Frame = SimulatorDisplay<Rgb565>;

/// Double buffer: the draw thread renders into a fresh display and swaps it
/// into `front`, the window shows whatever was presented last.
struct SimulatorSurface {
    size: Size,
    ready: Arc<AtomicBool>,
    front: Arc<Mutex<Option<Frame>>>,
}

impl SurfaceProvider for SimulatorSurface {
    type Target = DrawTargetCanvas<Frame>;

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn acquire_target(&mut self) -> Result<Self::Target, SurfaceError> {
        if !self.is_ready() {
            return Err(SurfaceError::NotReady);
        }
        Ok(DrawTargetCanvas::new(SimulatorDisplay::new(self.size), BACKGROUND, PETAL_PINK))
    }

    fn present(&mut self, target: Self::Target) -> Result<(), SurfaceError> {
        *self.front.lock() = Some(target.into_inner());
        Ok(())
    }
}

fn draw_overlay(display: &mut Frame, kind: EffectKind, active: bool, settings: &Settings) {
    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::new(0, 40, 31));
    let status = format!("{kind} {}", if active { "running" } else { "stopped" });
    Text::with_baseline(&status, Point::new(5, 5), style, Baseline::Top)
        .draw(display)
        .unwrap();

    let hint_style = MonoTextStyle::new(&FONT_6X10, Rgb565::new(0, 20, 15));
    Text::with_baseline(
        "Space: Start/Stop | K: Kind | Q: Quit",
        Point::new(5, settings.screen_height - 15),
        hint_style,
        Baseline::Top,
    )
    .draw(display)
    .unwrap();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = Settings::default();
    let size = Size::new(settings.screen_width as u32, settings.screen_height as u32);
    let ready = Arc::new(AtomicBool::new(false));
    let front = Arc::new(Mutex::new(None));

    let surface = SimulatorSurface {
        size,
        ready: ready.clone(),
        front: front.clone(),
    };
    let controller = EffectController::new(
        surface,
        settings,
        [
            (EffectKind::Sakura, Sprite::new(1, 24, 24)),
            (EffectKind::Snow, Sprite::new(2, 10, 10)),
        ],
    )?;

    let output_settings = OutputSettingsBuilder::new().scale(3).build();
    let mut window = Window::new("Petalfall", &output_settings);
    let mut shown: Frame = SimulatorDisplay::new(size);

    let mut kind = EffectKind::Sakura;
    controller.start(kind)?;
    ready.store(true, Ordering::Release);
    controller.surface_ready();

    println!("=== Petalfall ===");
    println!("Controls:");
    println!("  Space: Start/stop the effect");
    println!("  K: Next effect kind");
    println!("  Q: Quit");

    let poll_interval = Duration::from_millis(settings.frame_interval_ms);
    'main_loop: loop {
        if let Some(frame) = front.lock().take() {
            shown = frame;
        }
        draw_overlay(&mut shown, kind, controller.is_active(), &settings);
        window.update(&shown);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key = format!("{:?}", keycode).to_lowercase();
                    match key.as_str() {
                        "space" => {
                            if controller.is_active() {
                                controller.stop();
                            } else {
                                controller.start(kind)?;
                            }
                        }
                        "k" => {
                            kind = kind.next();
                            controller.start(kind)?;
                        }
                        "q" => break 'main_loop,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        thread::sleep(poll_interval);
    }

    ready.store(false, Ordering::Release);
    controller.surface_destroyed();
    controller.release();
    Ok(())
}
