//! Host-facing effect controller: one per drawing surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::EffectError;
use crate::kinds::EffectKind;
use crate::scheduler::FrameScheduler;
use crate::settings::Settings;
use crate::surface::{Bounds, Sprite, SurfaceProvider};

/// Selects the active effect kind and drives the frame scheduler. Also
/// receives the host's surface and size notifications.
pub struct EffectController {
    scheduler: FrameScheduler,
    sprites: HashMap<EffectKind, Sprite>,
    bounds: Mutex<Bounds>,
    current: Mutex<Option<EffectKind>>,
    // Host asked for the effect and has not stopped it since
    started: AtomicBool,
}

impl EffectController {
    /// Spawns the draw thread. `sprites` maps each kind the host supports to
    /// its sprite; other kinds are rejected by `start`.
    pub fn new<S, I>(provider: S, settings: Settings, sprites: I) -> std::io::Result<Self>
    where
        S: SurfaceProvider,
        I: IntoIterator<Item = (EffectKind, Sprite)>,
    {
        Ok(Self {
            scheduler: FrameScheduler::new(provider, settings)?,
            sprites: sprites.into_iter().collect(),
            bounds: Mutex::new(Bounds::new(settings.screen_width, settings.screen_height)),
            current: Mutex::new(None),
            started: AtomicBool::new(false),
        })
    }

    pub fn start(&self, kind: EffectKind) -> Result<(), EffectError> {
        let sprite = *self.sprites.get(&kind).ok_or(EffectError::MissingSprite(kind))?;
        if self.scheduler.is_released() {
            log::warn!("start({kind}) after release ignored");
            return Ok(());
        }
        *self.current.lock() = Some(kind);
        self.started.store(true, Ordering::Release);
        self.scheduler.start(kind, sprite);
        Ok(())
    }

    /// `start` by kind name, e.g. `"sakura"`.
    pub fn start_named(&self, name: &str) -> Result<(), EffectError> {
        self.start(name.parse()?)
    }

    pub fn stop(&self) {
        self.started.store(false, Ordering::Release);
        self.scheduler.stop();
    }

    /// Tear down the draw thread. Once this returns, nothing touches the
    /// provider or the sprites again.
    pub fn release(&self) {
        self.started.store(false, Ordering::Release);
        self.scheduler.release();
    }

    pub fn resize(&self, width: i32, height: i32) {
        let bounds = Bounds::new(width, height);
        *self.bounds.lock() = bounds;
        self.scheduler.resize(bounds);
        log::debug!("resized to {width}x{height}");
    }

    pub fn bounds(&self) -> Bounds {
        *self.bounds.lock()
    }

    pub fn bounds_width(&self) -> i32 {
        self.bounds().width
    }

    pub fn bounds_height(&self) -> i32 {
        self.bounds().height
    }

    /// Surface (re)created: resume drawing if the effect is wanted.
    pub fn surface_ready(&self) {
        log::debug!("surface ready");
        if self.started.load(Ordering::Acquire) {
            self.scheduler.request_draw();
        }
    }

    /// Surface destroyed: stop touching it, but remember that the effect
    /// is wanted so `surface_ready` can resume it.
    pub fn surface_destroyed(&self) {
        log::debug!("surface destroyed");
        self.scheduler.cancel();
    }

    pub fn update_settings(&self, settings: Settings) {
        self.scheduler.update_settings(settings);
    }

    pub fn current_kind(&self) -> Option<EffectKind> {
        *self.current.lock()
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread::sleep;
    use std::time::Duration;

    use crate::error::SurfaceError;
    use crate::surface::{Canvas, SpriteDraw};

    struct Frame;

    impl Canvas for Frame {
        fn clear(&mut self) {}
        fn draw_sprite(&mut self, _draw: &SpriteDraw) {}
    }

    struct CountingProvider {
        ready: Arc<AtomicBool>,
        presents: Arc<AtomicUsize>,
    }

    impl SurfaceProvider for CountingProvider {
        type Target = Frame;

        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn acquire_target(&mut self) -> Result<Frame, SurfaceError> {
            if self.is_ready() {
                Ok(Frame)
            } else {
                Err(SurfaceError::NotReady)
            }
        }

        fn present(&mut self, _target: Frame) -> Result<(), SurfaceError> {
            self.presents.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Harness {
        controller: EffectController,
        ready: Arc<AtomicBool>,
        presents: Arc<AtomicUsize>,
    }

    impl Harness {
        fn new() -> Self {
            let ready = Arc::new(AtomicBool::new(true));
            let presents = Arc::new(AtomicUsize::new(0));
            let provider = CountingProvider {
                ready: ready.clone(),
                presents: presents.clone(),
            };
            let settings = Settings {
                startup_delay_ms: 10,
                frame_interval_ms: 5,
                rng_seed: Some(3),
                ..Settings::default()
            };
            let controller = EffectController::new(provider, settings, [(EffectKind::Sakura, Sprite::new(1, 24, 24))])
                .expect("spawn draw thread");
            Self {
                controller,
                ready,
                presents,
            }
        }

        fn presents(&self) -> usize {
            self.presents.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn rejects_kinds_without_a_sprite() {
        let h = Harness::new();
        assert_eq!(h.controller.start(EffectKind::Snow), Err(EffectError::MissingSprite(EffectKind::Snow)));
        assert!(!h.controller.is_active());
        assert_eq!(h.controller.current_kind(), None);
    }

    #[test]
    fn unknown_name_keeps_the_running_effect() {
        let h = Harness::new();
        h.controller.start_named("sakura").expect("sakura is registered");
        assert_eq!(
            h.controller.start_named("fireworks"),
            Err(EffectError::UnknownKind("fireworks".into()))
        );
        assert!(h.controller.is_active());
        assert_eq!(h.controller.current_kind(), Some(EffectKind::Sakura));
    }

    #[test]
    fn resize_updates_bounds() {
        let h = Harness::new();
        assert_eq!(h.controller.bounds(), Bounds::new(320, 170));
        h.controller.resize(1080, 1920);
        assert_eq!(h.controller.bounds_width(), 1080);
        assert_eq!(h.controller.bounds_height(), 1920);
    }

    #[test]
    fn surface_lifecycle_pauses_and_resumes() {
        let h = Harness::new();
        h.controller.start(EffectKind::Sakura).expect("start");
        sleep(Duration::from_millis(100));
        assert!(h.presents() > 0);

        h.ready.store(false, Ordering::SeqCst);
        h.controller.surface_destroyed();
        sleep(Duration::from_millis(50));
        let paused = h.presents();
        sleep(Duration::from_millis(50));
        assert_eq!(h.presents(), paused);

        h.ready.store(true, Ordering::SeqCst);
        h.controller.surface_ready();
        sleep(Duration::from_millis(100));
        assert!(h.presents() > paused);
    }

    #[test]
    fn surface_ready_after_stop_stays_quiet() {
        let h = Harness::new();
        h.controller.start(EffectKind::Sakura).expect("start");
        sleep(Duration::from_millis(50));
        h.controller.stop();
        sleep(Duration::from_millis(50));
        let stopped = h.presents();

        h.controller.surface_ready();
        sleep(Duration::from_millis(100));
        assert_eq!(h.presents(), stopped);
    }

    #[test]
    fn release_twice_then_start_is_harmless() {
        let h = Harness::new();
        h.controller.start(EffectKind::Sakura).expect("start");
        sleep(Duration::from_millis(50));
        h.controller.release();
        h.controller.release();
        let released = h.presents();

        assert_eq!(h.controller.start(EffectKind::Sakura), Ok(()));
        h.controller.stop();
        h.controller.surface_ready();
        sleep(Duration::from_millis(50));
        assert!(!h.controller.is_active());
        assert_eq!(h.presents(), released);
    }
}
