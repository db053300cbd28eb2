//! Background frame scheduler: one dedicated thread that owns the pool and
//! the drawing surface, ticking at a fixed interval while active.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::error::SurfaceError;
use crate::kinds::EffectKind;
use crate::particle::{make_rng, SpawnEnv};
use crate::pool::ParticlePool;
use crate::settings::Settings;
use crate::surface::{Bounds, Canvas, Sprite, SurfaceProvider};

/// Fixed pool storage; `Settings::pool_capacity` can only lower it.
pub const POOL_STORAGE: usize = 64;

enum Command {
    Start {
        kind: EffectKind,
        sprite: Sprite,
        settings: Settings,
        deadline: Instant,
    },
    /// Replace any pending tick with a draw tick at `deadline`
    Schedule(Instant),
    /// Drop the pending tick, no clear
    Cancel,
    /// Drop the pending tick and clear the surface once
    Clear,
    Resize(Bounds),
    Quit,
}

pub struct FrameScheduler {
    commands: Sender<Command>,
    active: Arc<AtomicBool>,
    released: AtomicBool,
    settings: Mutex<Settings>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FrameScheduler {
    /// Spawn the ticking thread. It idles until `start`.
    pub fn new<S: SurfaceProvider>(provider: S, settings: Settings) -> std::io::Result<Self> {
        let (commands, receiver) = channel::unbounded();
        let active = Arc::new(AtomicBool::new(false));

        let env = SpawnEnv {
            bounds: Bounds::new(settings.screen_width, settings.screen_height),
            sprite: Sprite::default(),
            frame_interval_ms: settings.frame_interval_ms,
        };
        let tick_loop = TickLoop {
            provider,
            pool: ParticlePool::new(env, make_rng(settings.rng_seed)),
            commands: receiver,
            active: active.clone(),
            settings,
            epoch: Instant::now(),
            pending: None,
        };
        let worker = std::thread::Builder::new()
            .name("petalfall-draw".into())
            .spawn(move || tick_loop.run())?;

        Ok(Self {
            commands,
            active,
            released: AtomicBool::new(false),
            settings: Mutex::new(settings),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Re-initialize the pool for `kind` and begin ticking after the
    /// startup delay.
    pub fn start(&self, kind: EffectKind, sprite: Sprite) {
        if self.is_released() {
            log::warn!("start({kind}) ignored: scheduler released");
            return;
        }
        let settings = *self.settings.lock();
        self.active.store(true, Ordering::Release);
        self.send(Command::Start {
            kind,
            sprite,
            settings,
            deadline: Instant::now() + settings.startup_delay(),
        });
        log::info!("effect {kind} started");
    }

    /// Cancel any pending tick and schedule a draw tick after the startup
    /// delay. Ticks are dropped while idle.
    pub fn request_draw(&self) {
        if self.is_released() {
            return;
        }
        let delay = self.settings.lock().startup_delay();
        self.send(Command::Schedule(Instant::now() + delay));
    }

    /// Go idle and clear the surface once. No-op when already idle.
    pub fn stop(&self) {
        if self.is_released() {
            return;
        }
        if !self.active.swap(false, Ordering::AcqRel) {
            log::debug!("stop ignored: already idle");
            return;
        }
        self.send(Command::Clear);
        log::info!("effect stopped");
    }

    /// Drop the pending tick without clearing or changing the active state.
    /// Used when the surface goes away underneath us.
    pub fn cancel(&self) {
        if !self.is_released() {
            self.send(Command::Cancel);
        }
    }

    pub fn resize(&self, bounds: Bounds) {
        if !self.is_released() {
            self.send(Command::Resize(bounds));
        }
    }

    /// Applies from the next `start`/`request_draw`.
    pub fn update_settings(&self, settings: Settings) {
        *self.settings.lock() = settings;
    }

    /// Stop the ticking thread and wait for it. Idempotent.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.active.store(false, Ordering::Release);
        self.send(Command::Quit);
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                log::warn!("draw thread panicked before release");
            }
        }
        log::info!("scheduler released");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::debug!("draw thread gone, command dropped");
        }
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.release();
    }
}

struct TickLoop<S: SurfaceProvider> {
    provider: S,
    pool: ParticlePool<POOL_STORAGE>,
    commands: Receiver<Command>,
    active: Arc<AtomicBool>,
    settings: Settings,
    epoch: Instant,
    // At most one tick is ever pending
    pending: Option<Instant>,
}

impl<S: SurfaceProvider> TickLoop<S> {
    fn run(mut self) {
        log::debug!("draw thread running");
        loop {
            let command = match self.pending {
                Some(deadline) => match self.commands.recv_deadline(deadline) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        self.pending = None;
                        self.draw_tick();
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.commands.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            match command {
                Command::Start {
                    kind,
                    sprite,
                    settings,
                    deadline,
                } => {
                    self.settings = settings;
                    if let Some(seed) = settings.rng_seed {
                        self.pool.reseed(make_rng(Some(seed)));
                    }
                    self.pool.set_frame_interval_ms(settings.frame_interval_ms);
                    self.pool.initialize(kind, sprite, settings.pool_capacity);
                    self.pending = Some(deadline);
                }
                Command::Schedule(deadline) => self.pending = Some(deadline),
                Command::Cancel => self.pending = None,
                Command::Clear => {
                    self.pending = None;
                    self.clear_tick();
                }
                Command::Resize(bounds) => self.pool.set_bounds(bounds),
                Command::Quit => break,
            }
        }
        log::debug!("draw thread exiting");
    }

    fn draw_tick(&mut self) {
        // A tick already due when stop() ran
        if !self.active.load(Ordering::Acquire) {
            log::trace!("tick dropped: idle");
            return;
        }
        match self.draw_frame() {
            Ok(()) => {}
            Err(SurfaceError::NotReady) => log::trace!("frame skipped: surface not ready"),
            Err(e) => log::warn!("frame skipped: {e}"),
        }
        self.pending = Some(Instant::now() + self.settings.frame_interval());
    }

    fn draw_frame(&mut self) -> Result<(), SurfaceError> {
        if !self.provider.is_ready() {
            return Err(SurfaceError::NotReady);
        }
        let mut target = self.provider.acquire_target()?;
        target.clear();
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        self.pool.advance_and_draw(&mut target, now_ms);
        self.provider.present(target)
    }

    fn clear_tick(&mut self) {
        let cleared = self.provider.acquire_target().and_then(|mut target| {
            target.clear();
            self.provider.present(target)
        });
        if let Err(e) = cleared {
            log::debug!("clear skipped: {e}");
        }
    }
}
