//! Start/stop lifecycle shared by every visualization.
//!
//! An [`Animator`] owns one [`Visualization`] and its [`Surface`], and drives
//! it through host facilities injected as traits: a [`FrameDriver`] that calls
//! back once before the next repaint and a [`ResizeSource`] that reports the
//! container size. The pending frame is held as an explicit cancellable
//! [`FrameHandle`]; `stop()` cancels it instead of unwinding a recursive chain.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::VizError;
use crate::surface::{Size, Surface};

/// Fraction of a surface that must be in view before a gated instance runs.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type ResizeCallback = Box<dyn FnMut(Size)>;

/// Host token for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Host scheduler with "invoke once before next repaint" semantics.
pub trait FrameDriver {
    /// Schedule `callback` with the frame timestamp in milliseconds.
    fn request(&self, callback: FrameCallback) -> Result<FrameHandle, VizError>;

    /// Cancelling a handle that already fired or was cancelled is a no-op.
    fn cancel(&self, handle: FrameHandle);
}

/// Reports the rendered size of a visualization's container.
pub trait ResizeSource {
    fn current_size(&self) -> Size;

    fn subscribe(&self, callback: ResizeCallback) -> Result<Subscription, VizError>;
}

/// Live registration with a host event source; unregisters when dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Timing of one frame, relative to the last `start()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Frames completed since start.
    pub index: u64,
    pub timestamp_ms: f64,
    /// Seconds since the first frame after start.
    pub elapsed: f64,
    /// Seconds since the previous frame; zero on the first one.
    pub dt: f64,
}

impl FrameTime {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }
}

/// Monotonic running clock fed by host timestamps.
#[derive(Debug, Default)]
pub struct Clock {
    origin: Option<f64>,
    last: Option<f64>,
    frames: u64,
}

impl Clock {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> FrameTime {
        let origin = *self.origin.get_or_insert(timestamp_ms);
        let dt = self
            .last
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0));
        self.last = Some(timestamp_ms);
        let frame = FrameTime {
            index: self.frames,
            timestamp_ms,
            elapsed: ((timestamp_ms - origin) / 1000.0).max(0.0),
            dt,
        };
        self.frames += 1;
        frame
    }
}

/// One self-contained animated drawing.
pub trait Visualization {
    fn name(&self) -> &'static str;

    /// Discard all state and rebuild it for a surface of `size`.
    fn reset(&mut self, size: Size);

    fn advance(&mut self, frame: &FrameTime) -> Result<(), VizError>;

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Stopped,
    Starting,
    Running,
}

struct Instance<V> {
    viz: V,
    surface: Box<dyn Surface>,
    state: State,
    size: Size,
    clock: Clock,
    pending: Option<FrameHandle>,
    resize_sub: Option<Subscription>,
    // bumped on every start so callbacks from an earlier run are ignored
    epoch: u64,
}

impl<V: Visualization> Instance<V> {
    fn apply_size(&mut self, size: Size) -> Result<(), VizError> {
        self.surface.resize(size)?;
        self.viz.reset(size);
        self.size = size;
        Ok(())
    }

    fn step(&mut self, timestamp_ms: f64, resized: Option<Size>) -> Result<(), VizError> {
        let frame = self.clock.tick(timestamp_ms);
        self.render(&frame, resized).map_err(|err| match err {
            VizError::Frame { .. } => err,
            other => VizError::Frame {
                frame: frame.index,
                reason: other.to_string(),
            },
        })
    }

    fn render(&mut self, frame: &FrameTime, resized: Option<Size>) -> Result<(), VizError> {
        if let Some(size) = resized {
            if size != self.size {
                log::debug!(
                    "{}: resized to {}x{}",
                    self.viz.name(),
                    size.width,
                    size.height
                );
                self.apply_size(size)?;
            }
        }
        self.viz.advance(frame)?;
        self.viz.draw(self.surface.as_mut())
    }
}

/// Runs a visualization through the Stopped → Starting → Running cycle.
pub struct Animator<V: Visualization + 'static> {
    instance: Rc<RefCell<Instance<V>>>,
    // Resize notifications land here and are applied at the next frame
    // boundary, so a frame never observes half-rebuilt state.
    resized: Rc<Cell<Option<Size>>>,
    driver: Rc<dyn FrameDriver>,
    resize: Rc<dyn ResizeSource>,
}

impl<V: Visualization + 'static> Clone for Animator<V> {
    fn clone(&self) -> Self {
        Self {
            instance: Rc::clone(&self.instance),
            resized: Rc::clone(&self.resized),
            driver: Rc::clone(&self.driver),
            resize: Rc::clone(&self.resize),
        }
    }
}

impl<V: Visualization + 'static> Animator<V> {
    pub fn new(
        viz: V,
        surface: Box<dyn Surface>,
        driver: Rc<dyn FrameDriver>,
        resize: Rc<dyn ResizeSource>,
    ) -> Self {
        Self {
            instance: Rc::new(RefCell::new(Instance {
                viz,
                surface,
                state: State::Stopped,
                size: Size::default(),
                clock: Clock::default(),
                pending: None,
                resize_sub: None,
                epoch: 0,
            })),
            resized: Rc::new(Cell::new(None)),
            driver,
            resize,
        }
    }

    pub fn state(&self) -> State {
        self.instance.borrow().state
    }

    pub fn name(&self) -> &'static str {
        self.instance.borrow().viz.name()
    }

    /// Read access to the visualization's current state.
    pub fn inspect<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.instance.borrow().viz)
    }

    /// Begin animating. Does nothing if already running. On failure the
    /// instance is left stopped and the error returned for the caller to log.
    pub fn start(&self) -> Result<(), VizError> {
        {
            let mut inst = self.instance.borrow_mut();
            if inst.state != State::Stopped {
                return Ok(());
            }
            inst.state = State::Starting;
        }
        match self.begin() {
            Ok(()) => {
                log::info!("{}: started", self.name());
                Ok(())
            }
            Err(err) => {
                self.halt();
                Err(err)
            }
        }
    }

    /// Stop animating. Safe to call in any state, any number of times.
    pub fn stop(&self) {
        if self.halt() {
            log::info!("{}: stopped", self.name());
        }
    }

    /// Visibility gate entry point.
    pub fn set_visible(&self, visible: bool) -> Result<(), VizError> {
        if visible {
            self.start()
        } else {
            self.stop();
            Ok(())
        }
    }

    fn begin(&self) -> Result<(), VizError> {
        let size = self.resize.current_size();
        self.resized.set(None);
        {
            let mut inst = self.instance.borrow_mut();
            inst.apply_size(size)?;
            inst.clock.reset();
            inst.epoch += 1;
            inst.state = State::Running;
        }
        self.schedule()?;

        let resized = Rc::clone(&self.resized);
        let sub = self
            .resize
            .subscribe(Box::new(move |size| resized.set(Some(size))))?;
        self.instance.borrow_mut().resize_sub = Some(sub);
        Ok(())
    }

    // The callback holds the animator alive while a frame is pending, so an
    // always-on instance needs no other owner.
    fn schedule(&self) -> Result<(), VizError> {
        let this = self.clone();
        let epoch = self.instance.borrow().epoch;
        let handle = self
            .driver
            .request(Box::new(move |timestamp_ms| this.on_frame(epoch, timestamp_ms)))?;
        self.instance.borrow_mut().pending = Some(handle);
        Ok(())
    }

    fn on_frame(&self, epoch: u64, timestamp_ms: f64) {
        let outcome = {
            let mut inst = self.instance.borrow_mut();
            if inst.state != State::Running || inst.epoch != epoch {
                return;
            }
            inst.pending = None;
            inst.step(timestamp_ms, self.resized.take())
        };

        let outcome = outcome.and_then(|()| self.schedule());
        if let Err(err) = outcome {
            log::error!("{}: {err}; stopping", self.name());
            self.stop();
        }
    }

    /// Tear down host registrations. Returns false if already stopped.
    fn halt(&self) -> bool {
        let (pending, sub) = {
            let mut inst = self.instance.borrow_mut();
            if inst.state == State::Stopped {
                return false;
            }
            inst.state = State::Stopped;
            (inst.pending.take(), inst.resize_sub.take())
        };
        if let Some(handle) = pending {
            self.driver.cancel(handle);
        }
        drop(sub);
        true
    }
}
