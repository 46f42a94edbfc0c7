mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{ManualDriver, ManualResize, Op, RecordingSurface};
use site_visuals::error::VizError;
use site_visuals::lifecycle::{Animator, FrameTime, State, Visualization};
use site_visuals::surface::{Size, Surface};

/// Visualization that logs what the animator asks of it.
#[derive(Default)]
struct Probe {
    fail_at: Option<u64>,
    log: Rc<RefCell<ProbeLog>>,
}

#[derive(Default)]
struct ProbeLog {
    resets: Vec<Size>,
    frames: Vec<FrameTime>,
    draws: usize,
}

impl Visualization for Probe {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn reset(&mut self, size: Size) {
        self.log.borrow_mut().resets.push(size);
    }

    fn advance(&mut self, frame: &FrameTime) -> Result<(), VizError> {
        if self.fail_at == Some(frame.index) {
            return Err(VizError::Surface("boom".into()));
        }
        self.log.borrow_mut().frames.push(*frame);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        surface.clear()?;
        self.log.borrow_mut().draws += 1;
        Ok(())
    }
}

struct Rig {
    driver: Rc<ManualDriver>,
    resize: Rc<ManualResize>,
    surface: RecordingSurface,
    log: Rc<RefCell<ProbeLog>>,
    animator: Animator<Probe>,
}

fn rig(fail_at: Option<u64>) -> Rig {
    let driver = Rc::new(ManualDriver::default());
    let resize = Rc::new(ManualResize::new(Size::new(200, 100)));
    let surface = RecordingSurface::default();
    let log = Rc::new(RefCell::new(ProbeLog::default()));
    let probe = Probe {
        fail_at,
        log: Rc::clone(&log),
    };
    let animator = Animator::new(
        probe,
        Box::new(surface.clone()),
        driver.clone(),
        resize.clone(),
    );
    Rig {
        driver,
        resize,
        surface,
        log,
        animator,
    }
}

#[test]
fn stop_before_start_is_a_no_op() {
    let rig = rig(None);
    rig.animator.stop();
    rig.animator.stop();
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.driver.cancelled(), 0);
    assert_eq!(rig.driver.pending(), 0);
}

#[test]
fn start_sizes_surface_and_schedules_a_frame() {
    let rig = rig(None);
    rig.animator.start().unwrap();

    assert_eq!(rig.animator.state(), State::Running);
    assert_eq!(rig.driver.pending(), 1);
    assert_eq!(rig.resize.listeners(), 1);
    assert_eq!(rig.log.borrow().resets, vec![Size::new(200, 100)]);
    assert_eq!(rig.surface.take(), vec![Op::Resize(Size::new(200, 100))]);

    assert_eq!(rig.driver.fire(16.0), 1);
    assert_eq!(rig.log.borrow().draws, 1);
    assert_eq!(rig.driver.pending(), 1);
}

#[test]
fn second_start_is_ignored() {
    let rig = rig(None);
    rig.animator.start().unwrap();
    rig.animator.start().unwrap();
    assert_eq!(rig.driver.pending(), 1);
    assert_eq!(rig.resize.listeners(), 1);
    assert_eq!(rig.log.borrow().resets.len(), 1);
}

#[test]
fn stop_cancels_pending_frame_and_resize_listener() {
    let rig = rig(None);
    rig.animator.start().unwrap();
    rig.driver.fire(0.0);

    rig.animator.stop();
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.driver.pending(), 0);
    assert_eq!(rig.driver.cancelled(), 1);
    assert_eq!(rig.resize.listeners(), 0);

    rig.animator.stop();
    assert_eq!(rig.driver.cancelled(), 1);
    assert_eq!(rig.driver.fire(16.0), 0);
}

#[test]
fn frame_failure_stops_without_further_callbacks() {
    let rig = rig(Some(5));
    rig.animator.start().unwrap();

    let mut ran = 0;
    for i in 0..10 {
        ran += rig.driver.fire(i as f64 * 16.0);
    }

    assert_eq!(ran, 6);
    assert_eq!(rig.log.borrow().draws, 5);
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.driver.pending(), 0);
    assert_eq!(rig.resize.listeners(), 0);
}

#[test]
fn failed_instance_restarts_only_when_asked() {
    let rig = rig(Some(1));
    rig.animator.start().unwrap();
    rig.driver.fire(100.0);
    rig.driver.fire(116.0);
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.driver.fire(132.0), 0);

    rig.animator.start().unwrap();
    assert_eq!(rig.animator.state(), State::Running);
    rig.driver.fire(9_000.0);

    let log = rig.log.borrow();
    assert_eq!(log.resets.len(), 2);
    let restarted = log.frames.last().unwrap();
    assert_eq!(restarted.index, 0);
    assert_eq!(restarted.elapsed, 0.0);
    assert_eq!(restarted.dt, 0.0);
}

#[test]
fn clock_runs_from_start() {
    let rig = rig(None);
    rig.animator.start().unwrap();
    rig.driver.fire(1_000.0);
    rig.driver.fire(1_016.0);
    rig.driver.fire(1_050.0);

    let log = rig.log.borrow();
    let elapsed: Vec<f64> = log.frames.iter().map(|f| f.elapsed).collect();
    assert_eq!(elapsed.len(), 3);
    assert_eq!(elapsed[0], 0.0);
    assert!((elapsed[1] - 0.016).abs() < 1e-12);
    assert!((elapsed[2] - 0.050).abs() < 1e-12);
    assert!((log.frames[2].dt - 0.034).abs() < 1e-12);
}

#[test]
fn resize_applies_at_next_frame_boundary() {
    let rig = rig(None);
    rig.animator.start().unwrap();
    rig.surface.take();

    rig.resize.resize_to(Size::new(320, 160));
    assert_eq!(rig.log.borrow().resets.len(), 1);

    rig.driver.fire(0.0);
    assert_eq!(
        rig.log.borrow().resets,
        vec![Size::new(200, 100), Size::new(320, 160)]
    );
    assert_eq!(rig.surface.take()[0], Op::Resize(Size::new(320, 160)));
    assert_eq!(rig.animator.state(), State::Running);
}

#[test]
fn resize_to_same_size_keeps_state() {
    let rig = rig(None);
    rig.animator.start().unwrap();
    rig.resize.resize_to(Size::new(200, 100));
    rig.driver.fire(0.0);
    assert_eq!(rig.log.borrow().resets.len(), 1);
}

#[test]
fn setup_failure_leaves_instance_stopped() {
    let rig = rig(None);
    rig.driver.refuse.set(true);

    let err = rig.animator.start().unwrap_err();
    assert!(matches!(err, VizError::Host(_)));
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.resize.listeners(), 0);

    rig.driver.refuse.set(false);
    rig.animator.start().unwrap();
    assert_eq!(rig.animator.state(), State::Running);
}

#[test]
fn visibility_toggles_running() {
    let rig = rig(None);
    rig.animator.set_visible(true).unwrap();
    assert_eq!(rig.animator.state(), State::Running);
    rig.animator.set_visible(false).unwrap();
    assert_eq!(rig.animator.state(), State::Stopped);
    assert_eq!(rig.driver.pending(), 0);
}

#[test]
fn instances_do_not_interfere() {
    let a = rig(Some(0));
    let b = rig(None);
    a.animator.start().unwrap();
    b.animator.start().unwrap();

    a.driver.fire(0.0);
    b.driver.fire(0.0);
    b.driver.fire(16.0);

    assert_eq!(a.animator.state(), State::Stopped);
    assert_eq!(b.animator.state(), State::Running);
    assert_eq!(b.log.borrow().draws, 2);
}
