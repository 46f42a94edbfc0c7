#![allow(dead_code)]

//! Host stand-ins for the browser: a frame driver fired by hand, a resize
//! source poked by hand and a surface that records what was drawn.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use site_visuals::error::VizError;
use site_visuals::lifecycle::{
    FrameCallback, FrameDriver, FrameHandle, FrameTime, ResizeCallback, ResizeSource,
    Subscription,
};
use site_visuals::surface::{Color, Point, Size, Stroke, Surface};

#[derive(Default)]
pub struct ManualDriver {
    next_id: Cell<i32>,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    cancelled: RefCell<Vec<FrameHandle>>,
    pub refuse: Cell<bool>,
}

impl ManualDriver {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.borrow().len()
    }

    /// Run every callback scheduled so far. Returns how many ran.
    pub fn fire(&self, timestamp_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp_ms);
        }
        count
    }
}

impl FrameDriver for ManualDriver {
    fn request(&self, callback: FrameCallback) -> Result<FrameHandle, VizError> {
        if self.refuse.get() {
            return Err(VizError::Host("frame scheduling refused".into()));
        }
        let handle = FrameHandle(self.next_id.get() + 1);
        self.next_id.set(handle.0);
        self.pending.borrow_mut().push((handle, callback));
        Ok(handle)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
        self.cancelled.borrow_mut().push(handle);
    }
}

pub struct ManualResize {
    size: Cell<Size>,
    next_id: Cell<u64>,
    listeners: Rc<RefCell<Vec<(u64, ResizeCallback)>>>,
}

impl ManualResize {
    pub fn new(size: Size) -> Self {
        Self {
            size: Cell::new(size),
            next_id: Cell::new(0),
            listeners: Rc::default(),
        }
    }

    pub fn resize_to(&self, size: Size) {
        self.size.set(size);
        for (_, listener) in self.listeners.borrow_mut().iter_mut() {
            listener(size);
        }
    }

    pub fn listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ResizeSource for ManualResize {
    fn current_size(&self) -> Size {
        self.size.get()
    }

    fn subscribe(&self, callback: ResizeCallback) -> Result<Subscription, VizError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, callback));
        let listeners = Rc::clone(&self.listeners);
        Ok(Subscription::new(move || {
            listeners.borrow_mut().retain(|(i, _)| *i != id)
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(Size),
    Clear,
    Rect { x: f64, y: f64, w: f64, h: f64, color: Color },
    Arc { center: Point, radius: f64, start: f64, end: f64, stroke: Stroke },
    Circle { center: Point, radius: f64, color: Color },
    Polyline(Vec<Point>, Stroke),
    Polygon(Vec<Point>, Color),
}

/// Surface that records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub ops: Rc<RefCell<Vec<Op>>>,
}

impl RecordingSurface {
    pub fn take(&self) -> Vec<Op> {
        std::mem::take(&mut *self.ops.borrow_mut())
    }

    fn push(&self, op: Op) -> Result<(), VizError> {
        self.ops.borrow_mut().push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: Size) -> Result<(), VizError> {
        self.push(Op::Resize(size))
    }

    fn clear(&mut self) -> Result<(), VizError> {
        self.push(Op::Clear)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<(), VizError> {
        self.push(Op::Rect { x, y, w, h, color })
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    ) -> Result<(), VizError> {
        self.push(Op::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        })
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), VizError> {
        self.push(Op::Circle {
            center,
            radius,
            color,
        })
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) -> Result<(), VizError> {
        self.push(Op::Polyline(points.to_vec(), stroke))
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), VizError> {
        self.push(Op::Polygon(points.to_vec(), color))
    }
}

pub fn frame(index: u64, elapsed: f64, dt: f64) -> FrameTime {
    FrameTime {
        index,
        timestamp_ms: elapsed * 1000.0,
        elapsed,
        dt,
    }
}
