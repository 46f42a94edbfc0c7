//! Small looping icon animations for the solutions section. These advance a
//! fixed amount per frame rather than per second.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{LoopConfig, NeuralConfig, SensingConfig};
use crate::error::VizError;
use crate::lifecycle::{FrameTime, Visualization};
use crate::surface::{Color, Point, Size, Stroke, Surface};

const DEEP_TEAL: (u8, u8, u8) = (26, 77, 85);
const PRIMARY_GREEN: (u8, u8, u8) = (106, 176, 131);

fn teal(alpha: f64) -> Color {
    let (r, g, b) = DEEP_TEAL;
    Color::Rgba(r, g, b, alpha)
}

fn green(alpha: f64) -> Color {
    let (r, g, b) = PRIMARY_GREEN;
    Color::Rgba(r, g, b, alpha)
}

/// Satellite dish with pulsing wave arcs.
pub struct SensingWaves {
    config: SensingConfig,
    size: Size,
    angle: f64,
    // the phase steps after each drawn frame, so the first frame shows angle 0
    primed: bool,
}

impl SensingWaves {
    pub fn new(config: SensingConfig) -> Self {
        Self {
            config,
            size: Size::default(),
            angle: 0.0,
            primed: false,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn dish_centre(&self) -> Point {
        Point::new(self.size.w() / 2.0, self.size.h() * 0.8)
    }

    pub fn dish_radius(&self) -> f64 {
        self.size.w() * self.config.dish_fraction
    }

    /// Radius and opacity of wave `i` (1-based).
    pub fn wave(&self, i: usize) -> (f64, f64) {
        let fi = i as f64;
        let radius = self.dish_radius()
            + fi * self.config.wave_spacing
            + (self.angle + fi * 0.5).sin() * self.config.wave_wobble;
        let opacity = 1.0 - fi / (self.config.waves + 1) as f64;
        (radius, opacity)
    }
}

impl Visualization for SensingWaves {
    fn name(&self) -> &'static str {
        "sensing"
    }

    fn reset(&mut self, size: Size) {
        self.size = size;
    }

    fn advance(&mut self, _frame: &FrameTime) -> Result<(), VizError> {
        if self.primed {
            self.angle += self.config.phase_step;
        }
        self.primed = true;
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        surface.clear()?;
        let centre = self.dish_centre();
        surface.stroke_arc(centre, self.dish_radius(), PI, 0.0, Stroke::new(teal(1.0), 1.5))?;
        for i in 1..=self.config.waves {
            let (radius, opacity) = self.wave(i);
            surface.stroke_arc(
                centre,
                radius,
                PI * 1.2,
                -PI * 0.2,
                Stroke::new(teal(opacity), 1.5),
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    pub position: Point,
    pub layer: usize,
    pub activation: f64,
}

/// Layered network diagram with activation pulses rippling through it.
pub struct NeuralPulse {
    config: NeuralConfig,
    size: Size,
    nodes: Vec<Neuron>,
    // node index pairs, layer l -> layer l + 1
    connections: Vec<(usize, usize)>,
    time: f64,
}

impl NeuralPulse {
    pub fn new(config: NeuralConfig) -> Self {
        Self {
            config,
            size: Size::default(),
            nodes: Vec::new(),
            connections: Vec::new(),
            time: 0.0,
        }
    }

    pub fn nodes(&self) -> &[Neuron] {
        &self.nodes
    }

    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }

    fn layout(&mut self) {
        let (w, h) = (self.size.w(), self.size.h());
        let layers = self.config.layers.len();
        let margin = self.config.margin;
        let x_spacing = if layers > 1 {
            w * (1.0 - margin * 2.0) / (layers - 1) as f64
        } else {
            0.0
        };

        self.nodes.clear();
        for (layer, &count) in self.config.layers.iter().enumerate() {
            let x = w * margin + layer as f64 * x_spacing;
            let y_spacing = h / (count + 1) as f64;
            self.nodes.extend((0..count).map(|i| Neuron {
                position: Point::new(x, y_spacing * (i + 1) as f64),
                layer,
                activation: 0.0,
            }));
        }

        let nodes = &self.nodes;
        self.connections = nodes
            .iter()
            .enumerate()
            .flat_map(move |(from, a)| {
                nodes
                    .iter()
                    .enumerate()
                    .filter(move |(_, b)| b.layer == a.layer + 1)
                    .map(move |(to, _)| (from, to))
            })
            .collect();
    }
}

impl Visualization for NeuralPulse {
    fn name(&self) -> &'static str {
        "ai-core"
    }

    fn reset(&mut self, size: Size) {
        self.size = size;
        self.layout();
    }

    fn advance(&mut self, _frame: &FrameTime) -> Result<(), VizError> {
        self.time += self.config.time_step;
        let time = self.time;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.activation = (time * 2.0 + node.layer as f64 * 1.5 + index as f64 * 0.5)
                .sin()
                .max(0.0);
        }
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        surface.clear()?;
        let edge = Stroke::new(green(0.3), 1.0);
        for &(from, to) in &self.connections {
            surface.stroke_line(self.nodes[from].position, self.nodes[to].position, edge)?;
        }
        for node in &self.nodes {
            surface.fill_circle(
                node.position,
                self.config.node_radius + node.activation * 2.0,
                teal(0.5 + node.activation * 0.5),
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub angle: f64,
    pub speed: f64,
}

/// Arrow-shaped particles circling the centre.
pub struct ParticleLoop {
    config: LoopConfig,
    size: Size,
    particles: Vec<Particle>,
    offset: f64,
    rng: StdRng,
}

impl ParticleLoop {
    pub fn new(config: LoopConfig, rng: StdRng) -> Self {
        Self {
            config,
            size: Size::default(),
            particles: Vec::new(),
            offset: 0.0,
            rng,
        }
    }

    pub fn with_seed(config: LoopConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Triangle pointing along the tangent of the loop at `angle`.
    pub fn arrow(&self, angle: f64) -> [Point; 3] {
        let centre = Point::new(self.size.w() / 2.0, self.size.h() / 2.0);
        let anchor = Point::new(
            centre.x + angle.cos() * self.config.radius,
            centre.y + angle.sin() * self.config.radius,
        );
        let (sin, cos) = (angle + PI / 2.0).sin_cos();
        [(0.0, -4.0), (3.0, 2.0), (-3.0, 2.0)]
            .map(|(x, y)| Point::new(anchor.x + x * cos - y * sin, anchor.y + x * sin + y * cos))
    }
}

impl Visualization for ParticleLoop {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn reset(&mut self, size: Size) {
        self.size = size;
        self.offset = 0.0;
        let n = self.config.particles;
        let (min, jitter) = (self.config.min_speed, self.config.speed_jitter);
        let rng = &mut self.rng;
        self.particles = (0..n)
            .map(|i| Particle {
                angle: 2.0 * PI / n as f64 * i as f64,
                speed: min + rng.gen::<f64>() * jitter,
            })
            .collect();
    }

    fn advance(&mut self, _frame: &FrameTime) -> Result<(), VizError> {
        self.offset += self.config.spin;
        for particle in &mut self.particles {
            particle.angle += particle.speed;
        }
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        surface.clear()?;
        for particle in &self.particles {
            let angle = particle.angle + self.offset;
            let opacity = 0.6 + (angle * 3.0).sin() * 0.4;
            surface.fill_polygon(&self.arrow(angle), green(opacity))?;
        }
        Ok(())
    }
}
