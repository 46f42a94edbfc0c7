//! Urban heat grid: a coarse thermal field that trees cool locally while
//! diffusion, relaxation toward a baseline and a little noise smooth it out.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::HeatConfig;
use crate::error::VizError;
use crate::lifecycle::{FrameTime, Visualization};
use crate::surface::{Color, Point, Size, Stroke, Surface};

const TREE_FILL: Color = Color::Hex("#208040");
const TREE_OUTLINE: Stroke = Stroke::new(Color::Rgba(0, 0, 0, 0.2), 1.0);

/// 4-connected neighbourhood.
const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub temperature: f64,
    /// Baseline the cell relaxes back toward.
    pub target: f64,
}

/// A cooling source, positioned in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub x: f64,
    pub y: f64,
    /// Drawn radius in pixels.
    pub radius: f64,
    pub created_at_ms: f64,
}

#[derive(Clone)]
pub struct UrbanHeat {
    config: HeatConfig,
    size: Size,
    // row-major, grid_size * grid_size
    cells: Vec<HeatCell>,
    trees: Vec<Tree>,
    last_tree_ms: Option<f64>,
    rng: StdRng,
}

impl UrbanHeat {
    pub fn new(config: HeatConfig, rng: StdRng) -> Self {
        let mut heat = Self {
            config,
            size: Size::default(),
            cells: Vec::new(),
            trees: Vec::new(),
            last_tree_ms: None,
            rng,
        };
        heat.init_grid();
        heat
    }

    pub fn with_seed(config: HeatConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &HeatConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> HeatCell {
        self.cells[y * self.config.grid_size + x]
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Overwrite every cell's temperature and baseline with `temperature`.
    pub fn fill(&mut self, temperature: f64) {
        let t = temperature.clamp(self.config.min_temp, self.config.max_temp);
        for cell in &mut self.cells {
            *cell = HeatCell {
                temperature: t,
                target: t,
            };
        }
    }

    /// Pixel extent of one grid cell.
    pub fn cell_extent(&self) -> (f64, f64) {
        let n = self.config.grid_size as f64;
        (self.size.w() / n, self.size.h() / n)
    }

    fn init_grid(&mut self) {
        let n = self.config.grid_size;
        let (lo, hi) = (self.config.base_min, self.config.base_max);
        let mut cells = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                let base = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
                // corners run cooler than the centre
                let edge = (x as f64 / n as f64 * PI).sin() * (y as f64 / n as f64 * PI).sin();
                let t = (base * (0.5 + edge * 0.5)).clamp(self.config.min_temp, self.config.max_temp);
                cells.push(HeatCell {
                    temperature: t,
                    target: t,
                });
            }
        }
        self.cells = cells;
    }

    /// Add `tree` if the cap allows. Returns whether it was planted.
    pub fn insert_tree(&mut self, tree: Tree) -> bool {
        if self.trees.len() >= self.config.max_trees {
            return false;
        }
        self.trees.push(tree);
        true
    }

    /// Plant a tree at a random interior position, at most once per cooldown.
    pub fn try_plant(&mut self, now_ms: f64) -> Option<Tree> {
        if self.trees.len() >= self.config.max_trees {
            return None;
        }
        if let Some(last) = self.last_tree_ms {
            if now_ms - last <= self.config.tree_cooldown_ms {
                return None;
            }
        }
        let (w, h) = (self.size.w(), self.size.h());
        let tree = Tree {
            x: self.rng.gen::<f64>() * w * 0.8 + w * 0.1,
            y: self.rng.gen::<f64>() * h * 0.8 + h * 0.1,
            radius: self.config.tree_draw_radius_min
                + self.rng.gen::<f64>() * self.config.tree_draw_radius_jitter,
            created_at_ms: now_ms,
        };
        self.trees.push(tree);
        self.last_tree_ms = Some(now_ms);
        Some(tree)
    }

    fn tree_cell(&self, tree: &Tree) -> (i64, i64) {
        let (cw, ch) = self.cell_extent();
        let cx = if cw > 0.0 { (tree.x / cw).floor() as i64 } else { 0 };
        let cy = if ch > 0.0 { (tree.y / ch).floor() as i64 } else { 0 };
        (cx, cy)
    }

    /// Advance the field by `dt` seconds (truncated to `max_dt`).
    pub fn step(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, self.config.max_dt);
        self.cool_under_trees(dt);
        let deltas = self.pending_deltas(dt);
        let (lo, hi) = (self.config.min_temp, self.config.max_temp);
        for (cell, delta) in self.cells.iter_mut().zip(deltas) {
            cell.temperature = (cell.temperature + delta).clamp(lo, hi);
        }
    }

    fn cool_under_trees(&mut self, dt: f64) {
        let n = self.config.grid_size as i64;
        let radius = self.config.tree_radius_cells;
        let strength = self.config.tree_cooling_factor * dt;
        let centres: Vec<(i64, i64)> = self.trees.iter().map(|t| self.tree_cell(t)).collect();

        for (cx, cy) in centres {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let (nx, ny) = (cx + dx, cy + dy);
                    let dist_sq = dx * dx + dy * dy;
                    if nx < 0 || ny < 0 || nx >= n || ny >= n || dist_sq > radius * radius {
                        continue;
                    }
                    let falloff = 1.0 - (dist_sq as f64).sqrt() / radius as f64;
                    let cell = &mut self.cells[(ny * n + nx) as usize];
                    cell.temperature =
                        (cell.temperature - strength * falloff * falloff).max(self.config.min_temp);
                }
            }
        }
    }

    /// Mean of the 4-connected neighbours minus the cell's own temperature.
    /// Reads only the current grid.
    pub fn diffusion_delta(&self, x: usize, y: usize) -> f64 {
        let n = self.config.grid_size as i64;
        let (sum, count) = NEIGHBOURS
            .iter()
            .map(|(dx, dy)| (x as i64 + dx, y as i64 + dy))
            .filter(|&(nx, ny)| nx >= 0 && ny >= 0 && nx < n && ny < n)
            .fold((0.0, 0usize), |(sum, count), (nx, ny)| {
                (sum + self.cells[(ny * n + nx) as usize].temperature, count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        sum / count as f64 - self.cell(x, y).temperature
    }

    /// Diffusion deltas for the whole grid, row-major.
    pub fn diffusion_field(&self) -> Vec<f64> {
        let n = self.config.grid_size;
        (0..n * n).map(|i| self.diffusion_delta(i % n, i / n)).collect()
    }

    fn pending_deltas(&mut self, dt: f64) -> Vec<f64> {
        let diffusion = self.diffusion_field();
        let cfg = &self.config;
        let rng = &mut self.rng;
        self.cells
            .iter()
            .zip(diffusion)
            .map(|(cell, spread)| {
                spread * cfg.diffusion_rate * dt
                    + (cell.target - cell.temperature) * cfg.cooling_rate * dt
                    + (rng.gen::<f64>() - cfg.noise_center) * cfg.heating_rate * dt
            })
            .collect()
    }
}

/// Blue → white below 0.5, white → red above.
pub fn heat_color(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        let warm = (255.0 * (t * 2.0)).floor() as u8;
        let cold = (255.0 * (1.0 - t * 2.0)).floor() as u8;
        Color::Rgb(warm, warm, cold)
    } else {
        let g = (255.0 * (1.0 - (t - 0.5) * 2.0)).floor() as u8;
        Color::Rgb(255, g, 0)
    }
}

impl Visualization for UrbanHeat {
    fn name(&self) -> &'static str {
        "urban-heat"
    }

    fn reset(&mut self, size: Size) {
        self.size = size;
        self.init_grid();
        self.trees.clear();
        self.last_tree_ms = None;
    }

    fn advance(&mut self, frame: &FrameTime) -> Result<(), VizError> {
        if let Some(tree) = self.try_plant(frame.elapsed_ms()) {
            log::debug!("urban-heat: planted tree at ({:.0}, {:.0})", tree.x, tree.y);
        }
        self.step(frame.dt);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        let n = self.config.grid_size;
        let (cw, ch) = self.cell_extent();
        for (i, cell) in self.cells.iter().enumerate() {
            let (x, y) = ((i % n) as f64, (i / n) as f64);
            // 1px overdraw hides seams between cells
            surface.fill_rect(x * cw, y * ch, cw + 1.0, ch + 1.0, heat_color(cell.temperature))?;
        }
        for tree in &self.trees {
            let centre = Point::new(tree.x, tree.y);
            surface.fill_circle(centre, tree.radius, TREE_FILL)?;
            surface.stroke_circle(centre, tree.radius, TREE_OUTLINE)?;
        }
        Ok(())
    }
}
