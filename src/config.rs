//! Tunables for every visualization. Defaults reproduce the site's look;
//! tests override individual fields (e.g. zero noise) for determinism.

/// Urban heat grid parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatConfig {
    /// Cells per axis.
    pub grid_size: usize,
    /// Baseline temperature range sampled at init, before edge bias.
    pub base_min: f64,
    pub base_max: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    /// Rate at which cells move toward the mean of their 4-neighbours.
    pub diffusion_rate: f64,
    /// Rate at which cells relax back toward their baseline.
    pub cooling_rate: f64,
    /// Amplitude of the per-cell random drift.
    pub heating_rate: f64,
    /// Centre of the random drift; below 0.5 biases cells slightly upward.
    pub noise_center: f64,
    pub tree_cooling_factor: f64,
    /// Cooling reach of a tree, in cells.
    pub tree_radius_cells: i64,
    pub tree_cooldown_ms: f64,
    pub max_trees: usize,
    pub tree_draw_radius_min: f64,
    pub tree_draw_radius_jitter: f64,
    /// Largest simulated step; longer frame gaps are truncated.
    pub max_dt: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            base_min: 0.6,
            base_max: 0.9,
            min_temp: 0.1,
            max_temp: 1.0,
            diffusion_rate: 0.05,
            cooling_rate: 0.01,
            heating_rate: 0.02,
            noise_center: 0.48,
            tree_cooling_factor: 0.8,
            tree_radius_cells: 3,
            tree_cooldown_ms: 1500.0,
            max_trees: 10,
            tree_draw_radius_min: 8.0,
            tree_draw_radius_jitter: 4.0,
            max_dt: 0.05,
        }
    }
}

/// Synthetic bioacoustic signal parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub bins: usize,
    pub history_len: usize,
    /// Exponential smoother: `retain * previous + gain * input`.
    pub retain: f64,
    pub gain: f64,
    /// Phase speed of the spectral envelope, rad/s.
    pub envelope_speed: f64,
    /// Phase speed of the waveform carrier, rad/s.
    pub carrier_speed: f64,
    pub peak_chance: f64,
    pub peak_min: f64,
    pub waveform_noise: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            bins: 128,
            history_len: 100,
            retain: 0.8,
            gain: 0.2,
            envelope_speed: 1.0,
            carrier_speed: 5.0,
            peak_chance: 0.05,
            peak_min: 0.2,
            waveform_noise: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensingConfig {
    pub waves: usize,
    pub phase_step: f64,
    /// Dish radius as a fraction of the surface width.
    pub dish_fraction: f64,
    pub wave_spacing: f64,
    pub wave_wobble: f64,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            waves: 3,
            phase_step: 0.05,
            dish_fraction: 0.15,
            wave_spacing: 15.0,
            wave_wobble: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralConfig {
    pub layers: Vec<usize>,
    /// Horizontal margin on each side, as a fraction of the width.
    pub margin: f64,
    pub node_radius: f64,
    pub time_step: f64,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            layers: vec![3, 4, 3],
            margin: 0.3,
            node_radius: 5.0,
            time_step: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub particles: usize,
    pub radius: f64,
    pub min_speed: f64,
    pub speed_jitter: f64,
    pub spin: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            particles: 15,
            radius: 30.0,
            min_speed: 0.01,
            speed_jitter: 0.01,
            spin: 0.005,
        }
    }
}
