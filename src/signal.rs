//! Bioacoustic spectrogram and waveform synthesised from time alone.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SignalConfig;
use crate::error::VizError;
use crate::lifecycle::{FrameTime, Visualization};
use crate::surface::{Color, Point, Size, Stroke, Surface};

/// Low-alpha overwrite each frame leaves a fading trail.
const BACKDROP: Color = Color::Rgba(26, 77, 85, 0.9);
const WAVE_STROKE: Stroke = Stroke::new(Color::Rgba(243, 233, 210, 0.7), 2.0);

/// Narrow periodic pulses sweeping across the bins.
pub fn envelope(bin: usize, time: f64, speed: f64) -> f64 {
    (bin as f64 * 0.1 + time * speed).sin().powi(4) * 0.5
}

/// Teal-to-blue colour for a spectrogram cell of value `v`.
pub fn spectrogram_color(v: f64) -> Color {
    Color::Hsla(180.0 + v * 60.0, 80.0 + v * 20.0, 30.0 + v * 40.0, v * 0.8 + 0.1)
}

pub struct Bioacoustics {
    config: SignalConfig,
    size: Size,
    frequency: Vec<f64>,
    waveform: Vec<f64>,
    history: VecDeque<Vec<f64>>,
    time: f64,
    rng: StdRng,
}

impl Bioacoustics {
    pub fn new(config: SignalConfig, rng: StdRng) -> Self {
        let bins = config.bins;
        let history = VecDeque::with_capacity(config.history_len + 1);
        Self {
            config,
            size: Size::default(),
            frequency: vec![0.0; bins],
            waveform: vec![0.0; bins],
            history,
            time: 0.0,
            rng,
        }
    }

    pub fn with_seed(config: SignalConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    pub fn waveform(&self) -> &[f64] {
        &self.waveform
    }

    /// Oldest slice first.
    pub fn history(&self) -> &VecDeque<Vec<f64>> {
        &self.history
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Envelope plus an occasional random spike for `bin` at `time`.
    fn excitation(&mut self, bin: usize, time: f64) -> f64 {
        let peak = if self.rng.gen::<f64>() < self.config.peak_chance {
            self.config.peak_min + self.rng.gen::<f64>() * (1.0 - self.config.peak_min)
        } else {
            0.0
        };
        envelope(bin, time, self.config.envelope_speed) + peak
    }

    /// Synthesize one frame at `time` seconds.
    pub fn step(&mut self, time: f64) {
        let inputs: Vec<f64> = (0..self.config.bins)
            .map(|bin| self.excitation(bin, time))
            .collect();
        self.step_with(&inputs, time);
    }

    /// Feed one frame of raw excitation through the smoother, derive the
    /// waveform and record the result in the history.
    pub fn step_with(&mut self, inputs: &[f64], time: f64) {
        let SignalConfig {
            retain,
            gain,
            carrier_speed,
            waveform_noise,
            ..
        } = self.config;
        for (bin, (value, input)) in self.frequency.iter_mut().zip(inputs).enumerate() {
            *value = (retain * *value + gain * input).min(1.0);
            let carrier = (bin as f64 * 0.2 + time * carrier_speed).sin() * 0.4;
            self.waveform[bin] = (carrier + self.rng.gen::<f64>() * waveform_noise) * *value;
        }
        self.history.push_back(self.frequency.clone());
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }
        self.time = time;
    }

    fn draw_spectrogram(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        let (w, h) = (self.size.w(), self.size.h());
        let slice_width = w / self.config.history_len as f64;
        let bar_height = h / self.config.bins as f64;
        for (i, slice) in self.history.iter().enumerate() {
            let x = i as f64 * slice_width;
            for (j, &value) in slice.iter().enumerate() {
                let y = h - (j + 1) as f64 * bar_height;
                surface.fill_rect(x, y, slice_width, bar_height, spectrogram_color(value))?;
            }
        }
        Ok(())
    }

    /// Polyline vertices of the waveform, closed back to the midline.
    pub fn waveform_points(&self) -> Vec<Point> {
        let (w, h) = (self.size.w(), self.size.h());
        let step = w / self.config.bins as f64;
        let mut points: Vec<Point> = self
            .waveform
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(i as f64 * step, h / 2.0 + v * h * 0.4))
            .collect();
        points.push(Point::new(w, h / 2.0));
        points
    }
}

impl Visualization for Bioacoustics {
    fn name(&self) -> &'static str {
        "bioacoustics"
    }

    fn reset(&mut self, size: Size) {
        self.size = size;
        self.frequency.iter_mut().for_each(|v| *v = 0.0);
        self.waveform.iter_mut().for_each(|v| *v = 0.0);
        self.history.clear();
        self.time = 0.0;
    }

    fn advance(&mut self, frame: &FrameTime) -> Result<(), VizError> {
        self.step(frame.elapsed);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), VizError> {
        surface.fill_rect(0.0, 0.0, self.size.w(), self.size.h(), BACKDROP)?;
        self.draw_spectrogram(surface)?;
        surface.stroke_polyline(&self.waveform_points(), WAVE_STROKE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_bounded() {
        for bin in 0..128 {
            let e = envelope(bin, 12.3, 1.0);
            assert!((0.0..=0.5).contains(&e));
        }
        assert_eq!(envelope(0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn spectrogram_hue_range() {
        assert_eq!(spectrogram_color(0.0), Color::Hsla(180.0, 80.0, 30.0, 0.1));
        match spectrogram_color(1.0) {
            Color::Hsla(h, s, l, a) => {
                assert_eq!((h, s, l), (240.0, 100.0, 70.0));
                assert!((a - 0.9).abs() < 1e-12);
            }
            other => panic!("unexpected colour {other:?}"),
        }
    }
}
