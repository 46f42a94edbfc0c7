//! Binds each visualization to its mount point on the page.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use super::host::{gate_on_visibility, ContainerResize, RafDriver};
use super::render::CanvasSurface;
use crate::config::{HeatConfig, LoopConfig, NeuralConfig, SensingConfig, SignalConfig};
use crate::error::VizError;
use crate::heat::UrbanHeat;
use crate::icons::{NeuralPulse, ParticleLoop, SensingWaves};
use crate::lifecycle::{Animator, FrameDriver, Visualization};
use crate::signal::Bioacoustics;

pub const BIOACOUSTICS_KEY: &str = "bioacoustics-visual";
pub const URBAN_HEAT_KEY: &str = "urbanheat-visual";
pub const SENSING_KEY: &str = "sensing-animation";
pub const AI_CORE_KEY: &str = "ai-core-animation";
pub const CIRCULAR_KEY: &str = "circular-animation";

/// Outcome of binding one mount key.
pub type Mounted = (&'static str, Result<(), VizError>);

/// Mount every visualization whose key is present. Failures are logged and
/// only skip the affected instance.
pub fn mount_all(window: &Window, document: &Document) -> Vec<Mounted> {
    let driver: Rc<dyn FrameDriver> = Rc::new(RafDriver::new(window.clone()));
    let page = Page {
        window,
        document,
        driver,
    };

    let outcomes = vec![
        (
            BIOACOUSTICS_KEY,
            page.always_on(
                BIOACOUSTICS_KEY,
                Bioacoustics::new(SignalConfig::default(), StdRng::from_entropy()),
            ),
        ),
        (
            URBAN_HEAT_KEY,
            page.always_on(
                URBAN_HEAT_KEY,
                UrbanHeat::new(HeatConfig::default(), StdRng::from_entropy()),
            ),
        ),
        (
            SENSING_KEY,
            page.when_visible(SENSING_KEY, SensingWaves::new(SensingConfig::default())),
        ),
        (
            AI_CORE_KEY,
            page.when_visible(AI_CORE_KEY, NeuralPulse::new(NeuralConfig::default())),
        ),
        (
            CIRCULAR_KEY,
            page.when_visible(
                CIRCULAR_KEY,
                ParticleLoop::new(LoopConfig::default(), StdRng::from_entropy()),
            ),
        ),
    ];
    for (key, result) in &outcomes {
        report(key, result);
    }
    outcomes
}

fn report(key: &str, result: &Result<(), VizError>) {
    match result {
        Ok(()) => log::debug!("{key}: mounted"),
        Err(err @ VizError::MissingMount { .. }) => log::warn!("{err}"),
        Err(err) => log::error!("{key}: setup failed: {err}"),
    }
}

struct Page<'a> {
    window: &'a Window,
    document: &'a Document,
    driver: Rc<dyn FrameDriver>,
}

impl Page<'_> {
    fn element<T: JsCast>(&self, key: &str) -> Result<T, VizError> {
        self.document
            .get_element_by_id(key)
            .ok_or_else(|| VizError::missing_mount(key))?
            .dyn_into::<T>()
            .map_err(|_| VizError::Surface(format!("`{key}` has the wrong element type")))
    }

    fn animator<V: Visualization + 'static>(
        &self,
        viz: V,
        canvas: HtmlCanvasElement,
        container: HtmlElement,
    ) -> Result<Animator<V>, VizError> {
        let surface = CanvasSurface::new(canvas)?;
        let resize = Rc::new(ContainerResize::new(self.window.clone(), container));
        Ok(Animator::new(
            viz,
            Box::new(surface),
            Rc::clone(&self.driver),
            resize,
        ))
    }

    /// Create a canvas inside the container and run it for the page lifetime.
    fn always_on<V: Visualization + 'static>(&self, key: &str, viz: V) -> Result<(), VizError> {
        let container: HtmlElement = self.element(key)?;
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| VizError::Surface("created element is not a canvas".into()))?;
        container.append_child(&canvas)?;
        self.animator(viz, canvas, container)?.start()
    }

    /// Drive the canvas with id `key`, sized by its parent, while visible.
    fn when_visible<V: Visualization + 'static>(&self, key: &str, viz: V) -> Result<(), VizError> {
        let canvas: HtmlCanvasElement = self.element(key)?;
        let container = canvas
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| VizError::Surface(format!("`{key}` has no sizing container")))?;
        let animator = self.animator(viz, canvas.clone(), container)?;
        gate_on_visibility(&canvas, animator)
    }
}
