#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Decorative canvas visualizations for the marketing site: an urban heat
//! grid, a synthetic bioacoustic spectrogram and three looping icons, each
//! run by a start/stop [`lifecycle::Animator`].

pub mod config;
pub mod error;
pub mod heat;
pub mod icons;
pub mod lifecycle;
pub mod signal;
pub mod surface;

pub use error::VizError;
pub use lifecycle::{Animator, State, Visualization};
pub use surface::{Color, Point, Size, Stroke, Surface};

// Only compile browser glue when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod host;
    pub mod mount;
    pub mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        mount::mount_all(&window, &document);
        Ok(())
    }
}
