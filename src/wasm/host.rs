//! Browser implementations of the lifecycle seams.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::error::VizError;
use crate::lifecycle::{
    Animator, FrameCallback, FrameDriver, FrameHandle, ResizeCallback, ResizeSource,
    Subscription, Visualization, VISIBILITY_THRESHOLD,
};
use crate::surface::Size;

/// `requestAnimationFrame` scheduler.
pub struct RafDriver {
    window: Window,
}

impl RafDriver {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameDriver for RafDriver {
    fn request(&self, callback: FrameCallback) -> Result<FrameHandle, VizError> {
        // Freed by wasm-bindgen after it runs. A cancelled callback is never
        // freed; that is one small closure per stop().
        let js = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        let id = self.window.request_animation_frame(js.unchecked_ref())?;
        Ok(FrameHandle(id))
    }

    fn cancel(&self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame({}) failed: {:?}", handle.0, err);
        }
    }
}

fn client_size(element: &HtmlElement) -> Size {
    Size::new(
        element.client_width().max(0) as u32,
        element.client_height().max(0) as u32,
    )
}

/// Reports a container's rendered size whenever the window resizes.
pub struct ContainerResize {
    window: Window,
    container: HtmlElement,
}

impl ContainerResize {
    pub fn new(window: Window, container: HtmlElement) -> Self {
        Self { window, container }
    }
}

impl ResizeSource for ContainerResize {
    fn current_size(&self) -> Size {
        client_size(&self.container)
    }

    fn subscribe(&self, mut callback: ResizeCallback) -> Result<Subscription, VizError> {
        let container = self.container.clone();
        let listener =
            Closure::<dyn FnMut()>::new(move || callback(client_size(&container)));
        self.window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;

        let window = self.window.clone();
        Ok(Subscription::new(move || {
            if let Err(err) = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove resize listener: {:?}", err);
            }
        }))
    }
}

/// Start `animator` while `target` is at least partly in view, stop it when
/// it scrolls out.
pub fn gate_on_visibility<V: Visualization + 'static>(
    target: &Element,
    animator: Animator<V>,
) -> Result<(), VizError> {
    let on_change = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if let Err(err) = animator.set_visible(entry.is_intersecting()) {
                log::error!("{}: {err}", animator.name());
            }
        }
    });

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(on_change.as_ref().unchecked_ref(), &options)?;
    observer.observe(target);

    // observer and callback live as long as the page
    on_change.forget();
    Ok(())
}
