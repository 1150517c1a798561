/// Ownership of everything a viewer attaches to the page.
///
/// Canvases, window listeners and the animation-frame callback are all
/// recorded in [`Mounted`]. Dropping it, whether through `Viewer::unmount`,
/// garbage collection of the viewer, or an error halfway through `mount`,
/// detaches every one of them.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, Window};

use crate::scene::Scene;

/// Whether a computed `position` leaves absolutely positioned children
/// anchored to some ancestor instead of this element
pub(crate) fn needs_positioning(position: &str) -> bool {
    matches!(position.trim(), "" | "static")
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            console::warn_2(&JsValue::from_str(self.event), &err);
        }
    }
}

pub(crate) struct Mounted {
    window: Window,
    container: Element,
    canvases: Vec<HtmlCanvasElement>,
    listeners: Vec<Listener>,
    frame: FrameCallback,
    frame_handle: Rc<Cell<Option<i32>>>,
    positioned_container: bool,
}

impl Mounted {
    pub(crate) fn new(window: Window, container: Element) -> Self {
        Self {
            window,
            container,
            canvases: Vec::new(),
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
            frame_handle: Rc::new(Cell::new(None)),
            positioned_container: false,
        }
    }

    /// Make the container the containing block for the label overlay,
    /// unless it already is one
    pub(crate) fn position_container(&mut self) -> Result<(), JsValue> {
        let Some(element) = self.container.dyn_ref::<HtmlElement>() else {
            return Ok(());
        };
        let position = match self.window.get_computed_style(element)? {
            Some(style) => style.get_property_value("position")?,
            None => String::new(),
        };
        if needs_positioning(&position) {
            element.style().set_property("position", "relative")?;
            self.positioned_container = true;
        }
        Ok(())
    }

    /// Append `canvas` to the container; it is removed again on drop
    pub(crate) fn attach(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        self.container.append_child(canvas)?;
        self.canvases.push(canvas.clone());
        Ok(())
    }

    /// Register `handler` for `event` on the window
    pub(crate) fn listen<F>(&mut self, event: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let target: EventTarget = self.window.clone().into();
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target,
            event,
            callback,
        });
        Ok(())
    }

    /// Drive `scene` from requestAnimationFrame until dropped
    pub(crate) fn start_frames(&mut self, scene: Rc<RefCell<Scene>>) -> Result<(), JsValue> {
        let window = self.window.clone();
        let next = Rc::clone(&self.frame);
        let handle = Rc::clone(&self.frame_handle);

        // The callback re-schedules itself through `next`, a cycle broken in `drop`
        *self.frame.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            scene.borrow_mut().frame();
            if let Some(callback) = next.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => handle.set(Some(id)),
                    Err(err) => {
                        handle.set(None);
                        console::error_2(&JsValue::from_str("animation frame request failed:"), &err);
                    }
                }
            }
        }));

        let first = self.frame.borrow();
        if let Some(callback) = first.as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.frame_handle.set(Some(id));
        }
        Ok(())
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        if let Some(id) = self.frame_handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                console::warn_2(&JsValue::from_str("cancelAnimationFrame failed:"), &err);
            }
        }
        self.frame.borrow_mut().take();
        self.listeners.clear();
        for canvas in self.canvases.drain(..) {
            canvas.remove();
        }
        if self.positioned_container {
            if let Some(element) = self.container.dyn_ref::<HtmlElement>() {
                let _ = element.style().remove_property("position");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_containers_get_positioned() {
        assert!(needs_positioning("static"));
        assert!(needs_positioning(""));
        assert!(needs_positioning(" static "));
    }

    #[test]
    fn test_positioned_containers_are_left_alone() {
        for position in ["relative", "absolute", "fixed", "sticky"] {
            assert!(!needs_positioning(position), "{}", position);
        }
    }
}
