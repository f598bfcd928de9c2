//! Scoped browser resources
//!
//! Every listener, interval and frame request is owned by a handle and released
//! when the handle drops.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// An event listener, removed on drop
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// A repeating timer, cleared on drop
pub struct Interval {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new<F>(period_ms: i32, tick: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut()>::new(tick);
        let id = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

struct LoopState {
    request: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopState {
    fn schedule(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(callback) = self.callback.borrow().as_ref() {
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.request.set(Some(id)),
                Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
            }
        }
    }
}

/// A requestAnimationFrame loop that re-arms itself after every frame.
/// Dropping the handle cancels the pending frame and frees the callback.
pub struct AnimationLoop {
    state: Rc<LoopState>,
}

impl AnimationLoop {
    pub fn start<F>(mut frame: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let state = Rc::new(LoopState {
            request: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak: Weak<LoopState> = Rc::downgrade(&state);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.request.set(None);
            frame(time);
            state.schedule();
        });
        *state.callback.borrow_mut() = Some(closure);
        state.schedule();
        Self { state }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let (Some(window), Some(id)) = (web_sys::window(), self.state.request.take()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.state.callback.borrow_mut().take();
    }
}
