//! Brick Survey entry point
//!
//! Handles platform-specific initialization and wires the survey and the
//! brick wall to the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement,
        HtmlTextAreaElement, MouseEvent, Window,
    };

    use brick_survey::{Settings, SettingsChange};
    use brick_survey::background::{FrameLimiter, TileField};
    use brick_survey::platform::{self, AnimationLoop, Interval, Listener, LocalStorage};
    use brick_survey::pointer::{
        BUTTON_SELECTOR, CursorFollower, FORM_SELECTOR, HoverKind, NO_POP_SELECTOR, SharedPointer,
    };
    use brick_survey::renderer::CanvasRenderer;
    use brick_survey::survey::{Phase, QuestionSet, Survey};
    use brick_survey::ui::{self, Effects};

    /// Class on <html> that hides the native cursor
    const HIDE_CURSOR_CLASS: &str = "custom-cursor-hide";

    /// Everything the page's callbacks share
    struct App {
        document: Document,
        survey: Survey<LocalStorage>,
        effects: Effects,
        field: TileField,
        renderer: CanvasRenderer,
        limiter: FrameLimiter,
        pointer: SharedPointer,
        cursor: Option<(CursorFollower, HtmlElement, HtmlElement)>,
        /// Elapsed-time hint for the question on screen
        ticker: Option<Interval>,
        settings: Settings,
        settings_store: LocalStorage,
    }

    impl App {
        fn element(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn render_screen(&self, now: f64) {
            if let Some(root) = self.element("app") {
                root.set_inner_html(&ui::screen(&self.survey, &self.effects, now));
            }
        }

        fn render_hud(&self) {
            if let Some(hud) = self.element("hud") {
                hud.set_inner_html(&ui::hud(self.survey.progress(), &self.effects, &self.settings));
            }
        }

        fn update_timer(&self, now: f64) {
            if !matches!(self.survey.phase(), Phase::InProgress { .. }) {
                return;
            }
            if let Ok(Some(el)) = self.document.query_selector(".timer") {
                let hint = ui::timer_hint(self.survey.session().elapsed_ms(now));
                el.set_text_content(Some(&hint));
            }
        }

        /// One animation frame (called at display rate)
        fn frame(&mut self, time: f64) {
            if let Some(dt) = self.limiter.accept(time) {
                self.field
                    .step(dt, (time / 1000.0) as f32, self.pointer.get());
                if let Err(e) = self.renderer.draw(self.field.sprites()) {
                    log::warn!("Draw failed: {:?}", e);
                }
            }

            if let Some((cursor, ring, dot)) = self.cursor.as_mut() {
                cursor.update();
                let _ = ring.style().set_property("transform", &cursor.ring_transform());
                let _ = ring.set_attribute("data-type", cursor.hover.as_str());
                let _ = dot.style().set_property("transform", &cursor.dot_transform());
            }

            let now = platform::now_ms();
            if self.effects.next_expiry().is_some_and(|at| now >= at) {
                let confetti = self.effects.confetti_active();
                if self.effects.expire(now) {
                    self.render_hud();
                    if confetti && !self.effects.confetti_active() {
                        self.render_screen(now);
                    }
                }
            }
        }

        fn resize(&mut self, window: &Window) {
            let size = viewport(window);
            if let Err(e) = self.renderer.resize(size, window.device_pixel_ratio()) {
                log::warn!("Canvas resize failed: {:?}", e);
            }
            self.field.resize(size);
        }

        /// Apply a HUD settings control to the wall and persist it
        fn change_settings(&mut self, change: SettingsChange) {
            if !self.settings.apply(change) {
                return;
            }
            match change {
                SettingsChange::Quality(_) => self.field.set_max_tiles(self.settings.max_tiles()),
                SettingsChange::ToggleMotion => {
                    self.field.set_reduced_motion(self.settings.reduced_motion)
                }
            }
            self.settings.save(&mut self.settings_store);
            log::info!(
                "Settings: {} quality, reduced motion {}",
                self.settings.quality.as_str(),
                self.settings.reduced_motion
            );
        }
    }

    impl Drop for App {
        fn drop(&mut self) {
            if let Some((_, ring, dot)) = self.cursor.take() {
                ring.remove();
                dot.remove();
            }
            if let Some(html) = self.document.document_element() {
                let _ = html.class_list().remove_1(HIDE_CURSOR_CLASS);
            }
        }
    }

    /// Resources released on teardown
    struct Page {
        _listeners: Vec<Listener>,
        _frames: AnimationLoop,
        _app: Rc<RefCell<App>>,
    }

    thread_local! {
        static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    }

    fn viewport(window: &Window) -> Vec2 {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        Vec2::new(w as f32, h as f32)
    }

    fn ensure_element(document: &Document, tag: &str, id: &str) -> Result<Element, JsValue> {
        if let Some(el) = document.get_element_by_id(id) {
            return Ok(el);
        }
        let el = document.create_element(tag)?;
        el.set_id(id);
        document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&el)?;
        Ok(el)
    }

    fn closest(target: Option<EventTarget>, selector: &str) -> bool {
        target
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(selector).ok().flatten())
            .is_some()
    }

    fn hover_kind(target: Option<EventTarget>) -> HoverKind {
        if closest(target.clone(), BUTTON_SELECTOR) {
            HoverKind::Button
        } else if closest(target, FORM_SELECTOR) {
            HoverKind::Form
        } else {
            HoverKind::Default
        }
    }

    fn create_cursor(document: &Document) -> Result<(HtmlElement, HtmlElement), JsValue> {
        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        let ring: HtmlElement = document.create_element("div")?.dyn_into()?;
        ring.set_class_name("cursor-ring");
        body.append_child(&ring)?;
        let dot: HtmlElement = document.create_element("div")?.dyn_into()?;
        dot.set_class_name("cursor-dot");
        body.append_child(&dot)?;
        if let Some(html) = document.document_element() {
            html.class_list().add_1(HIDE_CURSOR_CLASS)?;
        }
        Ok((ring, dot))
    }

    /// Restart the elapsed-time ticker when a question is on screen
    fn arm_ticker(app: &Rc<RefCell<App>>) {
        let in_progress = matches!(app.borrow().survey.phase(), Phase::InProgress { .. });
        let ticker = if in_progress {
            let weak = Rc::downgrade(app);
            match Interval::new(1000, move || {
                if let Some(app) = weak.upgrade() {
                    app.borrow().update_timer(platform::now_ms());
                }
            }) {
                Ok(interval) => Some(interval),
                Err(e) => {
                    log::warn!("Timer unavailable: {:?}", e);
                    None
                }
            }
        } else {
            None
        };
        // replacing drops (and clears) the previous interval
        app.borrow_mut().ticker = ticker;
    }

    fn dispatch(app: &Rc<RefCell<App>>, action: &str, value: Option<String>) {
        let now = platform::now_ms();
        if let Some(change) = SettingsChange::parse(action, value.as_deref()) {
            let mut a = app.borrow_mut();
            a.change_settings(change);
            a.render_hud();
            return;
        }
        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            match action {
                "start" => a.survey.start(now),
                "answer" | "submit-text" => {
                    let value = value.unwrap_or_default();
                    match a.survey.answer(&value, now) {
                        Ok(outcome) => a.effects.on_answer(&outcome, now),
                        Err(e) => log::warn!("Answer ignored: {}", e),
                    }
                }
                "next" => {
                    a.survey.next(now);
                }
                "prev" => {
                    a.survey.prev(now);
                }
                "restart" => {
                    a.effects.clear_confetti();
                    a.survey.restart(now);
                }
                "view" => {
                    a.survey.view_responses();
                }
                "back" => {
                    a.survey.go_back();
                }
                other => {
                    log::warn!("Unknown action {:?}", other);
                    return;
                }
            }
            a.render_screen(now);
            a.render_hud();
        }
        arm_ticker(app);
    }

    /// Click delegation: any `[data-action]` element under `root` dispatches
    fn action_listener(root: &Element, app: &Rc<RefCell<App>>) -> Result<Listener, JsValue> {
        let weak = Rc::downgrade(app);
        Listener::new(root, "click", move |event: Event| {
            let Some(app) = weak.upgrade() else {
                return;
            };
            let Some(button) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let Some(action) = button.get_attribute("data-action") else {
                return;
            };
            let value = if action == "submit-text" {
                app.borrow()
                    .element("text-answer")
                    .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
                    .map(|area| area.value())
            } else {
                button.get_attribute("data-value")
            };
            dispatch(&app, &action, value);
        })
    }

    fn setup_listeners(
        window: &Window,
        document: &Document,
        app: &Rc<RefCell<App>>,
        pointer: &SharedPointer,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::new();

        // Pointer tracking: the canvas is fixed at the viewport origin, so
        // client coordinates are canvas coordinates
        {
            let weak: Weak<RefCell<App>> = Rc::downgrade(app);
            let pointer = pointer.clone();
            listeners.push(Listener::new(window, "pointermove", move |event: Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pos = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                pointer.set(pos);
                if let Some(app) = weak.upgrade() {
                    let mut a = app.borrow_mut();
                    a.field.hover_at(pos);
                    if let Some((cursor, _, _)) = a.cursor.as_mut() {
                        cursor.hover = hover_kind(event.target());
                    }
                }
            })?);
        }

        // Clicks outside survey controls knock bricks out of the wall
        {
            let weak = Rc::downgrade(app);
            listeners.push(Listener::new(window, "pointerdown", move |event: Event| {
                if closest(event.target(), NO_POP_SELECTOR) {
                    return;
                }
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if let Some(app) = weak.upgrade() {
                    let pos = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                    app.borrow_mut().field.pop_at(pos);
                }
            })?);
        }

        {
            let weak = Rc::downgrade(app);
            listeners.push(Listener::new(window, "resize", move |_event: Event| {
                if let (Some(app), Some(window)) = (weak.upgrade(), web_sys::window()) {
                    app.borrow_mut().resize(&window);
                }
            })?);
        }

        // Survey intents and settings controls, delegated from their roots
        for (tag, id) in [("main", "app"), ("div", "hud")] {
            let root = ensure_element(document, tag, id)?;
            listeners.push(action_listener(&root, app)?);
        }

        Ok(listeners)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Brick Survey starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let questions = QuestionSet::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings_store = LocalStorage::open();
        let settings = Settings::load(&settings_store);
        let survey = Survey::new(questions, settings_store.clone());

        let canvas: HtmlCanvasElement = ensure_element(&document, "canvas", "bg-canvas")?.dyn_into()?;
        ensure_element(&document, "div", "hud")?;
        ensure_element(&document, "main", "app")?;

        let size = viewport(&window);
        let mut renderer = CanvasRenderer::new(canvas)?;
        renderer.resize(size, window.device_pixel_ratio())?;

        let seed = js_sys::Date::now() as u64;
        let mut field = TileField::new(size, settings.max_tiles(), seed);
        field.set_reduced_motion(settings.reduced_motion);
        log::info!(
            "Brick wall: {}x{} bricks (seed {})",
            field.layout().cols,
            field.layout().rows,
            seed
        );

        let pointer = SharedPointer::new(size / 2.0);
        let touch = window.navigator().max_touch_points() > 0;
        let cursor = if settings.effective_custom_cursor(touch) {
            let (ring, dot) = create_cursor(&document)?;
            Some((CursorFollower::new(pointer.clone()), ring, dot))
        } else {
            None
        };

        let app = Rc::new(RefCell::new(App {
            document: document.clone(),
            survey,
            effects: Effects::default(),
            field,
            renderer,
            limiter: FrameLimiter::new(settings.effective_frame_cap()),
            pointer: pointer.clone(),
            cursor,
            ticker: None,
            settings,
            settings_store,
        }));

        let listeners = setup_listeners(&window, &document, &app, &pointer)?;

        {
            let a = app.borrow();
            a.render_screen(platform::now_ms());
            a.render_hud();
        }

        let frames = {
            let weak = Rc::downgrade(&app);
            AnimationLoop::start(move |time| {
                if let Some(app) = weak.upgrade() {
                    app.borrow_mut().frame(time);
                }
            })
        };

        PAGE.with(|page| {
            *page.borrow_mut() = Some(Page {
                _listeners: listeners,
                _frames: frames,
                _app: app,
            });
        });

        log::info!("Brick Survey running!");
        Ok(())
    }

    /// Release every listener, timer and frame request
    pub fn teardown() {
        let page = PAGE.with(|page| page.borrow_mut().take());
        if page.is_some() {
            drop(page);
            log::info!("Brick Survey torn down");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

/// Detach the survey from the page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    wasm_app::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Survey (native) starting...");
    log::info!("Native mode has no page - run with `trunk serve` for the web version");

    if let Err(e) = walkthrough() {
        log::error!("Walkthrough failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless smoke run: answer every bundled question and knock a few bricks
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() -> Result<(), brick_survey::SurveyError> {
    use brick_survey::background::{FrameLimiter, TileField};
    use brick_survey::survey::{QuestionKind, QuestionSet, Survey};
    use brick_survey::{MemoryStore, Settings};
    use glam::Vec2;

    let settings = Settings::default();
    let mut survey = Survey::new(QuestionSet::builtin()?, MemoryStore::new());

    let mut now = 0.0;
    survey.start(now);
    while let Some(question) = survey.current_question() {
        let id = question.id;
        let answer = match &question.kind {
            QuestionKind::MultipleChoice => question.options.first().cloned().unwrap_or_default(),
            QuestionKind::Rating => question.star_count().to_string(),
            _ => "More dark mode, please.".to_string(),
        };
        now += 4_000.0;
        let outcome = survey.answer(&answer, now)?;
        println!(
            "  Q{} {:<28} +{} pts, +{} XP",
            id,
            answer,
            outcome.reward.points,
            outcome.reward.experience
        );
        for achievement in outcome.unlocked {
            println!("  ★ {}", achievement.name);
        }
    }
    let progress = survey.progress();
    println!(
        "✓ Survey complete: {} pts, {} XP, {} badges",
        progress.score,
        progress.experience,
        progress.achievements.len()
    );

    let viewport = Vec2::new(1280.0, 720.0);
    let mut field = TileField::new(viewport, settings.max_tiles(), 7);
    let mut limiter = FrameLimiter::new(settings.effective_frame_cap());
    let knocked = field.pop_at(viewport / 2.0);
    for frame in 0..240 {
        let time = frame as f64 * 1000.0 / 60.0;
        if let Some(dt) = limiter.accept(time) {
            field.step(dt, (time / 1000.0) as f32, viewport / 2.0);
        }
    }
    println!(
        "✓ Brick wall: {} of {} bricks left after knocking out {}",
        field.live_count(),
        field.tiles().len(),
        knocked
    );
    Ok(())
}
