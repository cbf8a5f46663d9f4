//! Sketchbook entry point
//!
//! Handles platform-specific initialization and drives the gallery.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, IntersectionObserver,
        IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
    };

    use sketchbook::consts::FRAME_DT;
    use sketchbook::explorer::Explorer;
    use sketchbook::input::parse_or;
    use sketchbook::renderer::CanvasSurface;
    use sketchbook::{
        ContainerInfo, FrameInput, Gallery, GalleryConfig, Host, LoopState, Settings, Theme,
    };

    /// Optional `<script type="application/json">` holding a gallery config
    const CONFIG_ELEMENT_ID: &str = "sketchbook-config";
    /// Share of a container that must be on screen before it becomes active
    const VISIBLE_THRESHOLD: f64 = 0.25;

    /// Container lookups against the live document
    struct DomHost {
        window: web_sys::Window,
        document: Document,
    }

    impl Host for DomHost {
        fn container(&self, id: &str) -> Option<ContainerInfo> {
            let element = self.document.get_element_by_id(id)?;
            let mut height = element.client_height() as f32;
            // Full-window sketches sit in containers that have no height of their own
            if height <= 0.0 {
                height = self
                    .window
                    .inner_height()
                    .ok()
                    .and_then(|h| h.as_f64())
                    .unwrap_or(0.0) as f32;
            }
            Some(ContainerInfo {
                id: id.to_owned(),
                width: element.client_width() as f32,
                height,
            })
        }
    }

    /// DOM pieces created for a sketch the first time it becomes active
    struct Mount {
        surface: CanvasSurface,
        sliders: Vec<(HtmlInputElement, f32)>,
        halted: bool,
    }

    struct App {
        gallery: Gallery,
        host: DomHost,
        mounts: HashMap<String, Mount>,
        input: FrameInput,
        settings: Settings,
        last_time: f64,
        dpr: f64,
    }

    impl App {
        fn slider_values(&self, id: &str) -> Vec<f32> {
            self.mounts
                .get(id)
                .map(|m| {
                    m.sliders
                        .iter()
                        .map(|(el, default)| parse_or(&el.value(), *default as f64) as f32)
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Sketchbook starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let config = load_config(&document);
        let mut settings = Settings::load();
        if let Some(theme) = document.body().and_then(|b| b.get_attribute("data-theme")) {
            settings.theme = Theme::from_attr(&theme);
        }

        let ids: Vec<String> = config
            .sketches
            .iter()
            .map(|entry| entry.container_id.clone())
            .collect();
        let host = DomHost {
            window: window.clone(),
            document: document.clone(),
        };
        let mut gallery = Gallery::new(config, settings.clone());
        log::info!("Gallery seed: {}", gallery.seed());

        // Entries without a container are disabled now; the rest mount lazily
        for id in &ids {
            if host.container(id).is_none() {
                let _ = gallery.mount(id, &host);
            }
        }

        let app = Rc::new(RefCell::new(App {
            gallery,
            host,
            mounts: HashMap::new(),
            input: FrameInput::default(),
            settings,
            last_time: 0.0,
            dpr: window.device_pixel_ratio(),
        }));

        observe_containers(&app, &ids)?;
        setup_keyboard(&app, &window);
        setup_auto_pause(&app, &document);
        setup_resize(&app, &window);
        setup_theme(&app, &document);
        setup_explorer(&document);

        request_animation_frame(app);

        log::info!("Sketchbook running!");
        Ok(())
    }

    fn load_config(document: &Document) -> GalleryConfig {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return discovered_config(document);
        };
        match GalleryConfig::from_json(&text) {
            Ok(config) => {
                log::info!("Loaded gallery config ({} sketches)", config.sketches.len());
                config
            }
            Err(e) => {
                log::warn!("Ignoring gallery config: {}", e);
                discovered_config(document)
            }
        }
    }

    /// Default config narrowed to the `sketch-*` containers present on the page
    fn discovered_config(document: &Document) -> GalleryConfig {
        let mut found = Vec::new();
        if let Ok(list) = document.query_selector_all("[id^=\"sketch-\"]") {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    found.push(el.id());
                }
            }
        }

        let mut config = GalleryConfig::default();
        config.sketches.retain(|entry| found.contains(&entry.container_id));
        for id in &found {
            if !config.sketches.iter().any(|entry| &entry.container_id == id) {
                log::warn!("No sketch registered for container '{}'", id);
            }
        }
        config
    }

    fn observe_containers(app: &Rc<RefCell<App>>, ids: &[String]) -> Result<(), JsValue> {
        let app_cb = app.clone();
        let callback = Closure::<dyn FnMut(_, _)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let id = entry.target().id();
                    if entry.is_intersecting() {
                        activate(&app_cb, &id);
                    } else {
                        app_cb.borrow_mut().gallery.deactivate(&id);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(VISIBLE_THRESHOLD));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        callback.forget();

        let document = app.borrow().host.document.clone();
        for id in ids {
            if let Some(element) = document.get_element_by_id(id) {
                observer.observe(&element);
            }
        }
        Ok(())
    }

    fn activate(app: &Rc<RefCell<App>>, id: &str) {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;

        if let Err(e) = a.gallery.activate(id, &a.host) {
            log::warn!("Sketch '{}' unavailable: {}", id, e);
            return;
        }
        a.input = FrameInput::default();
        a.last_time = 0.0;

        if a.mounts.contains_key(id) {
            return;
        }
        match create_mount(a, id) {
            Ok(mount) => {
                attach_pointer(app, id, mount.surface.element());
                a.mounts.insert(id.to_owned(), mount);
            }
            Err(e) => log::error!("Could not create canvas for '{}': {:?}", id, e),
        }
    }

    fn create_mount(a: &App, id: &str) -> Result<Mount, JsValue> {
        let document = &a.host.document;
        let container = document
            .get_element_by_id(id)
            .ok_or_else(|| js_error(format!("container '{}' vanished", id)))?;
        let viewport = a
            .gallery
            .viewport(id)
            .ok_or_else(|| js_error(format!("'{}' is not mounted", id)))?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        container.append_child(&canvas)?;
        let surface = CanvasSurface::new(canvas, viewport, a.dpr).map_err(js_error)?;

        let mut sliders = Vec::new();
        if let Some(features) = a.gallery.features(id) {
            for (i, slider) in features.sliders.iter().enumerate() {
                let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
                input.set_type("range");
                input.set_id(&format!("{}-slider-{}", id, i));
                input.set_min(&slider.min.to_string());
                input.set_max(&slider.max.to_string());
                input.set_step("any");
                input.set_value(&slider.default.to_string());
                container.append_child(&input)?;
                sliders.push((input, slider.default));
            }
        }

        Ok(Mount {
            surface,
            sliders,
            halted: false,
        })
    }

    fn attach_pointer(app: &Rc<RefCell<App>>, id: &str, canvas: &HtmlCanvasElement) {
        for (event_name, press) in [("mousemove", false), ("mousedown", true)] {
            let app = app.clone();
            let id = id.to_owned();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.gallery.active_id() != Some(id.as_str()) {
                    return;
                }
                a.input.pointer = Some(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
                if press {
                    a.input.pressed = true;
                }
            });
            let _ = canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: &Rc<RefCell<App>>, window: &web_sys::Window) {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            let mut chars = key.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                let mut a = app.borrow_mut();
                if a.gallery.active_id().is_some() {
                    a.input.key = Some(c);
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(app: &Rc<RefCell<App>>, document: &Document) {
        let app = app.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                a.gallery.pause_all();
                log::info!("Auto-paused (tab hidden)");
            } else {
                a.last_time = 0.0;
                a.gallery.resume_active();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: &Rc<RefCell<App>>, window: &web_sys::Window) {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            for id in a.gallery.resize(&a.host) {
                let (Some(mount), Some(viewport)) = (a.mounts.get_mut(&id), a.gallery.viewport(&id))
                else {
                    continue;
                };
                if let Err(e) = mount.surface.resize(viewport) {
                    log::warn!("Resize of '{}' failed: {}", id, e);
                }
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// The page's theme toggle fires `themeChanged` on the body after updating `data-theme`
    fn setup_theme(app: &Rc<RefCell<App>>, document: &Document) {
        let Some(body) = document.body() else {
            return;
        };
        let app = app.clone();
        let body_clone: HtmlElement = body.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let theme = body_clone
                .get_attribute("data-theme")
                .map(|t| Theme::from_attr(&t))
                .unwrap_or_default();
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.gallery.set_theme(theme);
            for (id, mount) in a.mounts.iter_mut() {
                a.gallery.redraw(id, &mut mount.surface);
            }
            a.settings.theme = theme;
            a.settings.save();
        });
        let _ = body.add_event_listener_with_callback("themeChanged", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Wire the permittivity explorer form if the page has one
    fn setup_explorer(document: &Document) {
        let field = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        };
        let (Some(eps_r), Some(sigma), Some(freq)) =
            (field("eps-r"), field("sigma"), field("frequency"))
        else {
            return;
        };

        let explorer = Rc::new(RefCell::new(Explorer::default()));
        let document = document.clone();
        let inputs = (eps_r.clone(), sigma.clone(), freq.clone());
        let update = move || {
            let result = explorer
                .borrow_mut()
                .update(&inputs.0.value(), &inputs.1.value(), &inputs.2.value());
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            set_text("eps-r-value", &format!("{:.1}", result.eps_r));
            set_text("sigma-value", &format!("{:.2}", result.sigma));
            set_text("frequency-value", &format!("{:.1}", result.freq_ghz));
            set_text("frequency-ghz-display", &format!("{:.1}", result.freq_ghz));
            set_text("omega-value", &result.omega_text());
            set_text("epsilon-prime-rel-value", &result.eps_prime_text());
            set_text("epsilon-double-prime-rel-value", &result.eps_double_prime_text());
            set_text("epsilon-c-rel-value", &result.complex_text());
            set_text("epsilon-interp", result.interpretation());

            let Some(marker) = document
                .get_element_by_id("epsilon-point-marker")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let style = marker.style();
            match result.plot {
                Some(point) => {
                    let _ = style.set_property("display", "block");
                    let _ = style.set_property("left", &format!("{}%", point.x_pct));
                    let _ = style.set_property("bottom", &format!("{}%", point.y_pct));
                    let classes = marker.class_list();
                    let _ = classes.toggle_with_force("at-max-real", point.at_max_real);
                    let _ = classes.toggle_with_force("at-max-imag", point.at_max_imag);
                    let _ = classes.toggle_with_force("at-origin", point.at_origin);
                }
                None => {
                    let _ = style.set_property("display", "none");
                }
            }
        };

        update();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| update());
        for input in [&eps_r, &sigma, &freq] {
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; animation stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            a.last_time = time;

            if let Some(id) = a.gallery.active_id().map(str::to_owned) {
                a.input.dt = dt;
                a.input.sliders = a.slider_values(&id);
                if let Some(mount) = a.mounts.get_mut(&id) {
                    let state = a.gallery.frame_active(&a.input, &mut mount.surface);
                    if state == Some(LoopState::Halted) && !mount.halted {
                        mount.halted = true;
                        let _ = mount.surface.element().set_attribute("data-halted", "true");
                    }
                }
                a.input.consume_one_shots();
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use sketchbook::consts::FRAME_DT;
    use sketchbook::input::parse_or;
    use sketchbook::renderer::DrawList;
    use sketchbook::{
        ContainerInfo, FrameInput, Gallery, GalleryConfig, Host, LoopState, Result, Settings,
        SketchError, SketchKind,
    };

    const DEFAULT_FRAMES: u32 = 600;

    /// Every container exists and has the same size
    struct FixedHost {
        width: f32,
        height: f32,
    }

    impl Host for FixedHost {
        fn container(&self, id: &str) -> Option<ContainerInfo> {
            Some(ContainerInfo {
                id: id.to_owned(),
                width: self.width,
                height: self.height,
            })
        }
    }

    /// `sketchbook [--quality=<low|medium|high>] [--no-trails] [--fps] [config.json] [frames]`
    pub fn run(args: &[String]) -> Result<()> {
        let mut settings = Settings::load();
        let args = settings.apply_flags(args)?;
        log::info!("Quality: {}", settings.quality.as_str());

        let config = match args.first() {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| SketchError::Config(format!("{}: {}", path, e)))?;
                GalleryConfig::from_json(&text)?
            }
            None => GalleryConfig::default(),
        };
        let frames = args
            .get(1)
            .map(|s| parse_or(s, DEFAULT_FRAMES as f64).max(0.0) as u32)
            .unwrap_or(DEFAULT_FRAMES);

        let targets: Vec<(String, SketchKind)> = config
            .sketches
            .iter()
            .filter(|entry| matches!(entry.kind, SketchKind::Gravity | SketchKind::Walker))
            .map(|entry| (entry.container_id.clone(), entry.kind))
            .collect();

        let host = FixedHost {
            width: 800.0,
            height: 600.0,
        };
        let mut gallery = Gallery::new(config, settings);
        log::info!("Gallery seed: {}", gallery.seed());

        for (id, kind) in targets {
            gallery.activate(&id, &host)?;
            let viewport = gallery.viewport(&id).unwrap_or_default();
            let mut canvas = DrawList::new(viewport);

            let mut state = LoopState::Running;
            let mut ran = 0;
            while ran < frames && state == LoopState::Running {
                canvas.clear_commands();
                let Some(next) = gallery.frame_active(&FrameInput::with_dt(FRAME_DT), &mut canvas)
                else {
                    break;
                };
                state = next;
                ran += 1;
            }

            log::info!(
                "{:?} '{}': {} frames, {:?}, {} draw commands in the last frame",
                kind,
                id,
                ran,
                state,
                canvas.len()
            );
            if let Some(err) = gallery.error(&id) {
                log::warn!("'{}' halted: {}", id, err);
            }
            println!("{:<20} {:>5} frames  {:?}", id, ran, state);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = web_app::run() {
        log::error!("Sketchbook failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sketchbook (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = headless::run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
