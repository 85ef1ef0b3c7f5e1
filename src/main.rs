//! Snap Pals entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, PageTransitionEvent, PointerEvent};

    use snap_pals::audio::{AudioManager, SoundEffect};
    use snap_pals::sim::{self, PieceId, PuzzleEvent, PuzzleState, StageMarker, Surface};
    use snap_pals::{Roster, Settings};

    /// Game instance holding all state
    struct Game {
        state: PuzzleState,
        audio: AudioManager,
        board: HtmlElement,
        /// Events produced since the last flush
        events: Vec<PuzzleEvent>,
    }

    impl Game {
        fn new(settings: Settings, roster: Roster, seed: u64, board: HtmlElement) -> Self {
            Self {
                audio: AudioManager::new(&settings),
                state: PuzzleState::new(settings, roster, seed),
                board,
                events: Vec::new(),
            }
        }

        /// Measure the board right now
        fn surface(&self) -> Option<Surface> {
            let rect = self.board.get_bounding_client_rect();
            Surface::measured(rect.width() as f32, rect.height() as f32)
        }

        /// Pointer position in board coordinates
        fn local_point(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.board.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }

        /// Once-per-frame work: deferred placement and timers
        fn update(&mut self, now: f64) {
            let surface = self.surface();
            sim::ensure_placed(&mut self.state, surface, &mut self.events);
            sim::tick(&mut self.state, now, &mut self.events);
        }

        /// Sync the DOM with the puzzle state
        fn render(&self, document: &Document) {
            let state = &self.state;
            let character = state.character();

            if let Some(surface) = self.surface() {
                let target = sim::target_rect(surface, &state.settings);
                if let Some(el) = html_by_id(document, "target") {
                    place(&el, target.pos, target.size);
                }
            }

            let piece_size = Vec2::new(state.settings.image_width, state.settings.piece_height());
            for piece in PieceId::ALL {
                let id = format!("piece-{}", piece.as_str());
                let Some(el) = html_by_id(document, &id) else {
                    continue;
                };
                let p = state.pieces.get(piece);
                place(&el, p.pos, piece_size);
                toggle_class(&el, "hidden", p.snapped || !state.placed);
                toggle_class(&el, "dragging", state.dragging() == Some(piece));
                if let Some(img) = el.first_element_child() {
                    let _ = img.set_attribute("src", &character.image);
                }

                let slot_id = format!("slot-{}", piece.as_str());
                if let Some(slot) = document.get_element_by_id(&slot_id) {
                    toggle_class(&slot, "filled", p.snapped);
                    if let Some(img) = slot.first_element_child() {
                        let _ = img.set_attribute("src", &character.image);
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("character-name") {
                el.set_text_content(Some(&character.name));
            }
            if let Some(el) = document.get_element_by_id("popup-name") {
                el.set_text_content(Some(&format!("{} 완성!", character.name)));
            }
            if let Some(el) = document.get_element_by_id("popup-next") {
                let label = if state.is_last_stage() {
                    "🏆 처음부터 다시!"
                } else {
                    "다음 단계로 ➡️"
                };
                el.set_text_content(Some(label));
            }

            if let Some(el) = document.get_element_by_id("complete-banner") {
                toggle_class(&el, "hidden", !state.completed() || state.popup_visible());
            }
            if let Some(el) = document.get_element_by_id("popup") {
                toggle_class(&el, "hidden", !state.popup_visible());
            }
            if let Some(el) = document.get_element_by_id("menu") {
                toggle_class(&el, "hidden", !state.menu_open);
            }
            if let Some(el) = document.get_element_by_id("celebration") {
                toggle_class(&el, "hidden", !state.celebrating);
            }

            if let Some(dots) = document.get_element_by_id("stage-dots") {
                let children = dots.children();
                for i in 0..children.length() {
                    let Some(dot) = children.item(i) else { continue };
                    let class = match state.stage_marker(i as usize) {
                        StageMarker::Done => "dot done",
                        StageMarker::Current => "dot current",
                        StageMarker::Pending => "dot",
                    };
                    let _ = dot.set_attribute("class", class);
                }
            }
        }
    }

    fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn place(el: &HtmlElement, pos: Vec2, size: Vec2) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", pos.x));
        let _ = style.set_property("top", &format!("{}px", pos.y));
        let _ = style.set_property("width", &format!("{}px", size.x));
        let _ = style.set_property("height", &format!("{}px", size.y));
    }

    fn toggle_class(el: &Element, class: &str, on: bool) {
        let _ = el.class_list().toggle_with_force(class, on);
    }

    /// Read a JSON blob from a `<script type="application/json">` tag
    fn embedded_json(document: &Document, id: &str) -> Option<String> {
        document.get_element_by_id(id)?.text_content()
    }

    fn load_settings(document: &Document) -> Settings {
        match embedded_json(document, "puzzle-settings").map(|json| Settings::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded embedded settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Bad embedded settings ({}), using defaults", e);
                Settings::default()
            }
            None => Settings::default(),
        }
    }

    fn load_roster(document: &Document) -> Roster {
        match embedded_json(document, "puzzle-roster").map(|json| Roster::from_json(&json)) {
            Some(Ok(roster)) => {
                log::info!("Loaded roster with {} characters", roster.len());
                roster
            }
            Some(Err(e)) => {
                log::warn!("Bad embedded roster ({}), using defaults", e);
                Roster::default()
            }
            None => Roster::default(),
        }
    }

    /// Hand queued events to their collaborators (audio, celebration overlay)
    fn flush_events(game: &Rc<RefCell<Game>>) {
        let (events, celebration_ms) = {
            let mut g = game.borrow_mut();
            (std::mem::take(&mut g.events), g.state.settings.celebration_ms)
        };

        for event in events {
            if let Some(effect) = SoundEffect::for_event(&event) {
                game.borrow().audio.play(effect);
            }
            match event {
                PuzzleEvent::Celebration { epoch } => {
                    schedule_celebration_end(game.clone(), epoch, celebration_ms);
                }
                PuzzleEvent::StageStarted { stage } => {
                    log::info!("Stage {} started", stage + 1);
                }
                PuzzleEvent::MenuOpened => log::info!("Menu opened"),
                _ => log::debug!("{:?}", event),
            }
        }
    }

    /// The overlay reports back once its display cycle is over
    fn schedule_celebration_end(game: Rc<RefCell<Game>>, epoch: u32, after_ms: f64) {
        let closure = Closure::once(move || {
            let cleared = sim::finish_celebration(&mut game.borrow_mut().state, epoch);
            if !cleared {
                log::debug!("Ignoring stale celebration end (epoch {})", epoch);
            }
        });
        let _ = web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                after_ms as i32,
            );
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Snap Pals starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let board = html_by_id(&document, "board").expect("no board element");
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            load_settings(&document),
            load_roster(&document),
            seed,
            board.clone(),
        )));
        log::info!("Puzzle initialized with seed: {}", seed);

        setup_piece_handlers(&document, game.clone());
        setup_board_handlers(&board, game.clone());
        setup_buttons(&document, game.clone());

        setup_teardown(game.clone());

        request_animation_frame(game);
        log::info!("Snap Pals running!");
    }

    /// Page going away for good: drop timers so nothing fires into a dead
    /// board. A page parked in the back/forward cache is resumed instead.
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if event.persisted() {
                    log::info!("Page cached, keeping puzzle state");
                    return;
                }
                sim::teardown(&mut game.borrow_mut().state);
                log::info!("Puzzle torn down");
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if event.persisted() {
                sim::resume(&mut game.borrow_mut().state, js_sys::Date::now());
                log::info!("Puzzle resumed from page cache");
            }
        });
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_piece_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        for piece in PieceId::ALL {
            let Some(el) = html_by_id(document, &format!("piece-{}", piece.as_str())) else {
                log::warn!("Missing element for {} piece", piece.as_str());
                continue;
            };
            let game = game.clone();
            let el_clone = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                event.stop_propagation();
                let started = {
                    let mut g = game.borrow_mut();
                    let point = g.local_point(&event);
                    let Game { state, events, .. } = &mut *g;
                    sim::begin_drag(state, piece, point, events)
                };
                if started {
                    // Keep move/up on this piece even if the pointer outruns it
                    let _ = el_clone.set_pointer_capture(event.pointer_id());
                }
                flush_events(&game);
            });
            let _ = el.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_board_handlers(board: &HtmlElement, game: Rc<RefCell<Game>>) {
        // Background press (long press opens the menu)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                sim::press_started(&mut game.borrow_mut().state, js_sys::Date::now());
            });
            let _ = board.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag follow
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.state.dragging().is_some() {
                    let point = g.local_point(&event);
                    sim::update_drag(&mut g.state, point);
                }
            });
            let _ = board.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release
        for kind in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                {
                    let mut g = game.borrow_mut();
                    sim::press_released(&mut g.state);
                    let surface = g.surface();
                    let Game { state, events, .. } = &mut *g;
                    if let Some(outcome) = sim::end_drag(state, surface, js_sys::Date::now(), events) {
                        log::debug!("Drop: {:?}", outcome);
                    }
                }
                flush_events(&game);
            });
            let _ = board.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the board cancels a pending long press; captured drags continue
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                sim::press_released(&mut game.borrow_mut().state);
            });
            let _ = board.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Next stage (popup)
        if let Some(btn) = document.get_element_by_id("popup-next") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    let surface = g.surface();
                    let Game { state, events, .. } = &mut *g;
                    sim::advance_stage(state, surface, events);
                }
                flush_events(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Menu: restart
        if let Some(btn) = document.get_element_by_id("menu-restart") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                {
                    let mut g = game.borrow_mut();
                    let surface = g.surface();
                    let Game { state, events, .. } = &mut *g;
                    sim::restart_from_menu(state, surface, events);
                }
                log::info!("Stage restarted from menu");
                flush_events(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Menu backdrop closes it
        if let Some(menu) = document.get_element_by_id("menu") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                sim::close_menu(&mut game.borrow_mut().state);
            });
            let _ = menu.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        game.borrow_mut().update(js_sys::Date::now());
        flush_events(&game);
        game.borrow().render(&document);

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snap Pals (native) starting...");
    log::info!("Native mode has no board - run with `trunk serve` for the web version");

    println!("\nPlaying a scripted stage...");
    scripted_stage();
}

/// Solve one stage end to end and print what the core asked for
#[cfg(not(target_arch = "wasm32"))]
fn scripted_stage() {
    use glam::Vec2;
    use snap_pals::audio::SoundEffect;
    use snap_pals::sim::{self, PieceId, PuzzleState, Surface};
    use snap_pals::{Roster, Settings};

    let surface = Some(Surface::new(800.0, 600.0));
    let mut state = PuzzleState::new(Settings::default(), Roster::default(), 2024);
    let mut events = Vec::new();

    sim::ensure_placed(&mut state, surface, &mut events);
    println!("Stage 1: {}", state.character().name);

    let mut now = 0.0;
    for (piece, nudge) in [(PieceId::Top, Vec2::ZERO), (PieceId::Bottom, Vec2::new(0.0, 50.0))] {
        let grab = state.pieces.get(piece).pos;
        let slot = sim::slot_for(piece, Surface::new(800.0, 600.0), &state.settings);
        sim::begin_drag(&mut state, piece, grab, &mut events);
        sim::update_drag(&mut state, slot + nudge);
        let outcome = sim::end_drag(&mut state, surface, now, &mut events);
        println!("  {} piece: {:?}", piece.as_str(), outcome);
        now += 500.0;
    }

    let popup_at = now + state.settings.popup_delay_ms;
    sim::tick(&mut state, popup_at, &mut events);
    sim::advance_stage(&mut state, surface, &mut events);

    for event in &events {
        match SoundEffect::for_event(event) {
            Some(effect) => println!("  {:?} -> {:?}", event, effect),
            None => println!("  {:?}", event),
        }
    }
    println!("Now on stage {}: {}", state.stage_index + 1, state.character().name);
}
