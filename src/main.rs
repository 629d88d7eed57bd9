//! Country Quiz entry point
//!
//! Handles platform-specific initialization: the wasm build renders the quiz
//! into the DOM, the native build runs a scripted console playthrough.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, UrlSearchParams};

    use country_quiz::config::{ContentKind, QuizConfig, RULE_PRESETS};
    use country_quiz::consts::{TICK_INTERVAL_MS, TIME_URGENT_SECS};
    use country_quiz::country::{Country, load_countries};
    use country_quiz::flag_url;
    use country_quiz::quiz::{AnswerFeedback, Phase, Session, SessionPlan};

    /// App instance holding the session and scheduling state
    struct App {
        session: Session,
        /// Filtered pool; a restart rebuilds the plan from this with a new seed
        pool: Vec<Country>,
        config: QuizConfig,
        /// Bumped on every index change so countdown closures scheduled for
        /// an earlier question return without touching the session
        timer_serial: u64,
        /// Set by the session's restart hook, consumed by the shell
        restart_requested: Rc<Cell<bool>>,
    }

    impl App {
        fn new(pool: Vec<Country>, config: QuizConfig) -> Self {
            let restart_requested = Rc::new(Cell::new(false));
            let session = mount_session(&pool, &config, &restart_requested);
            Self {
                session,
                pool,
                config,
                timer_serial: 0,
                restart_requested,
            }
        }

        /// Discard the session and build a new one from a fresh seed
        fn remount(&mut self, seed: u64) {
            self.timer_serial += 1;
            self.config = QuizConfig { seed, ..self.config.clone() };
            self.session = mount_session(&self.pool, &self.config, &self.restart_requested);
            log::info!("new session with seed {seed}");
        }
    }

    fn mount_session(
        pool: &[Country],
        config: &QuizConfig,
        restart_requested: &Rc<Cell<bool>>,
    ) -> Session {
        let plan = SessionPlan::build(pool, config.count, config.seed);
        let mut session = Session::new(plan, config.clone());
        let flag = restart_requested.clone();
        session.set_restart_hook(move || flag.set(true));
        session
    }

    pub fn run() {
        console_log::init_with_level(log::Level::Info).expect("logger init");
        console_error_panic_hook::set_once();

        let countries = match load_countries() {
            Ok(c) => c,
            Err(e) => {
                log::error!("embedded dataset failed to parse: {e}");
                return;
            }
        };

        let window = web_sys::window().unwrap();
        let search = window.location().search().unwrap_or_default();
        let params = UrlSearchParams::new_with_str(&search).unwrap();

        let seed = js_sys::Date::now() as u64;
        let (config, pool) = QuizConfig::from_query(|k| params.get(k), &countries, seed);
        log::info!(
            "quiz: {} -> {}, {} questions, seed {}",
            config.question_kind.label(),
            config.choice_kind.label(),
            config.count,
            config.seed
        );

        let app = Rc::new(RefCell::new(App::new(pool, config)));

        build_layout(&document());
        setup_start_button(app.clone());
        setup_restart_button(app.clone());
        prefetch_flags(&app);
        render(&app);
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// Build the static page skeleton the renderer fills in
    fn build_layout(document: &Document) {
        let body = document.body().unwrap();
        for id in [
            "hud", "overlay", "question", "choices", "summary", "start-btn", "restart-btn",
        ] {
            if document.get_element_by_id(id).is_some() {
                continue;
            }
            let tag = if id.ends_with("-btn") { "button" } else { "div" };
            let el = document.create_element(tag).unwrap();
            el.set_id(id);
            let _ = body.append_child(&el);
        }
        set_text("start-btn", "Start");
        set_text("restart-btn", "Play again");
    }

    fn element(id: &str) -> Element {
        document().get_element_by_id(id).unwrap()
    }

    fn set_text(id: &str, text: &str) {
        element(id).set_text_content(Some(text));
    }

    fn show(id: &str, visible: bool) {
        let el = element(id);
        if visible {
            let _ = el.class_list().remove_1("hidden");
        } else {
            let _ = el.class_list().add_1("hidden");
        }
    }

    /// Text or flag markup for one country under a content kind
    fn content_markup(country: &Country, kind: ContentKind) -> String {
        match country.content_text(kind) {
            Some(text) => text.to_string(),
            None => format!("<img src=\"{}\" alt=\"{}\">", flag_url(&country.code), country.code),
        }
    }

    /// Redraw everything from the current session state
    fn render(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        let s = &a.session;

        match s.phase() {
            Phase::NotStarted => {
                show("start-btn", true);
                show("question", false);
                show("choices", false);
                show("summary", true);
                show("restart-btn", false);
                set_text("hud", "Country Quiz");

                let presets: Vec<String> = RULE_PRESETS
                    .iter()
                    .map(|p| format!("{}: {} questions, {}s each", p.label, p.count, p.time_limit))
                    .collect();
                set_text("summary", &presets.join("\n"));
            }
            Phase::Active(index) => {
                show("start-btn", false);
                show("question", true);
                show("choices", true);
                show("summary", false);
                show("restart-btn", false);

                let mut hud = format!("{}/{}", index + 1, s.len());
                if let Some(left) = s.time_left() {
                    hud.push_str(&format!(" | {left}s left"));
                    let timer_urgent = left <= TIME_URGENT_SECS;
                    let hud_el = element("hud");
                    let _ = if timer_urgent {
                        hud_el.class_list().add_1("urgent")
                    } else {
                        hud_el.class_list().remove_1("urgent")
                    };
                }
                set_text("hud", &hud);

                let question = s.current_question().unwrap();
                element("question")
                    .set_inner_html(&content_markup(question, s.config().question_kind));

                render_choices(app, s.current_choices().unwrap(), s.config().choice_kind);
            }
            Phase::Finished => {
                show("start-btn", false);
                show("question", false);
                show("choices", false);
                show("summary", true);
                show("restart-btn", true);

                let (correct, incorrect) = s.score();
                set_text("hud", "Results");
                set_text(
                    "summary",
                    &format!("Correct: {correct}\nIncorrect: {incorrect}"),
                );
            }
        }
    }

    fn render_choices(app: &Rc<RefCell<App>>, choices: &[Country], kind: ContentKind) {
        let container = element("choices");
        container.set_inner_html("");
        let document = document();

        for choice in choices {
            let btn = document.create_element("button").unwrap();
            btn.set_inner_html(&content_markup(choice, kind));

            let app = app.clone();
            let code = choice.code.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let feedback = app.borrow_mut().session.submit_answer(&code);
                if let Some(fb) = feedback {
                    after_transition(&app, fb);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = container.append_child(&btn);
        }
    }

    /// Common path after any answer or timeout: overlay, re-render, timers,
    /// prefetch for the next index
    fn after_transition(app: &Rc<RefCell<App>>, fb: AnswerFeedback) {
        {
            let mut a = app.borrow_mut();
            a.timer_serial += 1;
        }

        show_overlay(app, &fb);
        render(app);
        prefetch_flags(app);
        schedule_tick(app);
    }

    fn show_overlay(app: &Rc<RefCell<App>>, fb: &AnswerFeedback) {
        let kind = app.borrow().session.config().choice_kind;
        let overlay = element("overlay");
        if fb.correct {
            overlay.set_inner_html("Correct!");
            let _ = overlay.class_list().add_1("correct");
            let _ = overlay.class_list().remove_1("incorrect");
        } else {
            overlay.set_inner_html(&format!(
                "Incorrect. Answer: {}",
                content_markup(&fb.answer, kind)
            ));
            let _ = overlay.class_list().add_1("incorrect");
            let _ = overlay.class_list().remove_1("correct");
        }
        show("overlay", true);

        // Auto-dismiss; the token makes this a no-op if another overlay
        // replaced ours in the meantime
        let app = app.clone();
        let token = fb.dismiss;
        let delay = fb.dismiss_after_ms;
        set_timeout(delay, move || {
            if app.borrow_mut().session.dismiss_overlay(token) {
                show("overlay", false);
            }
        });
    }

    /// Drive the per-question countdown, one wakeup per second. Each closure
    /// checks the serial it was scheduled under so a countdown armed for a
    /// question that has since advanced dies silently.
    fn schedule_tick(app: &Rc<RefCell<App>>) {
        let (serial, armed) = {
            let a = app.borrow();
            let armed = matches!(a.session.phase(), Phase::Active(_)) && a.session.time_left().is_some();
            (a.timer_serial, armed)
        };
        if !armed {
            return;
        }

        let app = app.clone();
        set_timeout(TICK_INTERVAL_MS, move || {
            let feedback = {
                let mut a = app.borrow_mut();
                if a.timer_serial != serial {
                    return;
                }
                a.session.tick()
            };
            match feedback {
                Some(fb) => after_transition(&app, fb),
                None => {
                    render(&app);
                    schedule_tick(&app);
                }
            }
        });
    }

    /// Eagerly fetch upcoming flag images to hide CDN latency
    fn prefetch_flags(app: &Rc<RefCell<App>>) {
        let urls: Vec<String> = app
            .borrow()
            .session
            .prefetch_targets()
            .iter()
            .map(|c| flag_url(&c.code))
            .collect();
        for url in urls {
            if let Ok(img) = web_sys::HtmlImageElement::new() {
                img.set_src(&url);
            }
        }
    }

    fn setup_start_button(app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().session.start();
            render(&app);
            prefetch_flags(&app);
            schedule_tick(&app);
        });
        let _ = element("start-btn")
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            {
                let mut a = app.borrow_mut();
                a.session.restart();
                if a.restart_requested.take() {
                    let seed = js_sys::Date::now() as u64;
                    a.remount(seed);
                }
            }
            render(&app);
            prefetch_flags(&app);
        });
        let _ = element("restart-btn")
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_timeout(ms: u32, f: impl FnOnce() + 'static) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(f);
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms as i32,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use country_quiz::config::QuizConfig;
    use country_quiz::country::load_countries;
    use country_quiz::quiz::{Phase, Session, SessionPlan};

    env_logger::init();
    log::info!("Country Quiz (native) starting...");
    log::info!("Native mode is a smoke test - run with `trunk serve` for the web version");

    let countries = load_countries().expect("embedded dataset must parse");
    let (config, pool) = QuizConfig::from_query(|_| None, &countries, 42);

    let plan = SessionPlan::build(&pool, config.count, config.seed);
    let mut session = Session::new(plan, config);
    session.start();

    // Scripted playthrough: always pick the first choice on screen
    while let Phase::Active(index) = session.phase() {
        let question = session.current_question().expect("active question").clone();
        let pick = session.current_choices().expect("active choices")[0].code.clone();
        let feedback = session.submit_answer(&pick).expect("answer accepted");
        println!(
            "Q{} {} -> picked {}: {}",
            index + 1,
            question.name,
            pick,
            if feedback.correct { "correct" } else { "incorrect" },
        );
    }

    let (correct, incorrect) = session.score();
    println!("Final score: {correct} correct, {incorrect} incorrect");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
