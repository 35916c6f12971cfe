pub mod game;
pub mod sinks;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::Function;

pub use game::{
    build_deck, Card, CardFace, CardId, ConfigError, Deck, DeckError, GameConfig, GameController,
    GameEvent, GameOutcome, GamePhase, IntegrityError, Language, LossReason, RuleEngine, RuleError,
    ScheduledTask, Session, SessionId, SessionSnapshot, SetupError, Sinks, TaskKind, Vocabulary,
    VocabularyError, WordPair,
};
pub use sinks::{
    AnalyticsEvent, AnalyticsSink, JsAnalyticsSink, JsSoundSink, LogSink, NoopSink,
    RecordingSink, SinkError, SoundEffect, SoundSink,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn busy_error() -> JsValue {
    JsValue::from_str("game engine is busy")
}

struct Shared {
    controller: RefCell<GameController>,
    on_change: Option<Function>,
}

/// Calls the page's render callback with a fresh snapshot.
fn notify(shared: &Shared) {
    let Some(callback) = &shared.on_change else {
        return;
    };
    let snapshot = match shared.controller.try_borrow() {
        Ok(controller) => controller.snapshot(),
        Err(_) => return,
    };
    match to_value(&snapshot) {
        Ok(value) => {
            if let Err(error) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("onChange callback failed: {error:?}");
            }
        }
        Err(error) => log::warn!("could not encode snapshot: {error}"),
    }
}

/// Runs each task on a browser timer. The timer only holds a weak handle, so
/// a dropped game never wakes up again.
fn schedule(shared: &Rc<Shared>, tasks: Vec<ScheduledTask>) {
    for task in tasks {
        let weak = Rc::downgrade(shared);
        spawn_local(async move {
            TimeoutFuture::new(task.delay_ms).await;
            if let Some(shared) = weak.upgrade() {
                run_task(&shared, task);
            }
        });
    }
}

fn run_task(shared: &Rc<Shared>, task: ScheduledTask) {
    let (events, follow_up) = match shared.controller.try_borrow_mut() {
        Ok(mut controller) => {
            let events = controller.fire(task);
            (events, controller.drain_tasks())
        }
        Err(_) => {
            log::warn!("controller busy, dropping {:?}", task.kind);
            return;
        }
    };
    if !events.is_empty() {
        notify(shared);
    }
    schedule(shared, follow_up);
}

/// Browser-facing handle to one game board.
#[wasm_bindgen]
pub struct MemoryGame {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl MemoryGame {
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        vocabulary_json: Option<String>,
        sound_callback: Option<Function>,
        analytics_callback: Option<Function>,
        on_change: Option<Function>,
    ) -> Result<MemoryGame, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(to_js_error)?,
            None => GameConfig::default(),
        };
        let vocabulary = match vocabulary_json {
            Some(json) => Vocabulary::from_json(&json).map_err(to_js_error)?,
            None => Vocabulary::builtin().map_err(to_js_error)?.clone(),
        };

        let sound: Box<dyn SoundSink> = match sound_callback {
            Some(callback) => Box::new(JsSoundSink::new(callback)),
            None => Box::new(LogSink),
        };
        let analytics: Box<dyn AnalyticsSink> = match analytics_callback {
            Some(callback) => Box::new(JsAnalyticsSink::new(callback)),
            None => Box::new(LogSink),
        };

        let mut controller =
            GameController::from_entropy(config, vocabulary, Sinks::new(sound, analytics))
                .map_err(to_js_error)?;
        let tasks = controller.drain_tasks();

        let shared = Rc::new(Shared {
            controller: RefCell::new(controller),
            on_change,
        });
        schedule(&shared, tasks);
        Ok(MemoryGame { shared })
    }

    /// Returns `false` when the flip was rejected.
    #[wasm_bindgen(js_name = "onCardClicked")]
    pub fn on_card_clicked(&self, card_id: u32) -> Result<bool, JsValue> {
        let (accepted, tasks) = {
            let mut controller = self
                .shared
                .controller
                .try_borrow_mut()
                .map_err(|_| busy_error())?;
            let accepted = controller.on_card_clicked(card_id).is_ok();
            (accepted, controller.drain_tasks())
        };
        if accepted {
            notify(&self.shared);
            schedule(&self.shared, tasks);
        }
        Ok(accepted)
    }

    #[wasm_bindgen(js_name = "onRestartRequested")]
    pub fn on_restart_requested(&self) -> Result<(), JsValue> {
        let tasks = {
            let mut controller = self
                .shared
                .controller
                .try_borrow_mut()
                .map_err(|_| busy_error())?;
            controller.on_restart_requested().map_err(to_js_error)?;
            controller.drain_tasks()
        };
        notify(&self.shared);
        schedule(&self.shared, tasks);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let controller = self
            .shared
            .controller
            .try_borrow()
            .map_err(|_| busy_error())?;
        to_value(&controller.snapshot()).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "snapshotJson")]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let controller = self
            .shared
            .controller
            .try_borrow()
            .map_err(|_| busy_error())?;
        serde_json::to_string(&controller.snapshot()).map_err(to_js_error)
    }
}

/// Default rules as JSON, for pages that tweak a field or two.
#[wasm_bindgen(js_name = "defaultConfig")]
pub fn default_config() -> Result<String, JsValue> {
    serde_json::to_string(&GameConfig::default()).map_err(to_js_error)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
