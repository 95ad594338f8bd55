pub mod config;
pub mod share;
pub mod timer;
pub mod watch;

use std::rc::Rc;

use chime_core::announce::Announcer;
use chime_core::{Config, CountdownEngine, Database, TimerSnapshot};
use chrono::Local;

/// kv key holding the last snapshot, so timer state carries across
/// CLI invocations.
pub const STATE_KEY: &str = "timer_state";

/// Rebuild the engine from the persisted snapshot, or start a fresh
/// default countdown when none exists.
pub fn load_engine(
    db: Rc<Database>,
    announcer: Rc<dyn Announcer>,
    config: &Config,
) -> CountdownEngine {
    let mut engine = match db.kv_get(STATE_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerSnapshot>(&json) {
            Ok(snapshot) => CountdownEngine::restore(snapshot, db, announcer),
            Err(_) => fresh_engine(db, announcer, config),
        },
        _ => fresh_engine(db, announcer, config),
    };
    engine.set_warning_seconds(config.timer.warning_seconds);
    engine
}

fn fresh_engine(
    db: Rc<Database>,
    announcer: Rc<dyn Announcer>,
    config: &Config,
) -> CountdownEngine {
    let mut engine = CountdownEngine::new(db, announcer);
    engine.initialize_at(config.timer.default_minutes, Local::now());
    engine
}

/// Persist the engine's snapshot for the next invocation.
pub fn save_engine(db: &Database, engine: &CountdownEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&engine.snapshot())?;
    db.kv_set(STATE_KEY, &json)?;
    Ok(())
}
