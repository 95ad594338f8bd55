use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use chime_core::clock::format_duration;
use chime_core::{Config, Database, Event};

use super::{load_engine, save_engine};
use crate::speech::SpeechAnnouncer;

/// Run the countdown in the foreground with a 1-second tick loop.
///
/// Prints the remaining time in place and speaks threshold alerts via
/// the platform speech backend. Exits when the countdown completes.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Rc::new(Database::open()?);
    let announcer = Rc::new(SpeechAnnouncer::from_config(&config.speech));
    let mut engine = load_engine(db.clone(), announcer, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let events = engine.tick();
            let snapshot = engine.snapshot();

            print!(
                "\r{} until {} ({})   ",
                format_duration(snapshot.remaining_seconds),
                snapshot.timer_purpose,
                snapshot.end_time_string,
            );
            let _ = std::io::stdout().flush();

            if events
                .iter()
                .any(|e| matches!(e, Event::TimerCompleted { .. }))
            {
                println!("\nTime is up!");
                break;
            }
            // Restored state can already be complete; nothing left to
            // count down.
            if snapshot.is_completed {
                println!();
                break;
            }
        }
    });

    save_engine(&db, &engine)?;
    Ok(())
}
