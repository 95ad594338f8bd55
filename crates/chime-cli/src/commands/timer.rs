use std::num::NonZeroU32;
use std::rc::Rc;

use clap::Subcommand;

use chime_core::{Config, Database, NullAnnouncer};
use chrono::Local;

use super::{load_engine, save_engine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Target a wall-clock end time ("HH:MM" or a URL token like "730")
    Set {
        /// End time, e.g. "07:30", "730", "1430", "8"
        time: String,
    },
    /// Count down a fixed number of minutes from now
    Preset {
        minutes: NonZeroU32,
    },
    /// Set the timer purpose label
    Purpose {
        label: String,
    },
    /// Toggle voice alerts on/off
    Sound,
    /// List recently used end times
    Recent,
    /// Restart with the default countdown
    Reset,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Rc::new(Database::open()?);
    let announcer = Rc::new(NullAnnouncer);
    let mut engine = load_engine(db.clone(), announcer, &config);

    match action {
        TimerAction::Status => {
            let snapshot = engine.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::Set { time } => {
            // Accept URL tokens as well as literal HH:MM.
            let token = if time.contains(':') {
                time.clone()
            } else {
                chime_core::parse_url_time_token(&time)
                    .ok_or_else(|| format!("unrecognized time '{time}'"))?
            };
            engine.set_end_time_from_token(&token)?;
            save_engine(&db, &engine)?;
            let snapshot = engine.snapshot();
            // The effective countdown may be shorter than the literal
            // requested time because of the one-hour cap.
            println!(
                "requested {}, counting down {} ({})",
                token,
                chime_core::clock::format_duration(snapshot.remaining_seconds),
                snapshot.timer_purpose,
            );
        }
        TimerAction::Preset { minutes } => {
            engine.set_preset_duration(minutes);
            save_engine(&db, &engine)?;
            println!("counting down {minutes} minutes");
        }
        TimerAction::Purpose { label } => {
            engine.set_purpose(&label)?;
            save_engine(&db, &engine)?;
            println!("purpose set to '{}'", engine.timer_purpose());
        }
        TimerAction::Sound => {
            engine.toggle_sound();
            save_engine(&db, &engine)?;
            let state = if engine.is_sound_enabled() { "on" } else { "off" };
            println!("sound {state}");
        }
        TimerAction::Recent => {
            for time in engine.recent_times() {
                println!("{time}");
            }
        }
        TimerAction::Reset => {
            engine.initialize_at(config.timer.default_minutes, Local::now());
            save_engine(&db, &engine)?;
            println!("reset to {} minutes", config.timer.default_minutes);
        }
    }

    Ok(())
}
