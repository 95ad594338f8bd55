//! # Chime Core Library
//!
//! Core logic for the Chime countdown widget: count down to a target
//! wall-clock time (or a relative duration), speak alerts at
//! thresholds, remember recently used end times, and derive
//! configuration from a shareable `/{purpose}/{time}` path.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a wall-clock-based state machine; the
//!   caller invokes `tick()` periodically and remaining time is
//!   re-derived from the absolute end instant on every observation
//! - **Storage**: SQLite key-value store for recent times and the
//!   timer purpose, TOML-based configuration
//! - **Announcement port**: a narrow `announce(text)` trait; the real
//!   text-to-speech backend lives outside this crate
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: the timer state machine
//! - [`TimerSnapshot`]: its externally observable state
//! - [`parse_url_time_token`]: shareable-link time tokens
//! - [`Announcer`]: alert output port

pub mod announce;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod storage;
pub mod token;

pub use announce::{Announcer, NullAnnouncer};
pub use engine::{
    CountdownEngine, TimerSnapshot, DEFAULT_MINUTES, DEFAULT_PURPOSE, HOUR_IN_SECONDS,
    MAX_RECENT_TIMES, WARNING_SECONDS,
};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use storage::{Config, Database, MemoryStore, StateStore};
pub use token::{parse_url_time_token, share_path, time_token_for_url};
