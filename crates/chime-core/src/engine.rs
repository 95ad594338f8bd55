//! Countdown engine.
//!
//! The engine is a wall-clock-based state machine. It owns the
//! absolute end instant and derives remaining time from it on every
//! observation -- it never decrements a counter, so missed ticks and
//! suspended processes cannot introduce drift.
//!
//! There are no internal threads: the caller invokes `tick()` on a
//! roughly 1-second cadence. Threshold alerts are edge-triggered and
//! fire exactly once per end-time value.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(store, announcer);
//! engine.initialize();
//! // In a loop:
//! engine.tick(); // Returns threshold events as they are crossed.
//! ```

use std::num::NonZeroU32;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::announce::Announcer;
use crate::clock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::storage::{StateStore, PURPOSE_KEY, RECENT_TIMES_KEY};

/// Ceiling applied to absolute-time countdowns.
pub const HOUR_IN_SECONDS: u64 = 3600;
/// Countdown length at initialization, in minutes.
pub const DEFAULT_MINUTES: u32 = 30;
/// Maximum length of the recent end-times list.
pub const MAX_RECENT_TIMES: usize = 3;
/// Remaining-seconds threshold for the early warning.
pub const WARNING_SECONDS: u64 = 300;
/// Purpose used when nothing is configured or persisted.
pub const DEFAULT_PURPOSE: &str = "timer";

/// Externally observable engine state.
///
/// `remaining_seconds` is re-derived from the end instant at snapshot
/// time; holding on to an old snapshot means holding an old value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub end_time: Option<DateTime<Local>>,
    pub remaining_seconds: u64,
    /// "HH:MM" of the end instant.
    pub end_time_string: String,
    pub is_sound_enabled: bool,
    pub is_completed: bool,
    pub timer_purpose: String,
    /// Most-recently-used first, unique, at most [`MAX_RECENT_TIMES`].
    pub recent_times: Vec<String>,
}

/// Core countdown engine.
///
/// Constructed with injected persistence and announcement
/// capabilities so it can run against fakes in tests.
pub struct CountdownEngine {
    end_time: Option<DateTime<Local>>,
    is_sound_enabled: bool,
    is_completed: bool,
    timer_purpose: String,
    recent_times: Vec<String>,
    /// Remaining seconds as of the previous tick (or the last
    /// end-time mutation). Edge detection compares against this.
    last_remaining: Option<u64>,
    warning_seconds: u64,
    store: Rc<dyn StateStore>,
    announcer: Rc<dyn Announcer>,
}

impl CountdownEngine {
    pub fn new(store: Rc<dyn StateStore>, announcer: Rc<dyn Announcer>) -> Self {
        Self {
            end_time: None,
            is_sound_enabled: true,
            is_completed: false,
            timer_purpose: DEFAULT_PURPOSE.to_string(),
            recent_times: Vec::new(),
            last_remaining: None,
            warning_seconds: WARNING_SECONDS,
            store,
            announcer,
        }
    }

    /// Rebuild an engine from a previously taken snapshot.
    ///
    /// Used by callers that persist the snapshot between process
    /// invocations; remaining time is re-derived, not trusted.
    pub fn restore(
        snapshot: TimerSnapshot,
        store: Rc<dyn StateStore>,
        announcer: Rc<dyn Announcer>,
    ) -> Self {
        let mut engine = Self::new(store, announcer);
        engine.end_time = snapshot.end_time;
        engine.is_sound_enabled = snapshot.is_sound_enabled;
        engine.is_completed = snapshot.is_completed;
        engine.timer_purpose = snapshot.timer_purpose;
        engine.recent_times = snapshot.recent_times;
        engine.recent_times.truncate(MAX_RECENT_TIMES);
        engine.last_remaining = Some(snapshot.remaining_seconds);
        engine
    }

    /// Override the warning threshold (configurable via Config).
    pub fn set_warning_seconds(&mut self, seconds: u64) {
        self.warning_seconds = seconds;
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start a default countdown and restore persisted state.
    ///
    /// Sets the end time to now + [`DEFAULT_MINUTES`] and loads
    /// `recent_times` and `timer_purpose` from the store. Absent or
    /// malformed persisted data falls back to defaults.
    pub fn initialize(&mut self) {
        self.initialize_at(DEFAULT_MINUTES, Local::now());
    }

    /// [`initialize`](Self::initialize) with explicit minutes and clock.
    pub fn initialize_at(&mut self, minutes: u32, now: DateTime<Local>) {
        let seconds = u64::from(minutes) * 60;
        self.end_time = Some(now + Duration::seconds(seconds as i64));
        self.is_completed = false;
        self.last_remaining = Some(seconds);
        self.restore_persisted();
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Count down a fixed number of minutes from now.
    ///
    /// Presets are not subject to the one-hour cap; the durations
    /// offered are bounded by construction.
    pub fn set_preset_duration(&mut self, minutes: NonZeroU32) {
        self.set_preset_duration_at(minutes, Local::now());
    }

    pub fn set_preset_duration_at(&mut self, minutes: NonZeroU32, now: DateTime<Local>) {
        let seconds = u64::from(minutes.get()) * 60;
        self.end_time = Some(now + Duration::seconds(seconds as i64));
        self.is_completed = false;
        self.last_remaining = Some(seconds);
    }

    /// Target an "HH:MM" wall-clock time.
    ///
    /// The effective countdown is clamped to [`HOUR_IN_SECONDS`]; a
    /// requested time further out than an hour yields an end instant
    /// one hour from now. The token joins the recent-times list
    /// either way.
    ///
    /// # Errors
    /// Returns `InvalidTimeToken` for malformed or out-of-range
    /// tokens; the current end time is left untouched.
    pub fn set_end_time_from_token(&mut self, token: &str) -> Result<()> {
        self.set_end_time_from_token_at(token, Local::now())
    }

    pub fn set_end_time_from_token_at(&mut self, token: &str, now: DateTime<Local>) -> Result<()> {
        let resolved = clock::time_of_day_to_instant(token, now)?;
        let raw = clock::seconds_until(resolved, now);
        let capped = raw.min(HOUR_IN_SECONDS);

        self.end_time = Some(now + Duration::seconds(capped as i64));
        self.is_completed = false;
        self.last_remaining = Some(capped);
        self.push_recent(token);
        Ok(())
    }

    /// Flip the sound toggle. No other side effects.
    pub fn toggle_sound(&mut self) {
        self.is_sound_enabled = !self.is_sound_enabled;
    }

    /// Set and persist the timer purpose.
    ///
    /// # Errors
    /// Returns `EmptyPurpose` if the label is blank after trimming;
    /// the previous purpose is kept.
    pub fn set_purpose(&mut self, label: &str) -> Result<()> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyPurpose);
        }
        self.timer_purpose = trimmed.to_string();
        self.best_effort_save(PURPOSE_KEY, trimmed);
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_sound_enabled(&self) -> bool {
        self.is_sound_enabled
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn timer_purpose(&self) -> &str {
        &self.timer_purpose
    }

    pub fn recent_times(&self) -> &[String] {
        &self.recent_times
    }

    /// Remaining whole seconds, derived from the end instant.
    pub fn remaining_seconds_at(&self, now: DateTime<Local>) -> u64 {
        self.end_time
            .map(|end| clock::seconds_until(end, now))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_at(Local::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Local>) -> TimerSnapshot {
        TimerSnapshot {
            end_time: self.end_time,
            remaining_seconds: self.remaining_seconds_at(now),
            end_time_string: clock::instant_to_time_of_day(self.end_time.unwrap_or(now)),
            is_sound_enabled: self.is_sound_enabled,
            is_completed: self.is_completed,
            timer_purpose: self.timer_purpose.clone(),
            recent_times: self.recent_times.clone(),
        }
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Observe elapsed time and speak any threshold alerts.
    ///
    /// Call on a roughly 1-second cadence. Returns the events that
    /// fired; announcements go to the injected announcer only while
    /// sound is enabled.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.tick_at(Local::now());
        if self.is_sound_enabled {
            for event in &events {
                self.announcer.announce(&event.announcement());
            }
        }
        events
    }

    /// Pure transition step: `(state, now) -> events`.
    ///
    /// Edge-triggered on the previous observation, so a tick that
    /// jumps from 302 to 298 still fires the five-minute warning. A
    /// tick that lands straight on zero reports only completion.
    pub fn tick_at(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let current = self.remaining_seconds_at(now);
        let previous = self.last_remaining.unwrap_or(current);
        let mut events = Vec::new();

        if previous > self.warning_seconds && current <= self.warning_seconds && current > 0 {
            events.push(Event::FiveMinuteWarning {
                purpose: self.timer_purpose.clone(),
                at: now,
            });
        }

        if current == 0 && !self.is_completed && self.end_time.is_some() {
            self.is_completed = true;
            events.push(Event::TimerCompleted {
                purpose: self.timer_purpose.clone(),
                at: now,
            });
        }

        self.last_remaining = Some(current);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push_recent(&mut self, token: &str) {
        self.recent_times.retain(|t| t != token);
        self.recent_times.insert(0, token.to_string());
        self.recent_times.truncate(MAX_RECENT_TIMES);
        match serde_json::to_string(&self.recent_times) {
            Ok(json) => self.best_effort_save(RECENT_TIMES_KEY, &json),
            Err(e) => tracing::warn!("failed to serialize recent times: {e}"),
        }
    }

    fn restore_persisted(&mut self) {
        match self.store.load(RECENT_TIMES_KEY) {
            Ok(Some(json)) => {
                self.recent_times = serde_json::from_str::<Vec<String>>(&json).unwrap_or_default();
                self.recent_times.truncate(MAX_RECENT_TIMES);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("failed to load recent times: {e}"),
        }
        match self.store.load(PURPOSE_KEY) {
            Ok(Some(purpose)) if !purpose.trim().is_empty() => {
                self.timer_purpose = purpose.trim().to_string();
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("failed to load timer purpose: {e}"),
        }
    }

    fn best_effort_save(&self, key: &str, value: &str) {
        if let Err(e) = self.store.save(key, value) {
            tracing::warn!("failed to persist {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::RecordingAnnouncer;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    fn engine() -> (CountdownEngine, Rc<MemoryStore>, Rc<RecordingAnnouncer>) {
        let store = Rc::new(MemoryStore::new());
        let announcer = Rc::new(RecordingAnnouncer::new());
        let engine = CountdownEngine::new(store.clone(), announcer.clone());
        (engine, store, announcer)
    }

    fn minutes(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn initialize_sets_default_countdown() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.initialize_at(DEFAULT_MINUTES, now);
        let snap = engine.snapshot_at(now);
        assert_eq!(snap.remaining_seconds, 1800);
        assert!(!snap.is_completed);
        assert_eq!(snap.timer_purpose, "timer");
        assert_eq!(snap.end_time_string, "08:30");
    }

    #[test]
    fn remaining_is_derived_not_decremented() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(10), now);
        // A large gap between observations must not drift.
        let later = now + Duration::seconds(423);
        assert_eq!(engine.snapshot_at(later).remaining_seconds, 600 - 423);
    }

    #[test]
    fn absolute_time_is_capped_at_one_hour() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        // Three hours out; the effective countdown is one hour.
        engine.set_end_time_from_token_at("11:00", now).unwrap();
        let snap = engine.snapshot_at(now);
        assert_eq!(snap.remaining_seconds, 3600);
        assert_eq!(snap.end_time, Some(now + Duration::seconds(3600)));
        assert_eq!(snap.recent_times, vec!["11:00".to_string()]);
    }

    #[test]
    fn preset_is_exempt_from_the_cap() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(60), now);
        assert_eq!(engine.snapshot_at(now).remaining_seconds, 3600);
    }

    #[test]
    fn invalid_token_leaves_state_untouched() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_end_time_from_token_at("09:00", now).unwrap();
        let before = engine.snapshot_at(now);

        assert!(engine.set_end_time_from_token_at("25:99", now).is_err());
        let after = engine.snapshot_at(now);
        assert_eq!(after.end_time, before.end_time);
        assert_eq!(after.recent_times, before.recent_times);
    }

    #[test]
    fn recent_times_dedupe_and_age_out() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        for token in ["09:00", "10:00", "09:00", "11:00", "12:00"] {
            engine.set_end_time_from_token_at(token, now).unwrap();
        }
        assert_eq!(
            engine.recent_times(),
            &["12:00".to_string(), "11:00".to_string(), "09:00".to_string()]
        );
    }

    #[test]
    fn recent_times_are_persisted() {
        let (mut engine, store, _) = engine();
        engine
            .set_end_time_from_token_at("09:00", fixed_now())
            .unwrap();
        let json = store.load(RECENT_TIMES_KEY).unwrap().unwrap();
        assert_eq!(json, r#"["09:00"]"#);
    }

    #[test]
    fn persisted_state_is_restored_on_initialize() {
        let (mut engine, store, _) = engine();
        store
            .save(RECENT_TIMES_KEY, r#"["07:30","08:15"]"#)
            .unwrap();
        store.save(PURPOSE_KEY, "school").unwrap();

        engine.initialize_at(DEFAULT_MINUTES, fixed_now());
        assert_eq!(engine.recent_times(), &["07:30", "08:15"]);
        assert_eq!(engine.timer_purpose(), "school");
    }

    #[test]
    fn malformed_persisted_state_falls_back_to_defaults() {
        let (mut engine, store, _) = engine();
        store.save(RECENT_TIMES_KEY, "not json").unwrap();
        store.save(PURPOSE_KEY, "   ").unwrap();

        engine.initialize_at(DEFAULT_MINUTES, fixed_now());
        assert!(engine.recent_times().is_empty());
        assert_eq!(engine.timer_purpose(), "timer");
    }

    #[test]
    fn blank_purpose_is_rejected() {
        let (mut engine, _, _) = engine();
        engine.set_purpose("school").unwrap();
        assert!(matches!(
            engine.set_purpose("   "),
            Err(CoreError::EmptyPurpose)
        ));
        assert_eq!(engine.timer_purpose(), "school");
    }

    #[test]
    fn purpose_is_trimmed_and_persisted() {
        let (mut engine, store, _) = engine();
        engine.set_purpose("  school  ").unwrap();
        assert_eq!(engine.timer_purpose(), "school");
        assert_eq!(store.load(PURPOSE_KEY).unwrap().as_deref(), Some("school"));
    }

    #[test]
    fn warning_fires_once_on_skip_over() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(60), now);

        // remaining 302: above the threshold, nothing yet.
        assert!(engine.tick_at(now + Duration::seconds(3298)).is_empty());
        // remaining 298: skipped straight past 300, still fires.
        let events = engine.tick_at(now + Duration::seconds(3302));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::FiveMinuteWarning { .. }));
        // Holding below the threshold does not re-fire.
        assert!(engine.tick_at(now + Duration::seconds(3310)).is_empty());
    }

    #[test]
    fn completion_fires_once() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(1), now);

        assert!(engine.tick_at(now + Duration::seconds(30)).is_empty());
        let events = engine.tick_at(now + Duration::seconds(60));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::TimerCompleted { .. }));
        assert!(engine.is_completed());

        // Subsequent ticks at zero stay quiet.
        assert!(engine.tick_at(now + Duration::seconds(61)).is_empty());
        assert!(engine.tick_at(now + Duration::seconds(120)).is_empty());
    }

    #[test]
    fn completion_flag_resets_when_end_time_changes() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(1), now);
        engine.tick_at(now + Duration::seconds(60));
        assert!(engine.is_completed());

        engine.set_preset_duration_at(minutes(5), now + Duration::seconds(70));
        assert!(!engine.is_completed());
        let events = engine.tick_at(now + Duration::seconds(70 + 300));
        assert!(matches!(events[0], Event::TimerCompleted { .. }));
    }

    #[test]
    fn tick_lands_on_zero_reports_only_completion() {
        let (mut engine, _, _) = engine();
        let now = fixed_now();
        engine.set_preset_duration_at(minutes(10), now);
        // One giant gap: 600 -> 0 crosses both thresholds.
        let events = engine.tick_at(now + Duration::seconds(600));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::TimerCompleted { .. }));
    }

    #[test]
    fn announcements_respect_the_sound_toggle() {
        let (mut engine, _, announcer) = engine();
        // End time already behind the real wall clock, so tick()
        // observes zero remaining.
        engine.set_preset_duration_at(minutes(1), Local::now() - Duration::seconds(120));
        engine.toggle_sound();
        assert!(!engine.is_sound_enabled());

        // With sound off the completion still latches but nothing is
        // spoken.
        let events = engine.tick();
        assert_eq!(events.len(), 1);
        assert!(engine.is_completed());
        assert!(announcer.texts().is_empty());
    }

    #[test]
    fn announcer_receives_spoken_text() {
        let (mut engine, _, announcer) = engine();
        engine.set_purpose("school").unwrap();
        // End time already in the past relative to the wall clock
        // used by tick(); completion fires immediately.
        engine.set_preset_duration_at(minutes(1), Local::now() - Duration::seconds(120));
        let events = engine.tick();
        assert_eq!(events.len(), 1);
        assert_eq!(
            announcer.texts(),
            vec!["Time is up! It's time for school!".to_string()]
        );
    }

    #[test]
    fn restore_round_trips_through_snapshot() {
        let (mut engine, store, announcer) = engine();
        let now = fixed_now();
        engine.initialize_at(DEFAULT_MINUTES, now);
        engine.set_purpose("lunch").unwrap();
        engine.set_end_time_from_token_at("08:30", now).unwrap();
        engine.toggle_sound();

        let snap = engine.snapshot_at(now);
        let restored = CountdownEngine::restore(snap.clone(), store, announcer);
        let snap2 = restored.snapshot_at(now);
        assert_eq!(snap2.end_time, snap.end_time);
        assert_eq!(snap2.timer_purpose, "lunch");
        assert_eq!(snap2.recent_times, snap.recent_times);
        assert!(!snap2.is_sound_enabled);
    }
}
