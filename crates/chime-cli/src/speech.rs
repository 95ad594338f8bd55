//! Platform speech backend.
//!
//! Implements the core `Announcer` port by spawning the first
//! available speech command (`say` on macOS, `espeak` or `spd-say`
//! elsewhere). Falls back to printing the text when no backend is
//! installed. Failures are swallowed: announcements are
//! fire-and-forget and must never disturb the tick loop.

use std::process::{Command, Stdio};

use chime_core::storage::SpeechConfig;
use chime_core::Announcer;

pub struct SpeechAnnouncer {
    rate: f32,
    pitch: f32,
}

impl SpeechAnnouncer {
    pub fn from_config(speech: &SpeechConfig) -> Self {
        Self {
            rate: speech.rate,
            pitch: speech.pitch,
        }
    }
}

impl Announcer for SpeechAnnouncer {
    fn announce(&self, text: &str) {
        for mut cmd in self.candidates(text) {
            if cmd.stdout(Stdio::null()).stderr(Stdio::null()).spawn().is_ok() {
                return;
            }
        }
        println!("\n{text}");
    }
}

impl SpeechAnnouncer {
    /// Candidate speech commands, most preferred first.
    fn candidates(&self, text: &str) -> Vec<Command> {
        // Baselines: `say` and `espeak` default to ~175 words/min,
        // espeak pitch midpoint is 50.
        let wpm = (175.0 * self.rate).round() as i64;
        let espeak_pitch = (50.0 * self.pitch).round().clamp(0.0, 99.0) as i64;

        let mut say = Command::new("say");
        say.args(["-r", &wpm.to_string()]).arg(text);

        let mut espeak = Command::new("espeak");
        espeak
            .args(["-s", &wpm.to_string(), "-p", &espeak_pitch.to_string()])
            .arg(text);

        let mut spd_say = Command::new("spd-say");
        spd_say.arg(text);

        vec![say, espeak, spd_say]
    }
}
