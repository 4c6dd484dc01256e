//! Owner of the single ringtone/vibration handle of the process.

use crate::core::services::{RingtonePlayer, VIBRATION_PATTERN, Vibrator};
use crate::ui::messages::warning;
use std::fmt;

/// What actually came out of the speaker when an alarm started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    Requested(String),
    Fallback(String),
    Silent,
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playback::Requested(s) => write!(f, "playing '{}'", s),
            Playback::Fallback(s) => write!(f, "playing fallback '{}'", s),
            Playback::Silent => write!(f, "silent"),
        }
    }
}

pub struct SoundManager {
    player: Box<dyn RingtonePlayer>,
    vibrator: Box<dyn Vibrator>,
    default_sound: String,
    owner: Option<i64>,
}

impl SoundManager {
    pub fn new(
        player: Box<dyn RingtonePlayer>,
        vibrator: Box<dyn Vibrator>,
        default_sound: &str,
    ) -> Self {
        Self {
            player,
            vibrator,
            default_sound: default_sound.to_string(),
            owner: None,
        }
    }

    /// Id currently holding the sound resource.
    pub fn owner(&self) -> Option<i64> {
        self.owner
    }

    /// Take over ownership recorded by an earlier process.
    pub fn adopt(&mut self, owner: Option<i64>) {
        self.owner = owner;
    }

    /// Start ringing for `id`. Device faults degrade to the default tone,
    /// then to silence; ownership is taken in every case.
    pub fn start(&mut self, id: i64, sound: &str, vibrate: bool) -> Playback {
        if self.owner.is_some_and(|o| o != id) {
            self.release_devices();
        }
        self.owner = Some(id);

        let playback = match self.player.play(sound, true) {
            Ok(()) => Playback::Requested(sound.to_string()),
            Err(e) => {
                warning(format!("Alarm #{}: cannot play '{}': {}", id, sound, e));
                let fallback = self.default_sound.clone();
                if fallback != sound && self.player.play(&fallback, true).is_ok() {
                    Playback::Fallback(fallback)
                } else {
                    Playback::Silent
                }
            }
        };

        if vibrate && let Err(e) = self.vibrator.vibrate(&VIBRATION_PATTERN) {
            warning(format!("Alarm #{}: vibration unavailable: {}", id, e));
        }

        playback
    }

    /// Stop sound and vibration if `id` owns them. Returns whether it did.
    pub fn stop(&mut self, id: i64) -> bool {
        if self.owner != Some(id) {
            return false;
        }
        self.release_devices();
        self.owner = None;
        true
    }

    fn release_devices(&mut self) {
        self.player.stop();
        self.vibrator.cancel();
    }
}
