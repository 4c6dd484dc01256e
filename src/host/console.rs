//! Terminal stand-ins for the notification surface, ringtone player and
//! vibration motor.

use crate::core::services::{AlertAction, NotificationService, RingtonePlayer, Vibrator};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use std::path::Path;

pub struct ConsoleNotifier;

impl NotificationService for ConsoleNotifier {
    fn post(&mut self, id: i64, title: &str, body: &str, actions: &[AlertAction]) -> AppResult<()> {
        let actions: Vec<String> = actions
            .iter()
            .map(|a| format!("ralarm {} {}", a.to_string().to_lowercase(), id))
            .collect();
        println!("🔔 [{}] {}: {}", id, title, body);
        println!("   actions: {}", actions.join(" | "));
        Ok(())
    }

    fn cancel(&mut self, _id: i64) -> AppResult<()> {
        Ok(())
    }

    fn show_full_screen(&mut self, _id: i64, title: &str) -> AppResult<()> {
        header(format!("⏰ {}", title.to_uppercase()));
        Ok(())
    }
}

/// Accepts named tones, or file paths (`file:` prefix or absolute) that
/// must exist.
#[derive(Default)]
pub struct ConsolePlayer {
    playing: Option<String>,
}

impl RingtonePlayer for ConsolePlayer {
    fn play(&mut self, sound: &str, looping: bool) -> AppResult<()> {
        let sound = sound.trim();
        if sound.is_empty() {
            return Err(AppError::Device("no sound selected".into()));
        }

        let path = sound.strip_prefix("file:").unwrap_or(sound);
        if (sound.starts_with("file:") || Path::new(path).is_absolute()) && !Path::new(path).exists()
        {
            return Err(AppError::Device(format!("sound file not found: {}", path)));
        }

        info(format!(
            "🎵 Playing '{}'{}",
            sound,
            if looping { " (looping)" } else { "" }
        ));
        self.playing = Some(sound.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sound) = self.playing.take() {
            info(format!("🔇 Stopped '{}'", sound));
        }
    }
}

#[derive(Default)]
pub struct ConsoleVibrator {
    active: bool,
}

impl Vibrator for ConsoleVibrator {
    fn vibrate(&mut self, pattern: &[u64]) -> AppResult<()> {
        info(format!("📳 Vibrating {:?}", pattern));
        self.active = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.active = false;
    }
}
