//! Audio intent
//!
//! The simulation only raises [`GameEvent`]s. This module maps them to sound
//! effects and hands them to whatever backend the host provides. Playback is
//! fire-and-forget: a backend must queue and return, never block the tick.
//!
//! Background music loops while a run is in progress. It starts when a run
//! begins and stops on game over or victory.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player takes contact damage
    PlayerHit,
    /// Enemy hit but still standing
    EnemyHit,
    /// Enemy killed (it respawns elsewhere)
    EnemyDeath,
    /// Boss enters the world
    BossRoar,
    /// Boss hit
    BossHit,
    /// Boss killed
    BossDeath,
    /// Player died
    GameOver,
    /// Run won
    Victory,
}

impl SoundEffect {
    /// One-shot effect for an event; `None` for events that only steer music
    pub fn for_event(event: GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::RunStarted => return None,
            GameEvent::PlayerHit => SoundEffect::PlayerHit,
            GameEvent::EnemyHit => SoundEffect::EnemyHit,
            GameEvent::EnemyDeath => SoundEffect::EnemyDeath,
            GameEvent::BossSpawned => SoundEffect::BossRoar,
            GameEvent::BossHit => SoundEffect::BossHit,
            GameEvent::BossDeath => SoundEffect::BossDeath,
            GameEvent::GameOver => SoundEffect::GameOver,
            GameEvent::Victory => SoundEffect::Victory,
        };
        Some(effect)
    }

    /// Asset name a file-based backend would load
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::PlayerHit => "player_hit",
            SoundEffect::EnemyHit => "enemy_hit",
            SoundEffect::EnemyDeath => "enemy_death",
            SoundEffect::BossRoar => "boss_roar",
            SoundEffect::BossHit => "enemy_hit",
            SoundEffect::BossDeath => "enemy_death",
            SoundEffect::GameOver => "game_over",
            SoundEffect::Victory => "victory",
        }
    }
}

/// Host-provided playback
pub trait AudioBackend {
    /// Start an effect at the given volume (0.0 - 1.0) and return immediately
    fn trigger(&mut self, effect: SoundEffect, volume: f32);

    /// Loop the background track from the beginning
    fn start_music(&mut self, volume: f32);

    fn stop_music(&mut self);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn trigger(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} (vol {:.2})", effect.asset_name(), volume);
    }

    fn start_music(&mut self, volume: f32) {
        log::debug!("music start (vol {:.2})", volume);
    }

    fn stop_music(&mut self) {
        log::debug!("music stop");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// A run is in progress, so the track should be looping
    music_on: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
            music_on: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0); takes effect when the track next starts
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if !self.music_on {
            return;
        }
        if muted {
            if let Some(backend) = self.backend.as_mut() {
                backend.stop_music();
            }
        } else {
            self.resume_music();
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_on && !self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn resume_music(&mut self) {
        let vol = if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        };
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.start_music(vol);
        }
    }

    /// Start the background loop from the top
    pub fn start_music(&mut self) {
        self.music_on = true;
        self.resume_music();
    }

    pub fn stop_music(&mut self) {
        if !self.music_on {
            return;
        }
        self.music_on = false;
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_music();
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.trigger(effect, vol);
    }

    /// Play the effect for a simulation event and steer the music
    pub fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::RunStarted => self.start_music(),
            GameEvent::GameOver | GameEvent::Victory => self.stop_music(),
            _ => {}
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
