//! Event System
//!
//! Controllers never reach into shared game state. Anything they cause
//! beyond their own body (a sound, a new hazard) is sent as an event into
//! queues owned by the frame loop, which drains them at fixed points.
//!
//! Example flow:
//! 1. Player attacks → sends an attack hazard and `Sfx::Attack`
//! 2. Session drains `attacks` into its live hazard list
//! 3. Front end drains `sounds` and plays them
//!
//! Each side handles its own concern without knowing about the other.

use macroquad::math::Vec2;
use super::hazard::Hazard;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Check if there are any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events in queue
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sound cues raised by gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Jump,
    Attack,
    Hit,
    Death,
    EnemyAttack,
}

impl Sfx {
    pub const ALL: [Sfx; 5] = [Sfx::Jump, Sfx::Attack, Sfx::Hit, Sfx::Death, Sfx::EnemyAttack];

    /// File stem under `data/sfx/`
    pub fn file_stem(self) -> &'static str {
        match self {
            Sfx::Jump => "jump",
            Sfx::Attack => "attack",
            Sfx::Hit => "hit",
            Sfx::Death => "death",
            Sfx::EnemyAttack => "enemy_attack",
        }
    }

    /// Playback volume (0.0-1.0)
    pub fn volume(self) -> f32 {
        match self {
            Sfx::Attack => 0.1,
            _ => 0.2,
        }
    }
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Airborne for too long
    Fell,
    /// Touched by an enemy projectile
    Shot,
}

/// The player died and the level restarts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    pub cause: DeathCause,
    /// Where the player was
    pub position: Vec2,
}

/// An enemy was destroyed by a player attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillEvent {
    /// Where the attack hit
    pub position: Vec2,
}

/// Container for all game events.
/// Add new event types as fields here.
#[derive(Debug, Default)]
pub struct GameEvents {
    /// Sounds to play this frame
    pub sounds: EventQueue<Sfx>,

    /// Attacks spawned by the player
    pub attacks: EventQueue<Hazard>,

    /// Projectiles spawned by enemies
    pub projectiles: EventQueue<Hazard>,

    /// Player deaths
    pub deaths: EventQueue<DeathEvent>,

    /// Enemies destroyed
    pub kills: EventQueue<KillEvent>,
}

impl GameEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = GameEvents::new();

        events.sounds.send(Sfx::Hit);
        events.attacks.send(Hazard::new(Vec2::ZERO, 1.5));

        assert_eq!(events.sounds.len(), 1);
        assert_eq!(events.attacks.len(), 1);

        let sounds: Vec<Sfx> = events.sounds.drain().collect();
        assert_eq!(sounds, vec![Sfx::Hit]);
        assert!(events.sounds.is_empty());
        assert_eq!(events.attacks.len(), 1);
    }

    #[test]
    fn test_sfx_volumes() {
        assert_eq!(Sfx::Attack.volume(), 0.1);
        assert!(Sfx::ALL.iter().all(|s| s.volume() > 0.0 && !s.file_stem().is_empty()));
    }
}
