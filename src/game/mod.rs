//! Game Module
//!
//! The gameplay core and the loop around it.
//!
//! Key concepts:
//! - MovingBody: position, velocity and tile collision shared by every character
//! - Actor: a body driven by a Behavior (player input or enemy patrol)
//! - Hazard: attacks and projectiles, swept by the session once per frame
//! - Event: sounds and spawned hazards queued during a frame, drained after
//! - Session: owns the level, the actors and the hazards; steps one frame
//!
//! Nothing in here except `renderer` (and `MovingBody::render`) touches the
//! graphics context, so the whole simulation runs headless in tests.

pub mod actor;
pub mod animation;
pub mod body;
pub mod clouds;
pub mod enemy;
pub mod event;
pub mod hazard;
pub mod player;
pub mod renderer;
pub mod session;

// Re-export main types
pub use actor::{Actor, Behavior, StepContext};
pub use animation::{Animation, AnimationClip, AnimationLibrary};
pub use body::{Action, BodyKind, CollisionFlags, MovingBody, PhysicsTuning};
pub use clouds::{Cloud, Clouds};
pub use enemy::{Enemy, EnemyBehavior, EnemyTuning};
pub use event::{DeathCause, DeathEvent, EventQueue, GameEvents, KillEvent, Sfx};
pub use hazard::{Hazard, HazardTuning};
pub use player::{Player, PlayerBehavior, PlayerTuning};
pub use session::{FrameInput, Session, StepOutcome, TRANSITION_FRAMES, VIEW_SIZE};
