//! Actors: a moving body driven by a behavior
//!
//! Player and enemies share all of their physics through `MovingBody`. What
//! differs is how each one picks its movement before the physics step and
//! what bookkeeping it does afterwards; that lives in a `Behavior`.

use macroquad::math::Vec2;
use rand::RngCore;
use crate::world::TileQuery;
use super::body::MovingBody;
use super::event::GameEvents;

/// Everything a behavior may consult or affect during one update
pub struct StepContext<'a> {
    /// Level geometry
    pub tiles: &'a dyn TileQuery,
    /// Random source for decisions (seeded by the session)
    pub rng: &'a mut dyn RngCore,
    /// Position of the body this actor watches, if any (enemies watch the player)
    pub target: Option<Vec2>,
    /// Sounds and spawned hazards go here
    pub events: &'a mut GameEvents,
}

/// Per-character decision making around the shared physics step
pub trait Behavior {
    /// Choose this frame's movement from the external input.
    /// May change the body's facing or raise events.
    fn decide_movement(&mut self, body: &mut MovingBody, input: Vec2, ctx: &mut StepContext) -> Vec2;

    /// Update timers and animation state once physics has run
    fn after_step(&mut self, body: &mut MovingBody, movement: Vec2);
}

/// A body plus the behavior that drives it
#[derive(Debug, Clone)]
pub struct Actor<B> {
    pub body: MovingBody,
    pub behavior: B,
}

impl<B: Behavior> Actor<B> {
    pub fn new(body: MovingBody, behavior: B) -> Self {
        Self { body, behavior }
    }

    /// Run one frame: decide, integrate, then settle state
    pub fn update(&mut self, input: Vec2, ctx: &mut StepContext) {
        let movement = self.behavior.decide_movement(&mut self.body, input, ctx);
        self.body.update(ctx.tiles, movement);
        self.behavior.after_step(&mut self.body, movement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use rand::rngs::mock::StepRng;
    use crate::world::Rect;
    use super::super::animation::AnimationLibrary;
    use super::super::body::{BodyKind, PhysicsTuning};

    struct Empty;

    impl TileQuery for Empty {
        fn physics_rects_around(&self, _position: Vec2, _size: (i32, i32)) -> Vec<Rect> {
            Vec::new()
        }

        fn solid_check(&self, _point: Vec2) -> bool {
            false
        }
    }

    /// Doubles its input and counts steps
    #[derive(Default)]
    struct Doubler {
        steps: u32,
        last: Vec2,
    }

    impl Behavior for Doubler {
        fn decide_movement(&mut self, _body: &mut MovingBody, input: Vec2, _ctx: &mut StepContext) -> Vec2 {
            input * 2.0
        }

        fn after_step(&mut self, _body: &mut MovingBody, movement: Vec2) {
            self.steps += 1;
            self.last = movement;
        }
    }

    #[test]
    fn test_actor_runs_decide_physics_settle() {
        let body = MovingBody::new(
            BodyKind::Enemy,
            Vec2::ZERO,
            (16, 16),
            PhysicsTuning::default(),
            Rc::new(AnimationLibrary::default()),
        );
        let mut actor = Actor::new(body, Doubler::default());
        let mut rng = StepRng::new(0, 0);
        let mut events = GameEvents::new();
        let mut ctx = StepContext { tiles: &Empty, rng: &mut rng, target: None, events: &mut events };

        actor.update(Vec2::new(1.5, 0.0), &mut ctx);

        assert_eq!(actor.body.position.x, 3.0);
        assert_eq!(actor.behavior.steps, 1);
        assert_eq!(actor.behavior.last, Vec2::new(3.0, 0.0));
    }
}
