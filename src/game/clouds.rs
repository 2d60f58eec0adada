//! Parallax clouds
//!
//! Background clouds drift right at their own speed and scroll with the
//! camera scaled by their depth. Positions wrap around the view so a handful
//! of clouds fill an endless sky.

use macroquad::math::Vec2;
use rand::{Rng, RngCore};

/// One drifting cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub position: Vec2,
    /// Which cloud image to draw
    pub image: usize,
    /// Drift per frame (pixels)
    pub speed: f32,
    /// Camera parallax factor (0 = fixed to the screen, 1 = moves with the level)
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.position.x += self.speed;
    }

    /// Top-left on screen, wrapped so the cloud re-enters on the far side
    pub fn screen_position(&self, offset: Vec2, view: Vec2, image_size: Vec2) -> Vec2 {
        let p = self.position - offset * self.depth;
        Vec2::new(
            p.x.rem_euclid(view.x + image_size.x) - image_size.x,
            p.y.rem_euclid(view.y + image_size.y) - image_size.y,
        )
    }
}

/// All clouds, farthest first
#[derive(Debug, Clone, Default)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    /// Scatter `count` clouds using `image_count` different images
    pub fn new(count: usize, image_count: usize, rng: &mut dyn RngCore) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                position: Vec2::new(rng.gen::<f32>() * 99_999.0, rng.gen::<f32>() * 99_999.0),
                image: if image_count > 0 { rng.gen_range(0..image_count) } else { 0 },
                speed: rng.gen::<f32>() * 0.05 + 0.05,
                depth: rng.gen::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}
