//! Component catalogue shared by every scene.
//!
//! Components are plain data. Scene-specific tags (rocks, puppies …) live
//! with the scene that owns them; everything here is either stored in the
//! [`BaseRegistry`](crate::ecs::BaseRegistry) or used by more than one scene.

use glam::{Vec2, Vec3, Vec4};

use crate::ecs::Entity;

/// Position, rotation (radians) and size in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale,
        }
    }

    /// Axis-aligned half extents, ignoring rotation.
    pub fn half_extents(&self) -> Vec2 {
        self.scale.abs() * 0.5
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::splat(10.0))
    }
}

/// World units per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// World units per millisecond squared.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration(pub Vec2);

/// Countdown started when something fatal happened; the owning world ends the
/// scene once it drops below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathTimer {
    pub counter_ms: f32,
}

impl Default for DeathTimer {
    fn default() -> Self {
        Self { counter_ms: 1000.0 }
    }
}

/// Sprite sheet playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAnimation {
    pub rows: u32,
    pub columns: u32,
    pub frame_ms: f32,
    pub elapsed_ms: f32,
    /// Sheet row currently playing.
    pub animation: u32,
    pub frame: u32,
}

impl SpriteAnimation {
    pub fn new(rows: u32, columns: u32, frame_ms: f32) -> Self {
        Self {
            rows,
            columns,
            frame_ms,
            elapsed_ms: 0.0,
            animation: 0,
            frame: 0,
        }
    }

    pub fn advance(&mut self, delta_ms: f32) {
        if self.columns == 0 || self.frame_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += delta_ms;
        while self.elapsed_ms >= self.frame_ms {
            self.elapsed_ms -= self.frame_ms;
            self.frame = (self.frame + 1) % self.columns;
        }
    }

    pub fn play(&mut self, animation: u32) {
        if self.animation != animation {
            self.animation = animation.min(self.rows.saturating_sub(1));
            self.frame = 0;
            self.elapsed_ms = 0.0;
        }
    }
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self::new(1, 1, 100.0)
    }
}

/// Drawn in screen space, unaffected by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiElement;

/// Toggles whether a UI element is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPass {
    pub display: bool,
}

impl Default for UiPass {
    fn default() -> Self {
        Self { display: true }
    }
}

/// Collision event, stored in duplicates mode and drained every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub other: Entity,
}

/// Marks an entity as taking part in collision detection; the hit box is the
/// transform's scale multiplied by `shrink`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shrink: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self { shrink: 1.0 }
    }
}

/// Full-screen post-processing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenState {
    pub screen_brightness: f32,
    pub blur_size: f32,
    pub blur_fullscreen: bool,
    /// Negative means the darkening pass is off.
    pub darken_screen_factor: f32,
    pub blur_partial: bool,
    /// x, y, width, height in normalized screen coordinates.
    pub blur_rect: Vec4,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            screen_brightness: 1.0,
            blur_size: 0.02,
            blur_fullscreen: false,
            darken_screen_factor: -1.0,
            blur_partial: false,
            blur_rect: Vec4::ZERO,
        }
    }
}

/// Marker for debug-only visuals (hit boxes, guide lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugComponent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Default for Color {
    fn default() -> Self {
        Self(Vec3::ONE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub target: Vec2,
    /// Visible world extent.
    pub fov: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        let fov = Vec2::new(1200.0, 675.0);
        Self {
            position: fov * 0.5,
            target: fov * 0.5,
            fov,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    SpaceBackground,
    BoardBackground,
    ShowerBackground,
    ArenaBackground,
    DaycareBackground,
    Doge,
    Dice,
    StartSpace,
    BlueSpace,
    RedSpace,
    Rock,
    Sushi,
    Cat,
    Planet,
    Target,
    Weapon,
    Goal,
    Puppy,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectId {
    #[default]
    Textured,
    /// Flat fill from the entity's [`Color`].
    Colored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryId {
    #[default]
    Sprite,
    DebugLine,
}

/// Draw order; lower layers are drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderLayer {
    Background,
    #[default]
    World,
    Foreground,
    Ui,
}

/// Asks the renderer to draw this entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub texture: TextureId,
    pub effect: EffectId,
    pub geometry: GeometryId,
    pub layer: RenderLayer,
}

impl RenderRequest {
    pub fn sprite(texture: TextureId, layer: RenderLayer) -> Self {
        Self {
            texture,
            effect: EffectId::Textured,
            geometry: GeometryId::Sprite,
            layer,
        }
    }
}

/// Reference into the renderer's mesh table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef(pub GeometryId);

/// A board/mini-game participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub player_id: usize,
    pub points: i32,
    /// 1-based rank among all players, recomputed by the board every tick.
    pub standing: usize,
}

impl Player {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            points: 10,
            standing: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerBoardMovement {
    pub roll_count_left: u32,
    pub current_space: Entity,
    pub target_space: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpaceKind {
    Start,
    #[default]
    Blue,
    Red,
}

/// A tile of the board ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Space {
    pub kind: SpaceKind,
    pub next_space: Option<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_animation_wraps_frames() {
        let mut animation = SpriteAnimation::new(2, 4, 100.0);
        animation.advance(250.0);
        assert_eq!(animation.frame, 2);
        animation.advance(150.0);
        assert_eq!(animation.frame, 0);

        animation.play(5);
        assert_eq!(animation.animation, 1);
        assert_eq!(animation.frame, 0);
    }

    #[test]
    fn test_defaults_match_engine_conventions() {
        assert_eq!(Transform::default().scale, Vec2::splat(10.0));
        assert_eq!(DeathTimer::default().counter_ms, 1000.0);
        assert!(UiPass::default().display);
        assert!(ScreenState::default().darken_screen_factor < 0.0);
    }
}
