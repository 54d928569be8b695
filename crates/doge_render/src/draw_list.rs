//! Registry → ordered list of things to draw

use doge_core::components::{EffectId, GeometryId, RenderLayer, TextureId};
use doge_core::ecs::{BaseRegistry, Entity};
use doge_core::math::{Vec2, Vec3};

/// One entity's draw call, resolved from its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub entity: Entity,
    pub texture: TextureId,
    pub effect: EffectId,
    pub geometry: GeometryId,
    pub layer: RenderLayer,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    /// Tint from the entity's `Color`, if any.
    pub color: Option<Vec3>,
    /// UI elements ignore the camera.
    pub screen_space: bool,
}

/// Collect every visible render request, sorted by layer.
///
/// Entities without a transform are skipped, as are UI elements whose
/// `UiPass` is switched off. Within a layer, registry order is kept.
pub fn build_draw_list(registry: &BaseRegistry) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = registry
        .render_requests
        .iter()
        .filter_map(|(entity, request)| {
            let transform = registry.transforms.try_get(entity)?;
            if registry.ui_passes.try_get(entity).is_some_and(|pass| !pass.display) {
                return None;
            }
            Some(DrawItem {
                entity,
                texture: request.texture,
                effect: request.effect,
                geometry: request.geometry,
                layer: request.layer,
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
                color: registry.colors.try_get(entity).map(|c| c.0),
                screen_space: registry.ui_elements.has(entity),
            })
        })
        .collect();

    items.sort_by_key(|item| item.layer);
    items
}
