//! Region hover highlighting

use bevy::picking::events::{Out, Over, Pointer};
use bevy::prelude::*;

use crate::config::{DashboardOptions, parse_color_with_alpha};
use crate::flatmap::regions::RegionPlate;

/// Name of the region plate currently under the pointer, if any. Labels
/// read this to restyle themselves.
#[derive(Resource, Default)]
pub struct HoveredRegion {
    pub name: Option<String>,
}

/// Recolor plates as the pointer moves over and off them. A region's plates
/// share a name, so hovering any ring of a multi-ring region highlights its
/// label.
pub fn track_hover(
    options: Res<DashboardOptions>,
    mut over_events: MessageReader<Pointer<Over>>,
    mut out_events: MessageReader<Pointer<Out>>,
    mut hovered: ResMut<HoveredRegion>,
    plates: Query<(&RegionPlate, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !options.hover.enabled {
        return;
    }

    for event in out_events.read() {
        let Ok((plate, material_handle)) = plates.get(event.entity) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color = plate.base_color;
        }
        if hovered.name.as_deref() == Some(plate.name.as_str()) {
            hovered.name = None;
        }
    }

    for event in over_events.read() {
        let Ok((plate, material_handle)) = plates.get(event.entity) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color = parse_color_with_alpha(
                &options.hover.area_color,
                options.hover.area_opacity,
                Color::srgb(1.0, 0.0, 0.0),
            );
        }
        hovered.name = Some(plate.name.clone());
    }
}
