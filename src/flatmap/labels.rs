//! Screen-space region labels
//!
//! Labels are UI text nodes pinned to each region's `center` property. A
//! layout pass projects the anchor through the camera every frame, so the
//! labels track orbiting and map-position commands for free.

use bevy::prelude::*;
use std::path::Path;

use crate::config::{DashboardOptions, parse_color_with_alpha};
use crate::core::projection::MapProjector;
use crate::flatmap::hover::HoveredRegion;
use crate::flatmap::regions::FlatMapRoot;
use crate::scene::MainCamera;

/// One label, anchored at a point in the map group's local space.
#[derive(Component)]
pub struct RegionLabel {
    pub name: String,
    pub anchor: Vec3,
}

pub fn setup_labels(options: Res<DashboardOptions>, mut commands: Commands) {
    if !options.label.show {
        return;
    }
    let Ok(projector) = MapProjector::for_map(&options.map_name) else {
        return;
    };
    let Ok(collection) = crate::geodata::FeatureCollection::load(Path::new(&options.map_data))
    else {
        return;
    };

    let color = parse_color_with_alpha(
        &options.label.color,
        options.label.opacity,
        Color::WHITE,
    );

    for feature in &collection.features {
        let name = feature.properties.name.clone();
        if name.is_empty() {
            continue;
        }
        let Some((lon, lat)) = feature.center() else {
            warn!("label {name:?}: missing or malformed center, omitted");
            continue;
        };
        let mut anchor = projector.project(lon, lat);
        anchor.z = options.area.depth + 0.1;

        commands.spawn((
            Text::new(name.clone()),
            TextFont::from_font_size(options.label.font_size),
            TextColor(color),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            RegionLabel { name, anchor },
        ));
    }
}

/// Pin every label to its projected anchor, hiding labels that fall behind
/// the camera. Hovered regions get the hover label style.
pub fn layout_labels(
    options: Res<DashboardOptions>,
    hovered: Res<HoveredRegion>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    roots: Query<&GlobalTransform, With<FlatMapRoot>>,
    mut labels: Query<(&RegionLabel, &mut Node, &mut Visibility, &mut TextColor)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(root) = roots.single() else {
        return;
    };

    for (label, mut node, mut visibility, mut text_color) in labels.iter_mut() {
        let world = root.transform_point(label.anchor);
        match camera.world_to_viewport(camera_transform, world) {
            Ok(position) => {
                node.left = Val::Px(position.x);
                node.top = Val::Px(position.y);
                *visibility = Visibility::Visible;
            }
            Err(_) => {
                *visibility = Visibility::Hidden;
            }
        }

        let is_hovered = hovered.name.as_deref() == Some(label.name.as_str());
        text_color.0 = if is_hovered {
            parse_color_with_alpha(
                &options.hover.label_color,
                options.hover.label_opacity,
                Color::WHITE,
            )
        } else {
            parse_color_with_alpha(&options.label.color, options.label.opacity, Color::WHITE)
        };
    }
}
