//! Flat-map dashboard variant
//!
//! Projects a GeoJSON document through a mercator preset into extruded
//! region plates lying in the ground plane, with screen-space labels,
//! hover highlighting, light-column beam markers, and textured flight
//! tubes between coordinates.

use bevy::picking::prelude::*;
use bevy::prelude::*;

use crate::config::DashboardOptions;
use crate::host::{OverlayCommand, PendingOverlays, drain_host_commands};
use crate::overlay::{OverlayRegistry, beam_group, clear_group, flight_group, replace_group};

pub mod beams;
pub mod flights;
pub mod hover;
pub mod labels;
pub mod regions;

pub use regions::FlatMapRoot;

pub struct FlatMapPlugin;

impl Plugin for FlatMapPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MeshPickingPlugin)
            .init_resource::<hover::HoveredRegion>()
            .add_systems(
                Startup,
                (regions::setup_regions, labels::setup_labels).chain(),
            )
            .add_systems(
                Update,
                (
                    apply_overlay_commands.after(drain_host_commands),
                    regions::draw_region_outlines,
                    labels::layout_labels,
                    hover::track_hover,
                ),
            );
    }
}

/// Spawn staged overlay commands under the flat-map root.
fn apply_overlay_commands(
    mut pending: ResMut<PendingOverlays>,
    mut registry: ResMut<OverlayRegistry>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    options: Res<DashboardOptions>,
    roots: Query<Entity, With<FlatMapRoot>>,
) {
    if pending.commands.is_empty() {
        return;
    }
    let Ok(root) = roots.single() else {
        return;
    };
    let Ok(projector) = crate::core::projection::MapProjector::for_map(&options.map_name) else {
        // setup_regions already reported the bad preset.
        pending.commands.clear();
        return;
    };

    for command in pending.commands.drain(..) {
        match command {
            OverlayCommand::Beams { name, data, style } => {
                let group = replace_group(&mut commands, &mut registry, &beam_group(&name), root);
                beams::spawn_beams(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &options,
                    &projector,
                    &style,
                    &data,
                    group,
                );
                info!("beam overlay {name:?}: {} markers", data.len());
            }
            OverlayCommand::Flights { name, data, style } => {
                let group = replace_group(&mut commands, &mut registry, &flight_group(&name), root);
                flights::spawn_flights(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &asset_server,
                    &options,
                    &projector,
                    &style,
                    &data,
                    group,
                );
                info!("flight overlay {name:?}: {} lines", data.len());
            }
            OverlayCommand::Clear { name } => {
                clear_group(&mut commands, &mut registry, &beam_group(&name));
                clear_group(&mut commands, &mut registry, &flight_group(&name));
            }
        }
    }
}
