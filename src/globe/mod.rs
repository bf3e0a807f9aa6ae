//! Spherical-globe dashboard variant
//!
//! Builds the rotating globe group (body, cloud layer, halo, borders), the
//! starfield shell, and applies host overlay commands by spawning beam and
//! flight groups as children of the globe so they rotate with it.

use bevy::prelude::*;

use crate::config::DashboardOptions;
use crate::host::{OverlayCommand, PendingOverlays, drain_host_commands};
use crate::overlay::{OverlayRegistry, beam_group, clear_group, flight_group, replace_group};

pub mod beams;
pub mod body;
pub mod borders;
pub mod flights;
pub mod stars;

pub use body::GlobeRoot;

pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(bevy::pbr::wireframe::WireframePlugin::default())
            .add_systems(
                Startup,
                (body::setup_globe, stars::setup_starfield, borders::setup_borders).chain(),
            )
            .add_systems(
                Update,
                (
                    apply_overlay_commands.after(drain_host_commands),
                    body::billboard_aperture,
                    borders::draw_border_lines,
                    flights::draw_flight_arcs,
                ),
            );
    }
}

/// Spawn staged overlay commands under the globe root.
fn apply_overlay_commands(
    mut pending: ResMut<PendingOverlays>,
    mut registry: ResMut<OverlayRegistry>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    options: Res<DashboardOptions>,
    roots: Query<Entity, With<GlobeRoot>>,
) {
    if pending.commands.is_empty() {
        return;
    }
    let Ok(root) = roots.single() else {
        return;
    };

    for command in pending.commands.drain(..) {
        match command {
            OverlayCommand::Beams { name, data, style } => {
                let group = replace_group(
                    &mut commands,
                    &mut registry,
                    &beam_group(&name),
                    root,
                );
                beams::spawn_beams(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &options,
                    &style,
                    &data,
                    group,
                );
                info!("beam overlay {name:?}: {} markers", data.len());
            }
            OverlayCommand::Flights { name, data, style } => {
                let group = replace_group(
                    &mut commands,
                    &mut registry,
                    &flight_group(&name),
                    root,
                );
                flights::spawn_flights(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &options,
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
