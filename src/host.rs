//! Host-facing command surface
//!
//! The embedding host drives the dashboard through a channel of commands:
//! replace a named overlay, retarget a light, move the camera, toggle a
//! helper, dispose. Commands cross the thread boundary over an mpsc pair
//! held in a resource; one Update system drains the queue each frame.
//! Overlay commands are staged in [`PendingOverlays`] for the active
//! variant's spawner to apply.

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use crate::animation::Playback;
use crate::config::{
    AmbientLightOptions, BeamOptions, DashboardOptions, DirectionalLightOptions, FlightOptions,
};
use crate::geodata::{BeamPoint, FlightLine};
use crate::overlay::OverlayRegistry;
use crate::scene::{HelperState, KeyLight, MainCamera, apply_directional_light};

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx) = channel();
        app.insert_resource(HostChannels {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        })
        .init_resource::<PendingOverlays>()
        .add_systems(Startup, queue_startup_overlays)
        .add_systems(Update, (keyboard_shortcuts, drain_host_commands).chain());
    }
}

/// Everything the host can ask of a running dashboard.
#[derive(Debug)]
pub enum DashboardCommand {
    /// Replace the beam overlay registered under `name`; idempotent by name.
    SetBeamOverlay {
        name: String,
        data: Vec<BeamPoint>,
        style: Option<BeamOptions>,
    },
    /// Replace the flight-line overlay registered under `name`.
    SetFlightLines {
        name: String,
        data: Vec<FlightLine>,
        style: Option<FlightOptions>,
    },
    /// Remove both the beam and flight group of a host name.
    ClearOverlay { name: String },
    SetDirectionalLight(DirectionalLightOptions),
    SetAmbientLight(AmbientLightOptions),
    SetCameraPose { position: [f32; 3] },
    SetMapPosition { position: [f32; 3] },
    SetGridHelper(bool),
    SetAxesHelper(bool),
    /// Full teardown: stop the frame loop, despawn dashboard content, exit.
    /// Safe to send more than once.
    Dispose,
}

/// Command channel endpoints. The sender side is cloneable and may be moved
/// to any host thread.
#[derive(Resource)]
pub struct HostChannels {
    pub tx: Sender<DashboardCommand>,
    pub rx: Arc<Mutex<Receiver<DashboardCommand>>>,
}

/// Overlay commands staged for the active variant's spawner, style already
/// resolved against the config defaults.
#[derive(Resource, Default)]
pub struct PendingOverlays {
    pub commands: Vec<OverlayCommand>,
}

pub enum OverlayCommand {
    Beams {
        name: String,
        data: Vec<BeamPoint>,
        style: BeamOptions,
    },
    Flights {
        name: String,
        data: Vec<FlightLine>,
        style: FlightOptions,
    },
    Clear {
        name: String,
    },
}

/// Marker for the variant's root group; map/camera position commands and
/// teardown address it.
#[derive(Component)]
pub struct DashboardRoot;

/// Stage the overlays declared in the config document as if the host had
/// sent them, so startup exercises the same replace path.
fn queue_startup_overlays(options: Res<DashboardOptions>, mut pending: ResMut<PendingOverlays>) {
    for beam in &options.overlays.beams {
        pending.commands.push(OverlayCommand::Beams {
            name: beam.name.clone(),
            data: beam.data.clone(),
            style: options.beam.clone(),
        });
    }
    for flight in &options.overlays.flights {
        pending.commands.push(OverlayCommand::Flights {
            name: flight.name.clone(),
            data: flight.data.clone(),
            style: options.flight.clone(),
        });
    }
}

pub fn drain_host_commands(
    channels: Res<HostChannels>,
    options: Res<DashboardOptions>,
    mut pending: ResMut<PendingOverlays>,
    mut playback: ResMut<Playback>,
    mut registry: ResMut<OverlayRegistry>,
    mut helpers: ResMut<HelperState>,
    mut ambient: ResMut<GlobalAmbientLight>,
    mut commands: Commands,
    mut lights: Query<(&mut DirectionalLight, &mut Transform), With<KeyLight>>,
    mut cameras: Query<&mut PanOrbitCamera, With<MainCamera>>,
    mut roots: Query<
        (Entity, &mut Transform),
        (With<DashboardRoot>, Without<KeyLight>),
    >,
    mut exit: MessageWriter<AppExit>,
) {
    let drained: Vec<DashboardCommand> = {
        let Ok(rx) = channels.rx.lock() else {
            error!("host command receiver poisoned, dropping commands");
            return;
        };
        rx.try_iter().collect()
    };

    for command in drained {
        match command {
            DashboardCommand::SetBeamOverlay { name, data, style } => {
                pending.commands.push(OverlayCommand::Beams {
                    name,
                    data,
                    style: style.unwrap_or_else(|| options.beam.clone()),
                });
            }
            DashboardCommand::SetFlightLines { name, data, style } => {
                pending.commands.push(OverlayCommand::Flights {
                    name,
                    data,
                    style: style.unwrap_or_else(|| options.flight.clone()),
                });
            }
            DashboardCommand::ClearOverlay { name } => {
                pending.commands.push(OverlayCommand::Clear { name });
            }
            DashboardCommand::SetDirectionalLight(option) => {
                for (mut light, mut transform) in lights.iter_mut() {
                    apply_directional_light(&option, &mut light, &mut transform, &mut helpers);
                }
            }
            DashboardCommand::SetAmbientLight(option) => {
                ambient.color = crate::config::parse_color(&option.color, Color::WHITE);
                ambient.brightness = option.intensity * 250.0;
            }
            DashboardCommand::SetCameraPose { position } => {
                let (radius, yaw, pitch) = orbit_angles(Vec3::from_array(position));
                for mut camera in cameras.iter_mut() {
                    camera.target_radius = radius;
                    camera.target_yaw = yaw;
                    camera.target_pitch = pitch;
                }
            }
            DashboardCommand::SetMapPosition { position } => {
                for (_, mut transform) in roots.iter_mut() {
                    transform.translation = Vec3::from_array(position);
                }
            }
            DashboardCommand::SetGridHelper(show) => helpers.grid = show,
            DashboardCommand::SetAxesHelper(show) => helpers.axes = show,
            DashboardCommand::Dispose => {
                dispose(
                    &mut playback,
                    &mut registry,
                    &mut commands,
                    &mut roots,
                    &mut exit,
                );
            }
        }
    }
}

/// Decompose a camera position into pan-orbit radius/yaw/pitch. The
/// `y / length` ratio can round a hair past 1.0, which `asin` turns into
/// NaN; clamp it.
fn orbit_angles(target: Vec3) -> (f32, f32, f32) {
    let radius = target.length();
    let yaw = target.x.atan2(target.z);
    let ratio = (target.y / radius.max(f32::EPSILON)).clamp(-1.0, 1.0);
    (radius, yaw, ratio.asin())
}

/// Teardown. Every release step is individually guarded so a failure is
/// logged and the rest of the teardown still runs; the disposed flag makes
/// a second call a logged no-op.
fn dispose(
    playback: &mut Playback,
    registry: &mut OverlayRegistry,
    commands: &mut Commands,
    roots: &mut Query<(Entity, &mut Transform), (With<DashboardRoot>, Without<KeyLight>)>,
    exit: &mut MessageWriter<AppExit>,
) {
    if !playback.begin_dispose() {
        warn!("dispose called on an already-disposed dashboard, ignoring");
        return;
    }

    for (name, entity) in registry.drain() {
        match commands.get_entity(entity) {
            Ok(mut entity_commands) => entity_commands.despawn(),
            Err(err) => error!("overlay {name:?} already gone during dispose: {err}"),
        }
    }
    for (entity, _) in roots.iter() {
        match commands.get_entity(entity) {
            Ok(mut entity_commands) => entity_commands.despawn(),
            Err(err) => error!("scene root already gone during dispose: {err}"),
        }
    }

    info!("dashboard disposed");
    exit.write(AppExit::Success);
}

/// Developer shortcuts exercising the same command surface as the host:
/// G toggles the grid helper, X the axes helper, Escape disposes.
fn keyboard_shortcuts(
    input: Res<ButtonInput<KeyCode>>,
    helpers: Res<HelperState>,
    channels: Res<HostChannels>,
) {
    let mut send = |command: DashboardCommand| {
        if let Err(err) = channels.tx.send(command) {
            error!("host channel closed: {err}");
        }
    };

    if input.just_pressed(KeyCode::KeyG) {
        send(DashboardCommand::SetGridHelper(!helpers.grid));
    }
    if input.just_pressed(KeyCode::KeyX) {
        send(DashboardCommand::SetAxesHelper(!helpers.axes));
    }
    if input.just_pressed(KeyCode::Escape) {
        send(DashboardCommand::Dispose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_orbit_angles_reference_poses() {
        let (radius, yaw, pitch) = orbit_angles(Vec3::new(0.0, 0.0, 10.0));
        assert!((radius - 10.0).abs() < EPSILON);
        assert!(yaw.abs() < EPSILON);
        assert!(pitch.abs() < EPSILON);

        let (_, yaw, _) = orbit_angles(Vec3::new(10.0, 0.0, 0.0));
        assert!((yaw - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_orbit_pitch_stays_finite_at_the_poles() {
        // Straight up: y / length lands exactly on (or a rounding hair past)
        // 1.0 and must never produce a NaN pitch.
        for scale in [1.0_f32, 0.3, 1e-6, 1e6] {
            let (_, _, pitch) = orbit_angles(Vec3::new(0.0, scale, 0.0));
            assert!(pitch.is_finite());
            assert!((pitch - FRAC_PI_2).abs() < EPSILON);

            let (_, _, pitch) = orbit_angles(Vec3::new(0.0, -scale, 0.0));
            assert!((pitch + FRAC_PI_2).abs() < EPSILON);
        }
    }
}
