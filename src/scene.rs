//! Shared scene construction: camera, lights, helper overlays
//!
//! Both variants use the same perspective camera behind the pan-orbit
//! controller, an ambient plus directional light pair, and the toggleable
//! grid/axes helper gizmos. Light and helper state can be retargeted at
//! runtime through host commands.

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use std::f32::consts::FRAC_PI_2;

use crate::config::{
    DashboardOptions, DirectionalLightOptions, parse_color, parse_color_with_alpha,
};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_helpers, setup_camera, setup_lights))
            .add_systems(
                Update,
                (
                    draw_grid_helper,
                    draw_axes_helper,
                    draw_light_helper,
                    track_sun_flare,
                ),
            );
    }
}

/// Marker for the dashboard camera.
#[derive(Component)]
pub struct MainCamera;

/// Marker for the directional key light.
#[derive(Component)]
pub struct KeyLight;

/// Camera-facing glow quad riding the key light.
#[derive(Component)]
pub struct SunFlare;

/// Runtime toggle state for the helper overlays, seeded from config and
/// flipped by host commands.
#[derive(Resource, Default)]
pub struct HelperState {
    pub grid: bool,
    pub axes: bool,
    pub light: bool,
}

fn setup_helpers(
    options: Res<DashboardOptions>,
    mut commands: Commands,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    commands.insert_resource(HelperState {
        grid: options.grid_helper.show,
        axes: options.axes_helper.show,
        light: options.light.directional_light.helper.show,
    });

    // Gizmo line width is global per config group; use the widest border so
    // no configured layer renders thinner than asked.
    let width = options
        .borders
        .iter()
        .map(|layer| layer.line_width)
        .fold(1.5_f32, f32::max);
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = width;
}

fn setup_camera(options: Res<DashboardOptions>, mut commands: Commands) {
    let [x, y, z] = options.camera.position;
    let position = Vec3::new(x, y, z);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 10_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::srgb(0.008, 0.008, 0.14)),
            ..default()
        },
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(
                position
                    .length()
                    .clamp(options.camera.min_distance, options.camera.max_distance),
            ),
            force_update: true,
            ..default()
        },
        MainCamera,
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn setup_lights(
    options: Res<DashboardOptions>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ambient = &options.light.ambient_light;
    commands.insert_resource(GlobalAmbientLight {
        color: parse_color(&ambient.color, Color::WHITE),
        // Config intensity is a 0..1 scale; Bevy's ambient brightness is in
        // lux-like units.
        brightness: ambient.intensity * 250.0,
        ..default()
    });

    let directional = &options.light.directional_light;
    commands.spawn((
        DirectionalLight {
            color: parse_color(&directional.color, Color::WHITE),
            illuminance: directional.intensity * 8_000.0,
            ..default()
        },
        KeyLight,
        Transform::from_xyz(directional.x, directional.y, directional.z)
            .looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let sunshine = &options.sunshine;
    if sunshine.show {
        commands.spawn((
            Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: parse_color_with_alpha(
                    &sunshine.color,
                    sunshine.opacity,
                    Color::srgb(1.0, 1.0, 0.93),
                ),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::from_xyz(directional.x, directional.y, directional.z)
                .with_scale(Vec3::splat(sunshine.size)),
            SunFlare,
            Name::new("sunshineSprite"),
        ));
    }
}

/// Keep the flare quad on the key light and facing the camera.
fn track_sun_flare(
    lights: Query<&Transform, (With<KeyLight>, Without<SunFlare>)>,
    cameras: Query<&Transform, (With<MainCamera>, Without<SunFlare>, Without<KeyLight>)>,
    mut flares: Query<&mut Transform, With<SunFlare>>,
) {
    let Ok(light) = lights.single() else {
        return;
    };
    let Ok(camera) = cameras.single() else {
        return;
    };
    for mut flare in flares.iter_mut() {
        flare.translation = light.translation;
        flare.look_at(camera.translation, Vec3::Y);
    }
}

/// Retarget the key light, used at runtime by the host command handler.
pub fn apply_directional_light(
    option: &DirectionalLightOptions,
    light: &mut DirectionalLight,
    transform: &mut Transform,
    helpers: &mut HelperState,
) {
    light.color = parse_color(&option.color, Color::WHITE);
    light.illuminance = option.intensity * 8_000.0;
    *transform =
        Transform::from_xyz(option.x, option.y, option.z).looking_at(Vec3::ZERO, Vec3::Y);
    helpers.light = option.helper.show;
}

fn draw_grid_helper(
    helpers: Res<HelperState>,
    options: Res<DashboardOptions>,
    mut gizmos: Gizmos,
) {
    if !helpers.grid {
        return;
    }
    let grid = &options.grid_helper;
    let color = parse_color(&grid.color, Color::WHITE).with_alpha(grid.opacity);
    let cells = grid.divisions.max(1);
    gizmos.grid(
        Isometry3d::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        UVec2::splat(cells),
        Vec2::splat(grid.width / cells as f32),
        color,
    );
}

fn draw_axes_helper(helpers: Res<HelperState>, options: Res<DashboardOptions>, mut gizmos: Gizmos) {
    if !helpers.axes {
        return;
    }
    gizmos.axes(Transform::IDENTITY, options.axes_helper.size);
}

/// Sketch the key light's position and aim when the light helper is on.
fn draw_light_helper(
    helpers: Res<HelperState>,
    options: Res<DashboardOptions>,
    lights: Query<&Transform, With<KeyLight>>,
    mut gizmos: Gizmos,
) {
    if !helpers.light {
        return;
    }
    let helper = &options.light.directional_light.helper;
    let color = parse_color(&helper.color, Color::srgb(1.0, 0.0, 1.0));
    for transform in lights.iter() {
        let origin = transform.translation;
        gizmos.line(origin, Vec3::ZERO, color);
        let half = helper.size / 2.0;
        gizmos.cube(
            Transform::from_translation(origin).with_scale(Vec3::splat(half)),
            color,
        );
    }
}
