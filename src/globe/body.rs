//! Globe body: the sphere itself, the cloud layer, and the halo sprite

use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;

use crate::animation::Spin;
use crate::config::{DashboardOptions, parse_color_with_alpha};
use crate::host::DashboardRoot;
use crate::scene::MainCamera;

/// Marker for the rotating globe group; borders, beams and flight arcs are
/// children so they turn with the body.
#[derive(Component)]
pub struct GlobeRoot;

/// Marker for the cloud sphere, which spins on top of the group rotation.
#[derive(Component)]
pub struct CloudLayer;

/// Camera-facing halo quad behind the globe.
#[derive(Component)]
pub struct ApertureSprite;

pub fn setup_globe(
    options: Res<DashboardOptions>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    let radius = options.globe_radius();
    let earth = &options.earth;

    // Resting yaw faces the textured hemisphere toward the default camera.
    let root = commands
        .spawn((
            Transform::from_rotation(Quat::from_rotation_y(3.6)),
            Visibility::default(),
            GlobeRoot,
            DashboardRoot,
            Spin {
                per_frame: earth.speed * 0.0001,
            },
            Name::new("Earth"),
        ))
        .id();

    let subdivision = earth.subdivision.max(8);
    let sphere = meshes.add(Sphere::new(radius).mesh().uv(subdivision, subdivision));

    let mut material = StandardMaterial {
        base_color: parse_color_with_alpha(&earth.color, earth.opacity, Color::srgb(0.04, 0.18, 0.36)),
        perceptual_roughness: 1.0,
        double_sided: true,
        cull_mode: None,
        ..default()
    };
    if earth.opacity < 1.0 {
        material.alpha_mode = AlphaMode::Blend;
    }
    if earth.texture_show && !earth.texture.is_empty() {
        material.base_color_texture = Some(asset_server.load(earth.texture.clone()));
        material.base_color = Color::WHITE.with_alpha(earth.opacity);
    }

    let mut body = commands.spawn((
        Mesh3d(sphere),
        MeshMaterial3d(materials.add(material)),
        Transform::default(),
        Name::new("EarthBody"),
        ChildOf(root),
    ));
    if earth.wireframe {
        body.insert(Wireframe);
    }

    spawn_cloud_layer(&options, &mut commands, &mut meshes, &mut materials, &asset_server, root);
    spawn_aperture(&options, &mut commands, &mut meshes, &mut materials, radius);
}

fn spawn_cloud_layer(
    options: &DashboardOptions,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    root: Entity,
) {
    let cloud = &options.cloud;
    if !cloud.show {
        return;
    }

    let mut material = StandardMaterial {
        base_color: Color::WHITE.with_alpha(cloud.opacity),
        alpha_mode: AlphaMode::Blend,
        ..default()
    };
    if !cloud.texture.is_empty() {
        material.base_color_texture = Some(asset_server.load(cloud.texture.clone()));
    }

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(options.globe_radius() + 0.1).mesh().uv(100, 100))),
        MeshMaterial3d(materials.add(material)),
        Transform::default(),
        CloudLayer,
        Spin { per_frame: 0.0002 },
        Name::new("CloudCover"),
        ChildOf(root),
    ));
}

fn spawn_aperture(
    options: &DashboardOptions,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    radius: f32,
) {
    let aperture = &options.aperture;
    if !aperture.show {
        return;
    }

    // Halo sits outside the rotating group so camera billboarding does not
    // fight the globe spin.
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: parse_color_with_alpha(
                &aperture.color,
                aperture.opacity,
                Color::srgb(0.3, 0.6, 0.9),
            ),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            depth_bias: -1.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(radius * 3.0)),
        ApertureSprite,
        DashboardRoot,
        Name::new("earthApertureSprite"),
    ));
}

/// Keep the halo quad facing the camera.
pub fn billboard_aperture(
    cameras: Query<&Transform, (With<MainCamera>, Without<ApertureSprite>)>,
    mut sprites: Query<&mut Transform, With<ApertureSprite>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    for mut transform in sprites.iter_mut() {
        transform.look_at(camera.translation, Vec3::Y);
    }
}
