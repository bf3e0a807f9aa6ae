//! Background starfield shell

use bevy::prelude::*;
use rand::Rng;

use crate::animation::Spin;
use crate::config::DashboardOptions;
use crate::host::DashboardRoot;

/// How far out the stars scatter, in world units.
const STAR_SHELL: f32 = 300.0;

#[derive(Component)]
pub struct Starfield;

/// Scatter point stars through a cube around the scene. The group spins
/// slowly on its own so the sky drifts independently of the globe.
pub fn setup_starfield(
    options: Res<DashboardOptions>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !options.starrysky.show || options.starrysky.number == 0 {
        return;
    }

    let root = commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            Starfield,
            DashboardRoot,
            Spin { per_frame: 0.0001 },
            Name::new("starrySky"),
        ))
        .id();

    let star = meshes.add(Sphere::new(0.4).mesh().uv(6, 6));
    let mut rng = rand::thread_rng();

    for _ in 0..options.starrysky.number {
        let position = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ) * STAR_SHELL;

        // Cool blue-white range, as in the source palette.
        let hue = rng.gen_range(0.5..0.7) * 360.0;
        let lightness = rng.gen_range(0.55..0.8);
        let color = Color::hsl(hue, 0.55, lightness);

        commands.spawn((
            Mesh3d(star.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear(),
                unlit: true,
                ..default()
            })),
            Transform::from_translation(position),
            ChildOf(root),
        ));
    }
}
