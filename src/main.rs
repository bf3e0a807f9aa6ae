//! 3D geo-visualization dashboard: a rotating globe or an extruded flat
//! map, driven entirely by one JSON options document and a host command
//! channel.

use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};
use std::path::PathBuf;

use bevy_panorbit_camera::PanOrbitCameraPlugin;

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod animation;
mod config;
mod core;
mod flatmap;
mod geodata;
mod globe;
mod host;
mod overlay;
mod scene;

use animation::AnimationPlugin;
use config::{DashboardOptions, MapMode};
use flatmap::FlatMapPlugin;
use globe::GlobePlugin;
use host::HostPlugin;
use overlay::OverlayRegistry;
use scene::ScenePlugin;

fn main() -> anyhow::Result<()> {
    let config_path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/dashboard.json".to_string())
        .into();
    let options = DashboardOptions::load(&config_path)?;

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Geo Dashboard".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.add_plugins(PanOrbitCameraPlugin);

    let mode = options.mode;
    app.insert_resource(options)
        .init_resource::<OverlayRegistry>()
        .add_plugins(ScenePlugin)
        .add_plugins(AnimationPlugin)
        .add_plugins(HostPlugin);

    match mode {
        MapMode::Globe => app.add_plugins(GlobePlugin),
        MapMode::Flat => app.add_plugins(FlatMapPlugin),
    };

    app.run();
    Ok(())
}
