//! Per-frame animation pass
//!
//! One Update pass advances everything that moves between draws: ambient
//! spins on decorative elements, the pulse rule over every live marker, and
//! the flow-texture scroll on flight tubes. The whole pass is gated on the
//! playback resource so teardown can stop it without tearing systems out of
//! the schedule.

use bevy::prelude::*;

use crate::core::pulse::Pulse;

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Playback>().add_systems(
            Update,
            (advance_spins, pulse_waves, scroll_flow_textures).run_if(playback_running),
        );
    }
}

/// Frame-loop state. `running` gates the animation pass; `disposed` makes
/// repeated teardown a no-op.
#[derive(Resource)]
pub struct Playback {
    pub running: bool,
    pub disposed: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            running: true,
            disposed: false,
        }
    }
}

impl Playback {
    /// Enter teardown. Returns `false` when the dashboard is already
    /// disposed, in which case the caller must do nothing.
    pub fn begin_dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.running = false;
        true
    }
}

pub fn playback_running(playback: Res<Playback>) -> bool {
    playback.running
}

/// Constant ambient rotation around +Y, in radians per frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin {
    pub per_frame: f32,
}

/// Pulse step per frame, configured per overlay type.
#[derive(Component, Debug, Clone, Copy)]
pub struct PulseStep(pub f32);

/// Flow-texture scroll speed for flat-map flight tubes.
#[derive(Component, Debug, Clone, Copy)]
pub struct ScrollingTexture {
    pub per_frame: f32,
}

fn advance_spins(mut query: Query<(&Spin, &mut Transform)>) {
    for (spin, mut transform) in query.iter_mut() {
        transform.rotate_y(spin.per_frame);
    }
}

/// Advance every live pulse marker: uniform scale on the transform, opacity
/// written through to the marker's own material.
fn pulse_waves(
    mut query: Query<(
        &mut Pulse,
        &PulseStep,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (mut pulse, step, mut transform, material_handle) in query.iter_mut() {
        let frame = pulse.tick(step.0);
        transform.scale = Vec3::splat(frame.scale);
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color.set_alpha(frame.opacity);
        }
    }
}

fn scroll_flow_textures(
    query: Query<(&ScrollingTexture, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (scroll, material_handle) in query.iter() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.uv_transform.translation.x -= scroll.per_frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_starts_running() {
        let playback = Playback::default();
        assert!(playback.running);
        assert!(!playback.disposed);
    }

    #[test]
    fn test_second_dispose_is_a_noop() {
        let mut playback = Playback::default();
        assert!(playback.begin_dispose());
        assert!(!playback.running);

        // Further calls report already-disposed and change nothing.
        assert!(!playback.begin_dispose());
        assert!(playback.disposed);
        assert!(!playback.running);
    }
}
