//! Named overlay groups
//!
//! Beam and flight overlays are keyed by a host-supplied name. The registry
//! is an explicit name-to-entity map, so replacing an overlay is a map
//! insert plus one despawn of the displaced root entity; there is no
//! string-keyed search of the scene tree.

use bevy::prelude::*;
use std::collections::HashMap;

/// Marker for an overlay group root entity. All of the overlay's meshes are
/// children, so despawning the root tears the group down recursively.
#[derive(Component)]
pub struct OverlayGroup {
    pub name: String,
}

/// Name-to-root-entity map for every live overlay group.
///
/// Invariant: at most one live group per name. `replace` returns the
/// displaced entity, which the caller must despawn.
#[derive(Resource, Default)]
pub struct OverlayRegistry {
    groups: HashMap<String, Entity>,
}

impl OverlayRegistry {
    /// Register `entity` under `name`, returning the previous holder of the
    /// name if there was one.
    pub fn replace(&mut self, name: &str, entity: Entity) -> Option<Entity> {
        self.groups.insert(name.to_string(), entity)
    }

    pub fn remove(&mut self, name: &str) -> Option<Entity> {
        self.groups.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Entity> {
        self.groups.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drain every group for teardown.
    pub fn drain(&mut self) -> Vec<(String, Entity)> {
        self.groups.drain().collect()
    }
}

/// Overlay group names carry a kind prefix so a beam overlay and a flight
/// overlay may share a host-facing name.
pub fn beam_group(name: &str) -> String {
    format!("beam:{name}")
}

pub fn flight_group(name: &str) -> String {
    format!("flight:{name}")
}

/// Replace the group registered under `name` with a freshly spawned root,
/// despawning the displaced group. Returns the new root entity.
pub fn replace_group(
    commands: &mut Commands,
    registry: &mut OverlayRegistry,
    name: &str,
    parent: Entity,
) -> Entity {
    let root = commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            OverlayGroup {
                name: name.to_string(),
            },
            Name::new(name.to_string()),
            ChildOf(parent),
        ))
        .id();
    if let Some(old) = registry.replace(name, root) {
        debug!("overlay {name:?} replaced, despawning previous group");
        commands.entity(old).despawn();
    }
    root
}

/// Remove the group registered under `name`, if any.
pub fn clear_group(commands: &mut Commands, registry: &mut OverlayRegistry, name: &str) {
    if let Some(entity) = registry.remove(name) {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(world: &mut World) -> Entity {
        world.spawn_empty().id()
    }

    #[test]
    fn test_replace_reports_displaced_entity() {
        let mut world = World::new();
        let first = entity(&mut world);
        let second = entity(&mut world);

        let mut registry = OverlayRegistry::default();
        assert!(registry.replace("beam:cities", first).is_none());
        assert_eq!(registry.replace("beam:cities", second), Some(first));
        assert_eq!(registry.get("beam:cities"), Some(second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_one_group_per_name_across_kinds() {
        let mut world = World::new();
        let beam = entity(&mut world);
        let flight = entity(&mut world);

        let mut registry = OverlayRegistry::default();
        registry.replace(&beam_group("cities"), beam);
        registry.replace(&flight_group("cities"), flight);
        // Same host name, different kinds: both live.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_and_drain() {
        let mut world = World::new();
        let a = entity(&mut world);
        let b = entity(&mut world);

        let mut registry = OverlayRegistry::default();
        registry.replace("beam:a", a);
        registry.replace("flight:b", b);

        assert_eq!(registry.remove("beam:a"), Some(a));
        assert_eq!(registry.remove("beam:a"), None);

        let drained = registry.drain();
        assert_eq!(drained.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_group_despawns_previous() {
        let mut world = World::new();
        world.insert_resource(OverlayRegistry::default());
        let parent = world.spawn((Transform::default(), Visibility::default())).id();

        let first = {
            let mut registry = world.remove_resource::<OverlayRegistry>().unwrap();
            let root = {
                let mut commands = world.commands();
                replace_group(&mut commands, &mut registry, "beam:cities", parent)
            };
            world.flush();
            world.insert_resource(registry);
            root
        };
        assert!(world.get_entity(first).is_ok());

        let second = {
            let mut registry = world.remove_resource::<OverlayRegistry>().unwrap();
            let root = {
                let mut commands = world.commands();
                replace_group(&mut commands, &mut registry, "beam:cities", parent)
            };
            world.flush();
            world.insert_resource(registry);
            root
        };

        assert!(world.get_entity(first).is_err(), "old group must despawn");
        assert!(world.get_entity(second).is_ok());
        assert_eq!(
            world.resource::<OverlayRegistry>().get("beam:cities"),
            Some(second)
        );
    }
}
