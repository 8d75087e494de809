//! Load file-backed resources during the loading screen.

use std::collections::VecDeque;

use bevy::{asset::LoadState, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ResourceHandles>();
    app.add_systems(PreUpdate, load_resource_assets);
}

pub trait LoadResource {
    /// Starts loading `path` as an asset of type `T` and inserts a clone of it as a
    /// resource once it and all its dependencies are loaded.
    ///
    /// The asset's loader must already be registered.
    fn load_resource<T: Resource + Asset + Clone>(&mut self, path: &'static str) -> &mut Self;
}

impl LoadResource for App {
    fn load_resource<T: Resource + Asset + Clone>(&mut self, path: &'static str) -> &mut Self {
        let world = self.world_mut();
        let handle: Handle<T> = world.resource::<AssetServer>().load(path);
        let mut handles = world.resource_mut::<ResourceHandles>();
        handles
            .waiting
            .push_back((handle.untyped(), path, |world, handle| {
                let value = world
                    .resource::<Assets<T>>()
                    .get(handle.id().typed::<T>())
                    .cloned();
                if let Some(value) = value {
                    world.insert_resource(value);
                }
            }));
        self
    }
}

/// A function that inserts a loaded resource.
type InsertLoadedResource = fn(&mut World, &UntypedHandle);

#[derive(Resource, Default)]
pub struct ResourceHandles {
    // Use a queue for waiting assets so they can be cycled through and moved to
    // `finished` one at a time.
    waiting: VecDeque<(UntypedHandle, &'static str, InsertLoadedResource)>,
    finished: Vec<UntypedHandle>,
}

impl ResourceHandles {
    /// Returns true if all requested [`Asset`]s have finished loading and are available as [`Resource`]s.
    pub fn is_all_done(&self) -> bool {
        self.waiting.is_empty()
    }
}

/// Moves loaded assets into resources. A resource that fails to load (a malformed
/// course for instance) is fatal: the error is logged and the app exits.
fn load_resource_assets(world: &mut World) {
    let mut failures = Vec::new();
    world.resource_scope(|world, mut resource_handles: Mut<ResourceHandles>| {
        for _ in 0..resource_handles.waiting.len() {
            let Some((handle, path, insert_fn)) = resource_handles.waiting.pop_front() else {
                break;
            };
            let assets = world.resource::<AssetServer>();
            if assets.is_loaded_with_dependencies(&handle) {
                insert_fn(world, &handle);
                resource_handles.finished.push(handle);
            } else if let LoadState::Failed(err) = assets.load_state(&handle) {
                failures.push(format!("{path}: {err}"));
            } else {
                resource_handles.waiting.push_back((handle, path, insert_fn));
            }
        }
    });

    if !failures.is_empty() {
        for failure in &failures {
            error!("Failed to load {failure}");
        }
        world.write_message(AppExit::error());
    }
}
