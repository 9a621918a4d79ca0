//! Mount/unmount lifecycle for one map instance.
//!
//! The map library sits behind [`MapBackend`]; only the calls issued and
//! their order are modeled here.

use crate::geo::Viewport;
use crate::scene::{FitBounds, IconConfig, MapScene, Overlay, TileLayerConfig};

/// Narrow interface over the map library.
pub trait MapBackend {
    /// Live map instance plus whatever it must keep alive.
    type Handle;

    fn container_exists(&self, container_id: &str) -> bool;

    fn create_map(&mut self, container_id: &str, viewport: &Viewport)
        -> Result<Self::Handle, String>;

    fn add_tile_layer(&mut self, map: &mut Self::Handle, tiles: &TileLayerConfig)
        -> Result<(), String>;

    fn add_overlay(
        &mut self,
        map: &mut Self::Handle,
        overlay: &Overlay,
        icon: &IconConfig,
    ) -> Result<(), String>;

    fn fit_bounds(&mut self, map: &mut Self::Handle, fit: &FitBounds) -> Result<(), String>;

    /// Empty every overlay container so no deferred work touches the map
    /// once it is gone. Always called right before `destroy`.
    fn clear_overlays(&mut self, map: &mut Self::Handle);

    /// Tear down the instance, releasing its DOM bindings and listeners.
    fn destroy(&mut self, map: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Unmounted,
    Mounting,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// A map is already live (or being built) for this slot.
    AlreadyMounted,
    /// The container element is not in the DOM yet.
    ContainerMissing,
}

/// Single-owner slot holding at most one live map.
pub struct MapSlot<B: MapBackend> {
    backend: B,
    container_id: String,
    state: MapState,
    handle: Option<B::Handle>,
}

impl<B: MapBackend> MapSlot<B> {
    pub fn new(backend: B, container_id: impl Into<String>) -> Self {
        MapSlot {
            backend,
            container_id: container_id.into(),
            state: MapState::Unmounted,
            handle: None,
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Guarded initialization. `build_scene` runs only once the guard passes.
    ///
    /// If any backend call fails the partial map is destroyed and the slot
    /// goes back to `Unmounted`.
    pub fn mount<F>(&mut self, build_scene: F) -> Result<MountOutcome, String>
    where
        F: FnOnce() -> MapScene,
    {
        if self.state != MapState::Unmounted {
            tracing::debug!(container = %self.container_id, "Map already initialized, skipping");
            return Ok(MountOutcome::AlreadyMounted);
        }
        if !self.backend.container_exists(&self.container_id) {
            tracing::debug!(container = %self.container_id, "Map container not in DOM yet");
            return Ok(MountOutcome::ContainerMissing);
        }

        self.state = MapState::Mounting;
        let scene = build_scene();

        let mut map = match self.backend.create_map(&self.container_id, &scene.viewport) {
            Ok(map) => map,
            Err(e) => {
                self.state = MapState::Unmounted;
                return Err(e);
            }
        };

        if let Err(e) = self.populate(&mut map, &scene) {
            self.teardown(map);
            self.state = MapState::Unmounted;
            return Err(e);
        }

        self.handle = Some(map);
        self.state = MapState::Ready;
        tracing::info!(
            container = %self.container_id,
            overlays = scene.overlays.len(),
            markers = scene.markers().count(),
            fitted = scene.fit.is_some(),
            "Map mounted"
        );
        Ok(MountOutcome::Mounted)
    }

    fn populate(&mut self, map: &mut B::Handle, scene: &MapScene) -> Result<(), String> {
        self.backend.add_tile_layer(map, &scene.tiles)?;
        for overlay in &scene.overlays {
            self.backend.add_overlay(map, overlay, &scene.icon)?;
        }
        if let Some(fit) = &scene.fit {
            self.backend.fit_bounds(map, fit)?;
        }
        Ok(())
    }

    fn teardown(&mut self, mut map: B::Handle) {
        self.backend.clear_overlays(&mut map);
        self.backend.destroy(map);
    }

    /// Destroy the live map, if any. Returns whether one was destroyed.
    pub fn unmount(&mut self) -> bool {
        self.state = MapState::Unmounted;
        match self.handle.take() {
            Some(map) => {
                self.teardown(map);
                tracing::info!(container = %self.container_id, "Map destroyed");
                true
            }
            None => false,
        }
    }
}

impl<B: MapBackend> Drop for MapSlot<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
