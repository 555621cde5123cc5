//! Builds the drift scene and attaches assets as their loads complete.
//!
//! Everything except the character is created synchronously in
//! [`SceneComposer::initialize`]. The character, its light probe and the
//! water displacement map arrive through an [`AssetRequest`] drained once per
//! frame by [`SceneComposer::poll_assets`].

mod character;
mod lights;
mod particles;
mod terrain;
mod water;

pub use character::{CharacterState, LoadedCharacter};
pub use lights::build_lights;
pub use particles::build_particles;
pub use terrain::build_terrain;
pub use water::build_water;

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use rand::Rng;

use axolotl_engine::effects::EffectChain;
use axolotl_engine::scene::{Fog, LightProbe, Node, NodeId, Scene, Transform};

use crate::animation::CharacterAsset;
use crate::assets::{AssetError, AssetEvent, AssetLoader, AssetRequest, HeightMap};
use crate::config::{DemoConfig, EnvironmentConfig, FogMode};
use crate::driver::DriftLayer;
use crate::noise::NoiseField;
use crate::post::PostProcessingBuilder;

/// Scroll offset of one drift layer relative to its construction transform.
#[derive(Debug, Copy, Clone)]
struct Drift {
    node: NodeId,
    base: Transform,
    offset: Vec3,
}

pub struct SceneComposer {
    config: DemoConfig,
    scene: Scene,
    drift: [Drift; 3],

    request: Option<AssetRequest>,
    pending_character: Option<Result<CharacterAsset, AssetError>>,
    pending_probe: Option<Result<LightProbe, AssetError>>,

    character_state: CharacterState,
    character_group: Option<NodeId>,
    character: Option<LoadedCharacter>,
    water_displaced: bool,
}

impl SceneComposer {
    pub fn initialize(config: &DemoConfig, loader: Arc<dyn AssetLoader>) -> Self {
        Self::initialize_with_rng(config, loader, &mut rand::thread_rng())
    }

    /// Same as [`initialize`](Self::initialize) with an explicit random
    /// source for the terrain seed and the particle cloud.
    pub fn initialize_with_rng<R: Rng>(config: &DemoConfig, loader: Arc<dyn AssetLoader>, rng: &mut R) -> Self {
        let mut scene = Scene::new();
        scene.background = config.environment.background;
        scene.fog = Some(scene_fog(&config.environment));

        // ── Ground and water ──────────────────────────────────────────────
        let noise = NoiseField::from_rng(rng);
        let seed_offset = rng.gen_range(0.0..100.0);
        let terrain = build_terrain(&noise, &config.terrain, seed_offset);
        let sand = scene.add(terrain::terrain_node(terrain, &config.terrain));

        let water = scene.add(water::water_node(build_water(&config.water, None), &config.water));

        // ── Particles ─────────────────────────────────────────────────────
        let cloud = build_particles(&config.particles, rng);
        let particles = scene.add(particles::particles_node(cloud, &config.particles));

        // ── Lights ────────────────────────────────────────────────────────
        for light in build_lights(&config.lighting) {
            scene.add(light);
        }

        let drift_of = |scene: &Scene, node: NodeId| Drift {
            node,
            base: scene.get(node).map(|n| n.transform).unwrap_or_default(),
            offset: Vec3::ZERO,
        };
        // Indexed by `DriftLayer::index`.
        let drift = [drift_of(&scene, water), drift_of(&scene, sand), drift_of(&scene, particles)];

        log::info!(
            "scene built: {} nodes, terrain seed {} (offset {seed_offset:.2})",
            scene.len(),
            noise.seed()
        );

        Self {
            config: config.clone(),
            scene,
            drift,
            request: Some(AssetRequest::spawn(loader, config.assets.clone())),
            pending_character: None,
            pending_probe: None,
            character_state: CharacterState::Pending,
            character_group: None,
            character: None,
            water_displaced: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn character_state(&self) -> &CharacterState {
        &self.character_state
    }

    /// The `character` group node, once the model (or its placeholder) is in.
    pub fn character_node(&self) -> Option<NodeId> {
        self.character_group
    }

    pub fn character(&self) -> Option<&LoadedCharacter> {
        self.character.as_ref()
    }

    pub(crate) fn character_parts_mut(&mut self) -> Option<(&mut Scene, &mut LoadedCharacter)> {
        let character = self.character.as_mut()?;
        Some((&mut self.scene, character))
    }

    pub fn is_water_displaced(&self) -> bool {
        self.water_displaced
    }

    pub fn sun_position(&self) -> Vec3 {
        self.config.lighting.sun_position
    }

    pub fn layer_node(&self, layer: DriftLayer) -> NodeId {
        self.drift[layer.index()].node
    }

    /// Accumulated scroll of `layer` in its node's local frame.
    pub fn drift_offset(&self, layer: DriftLayer) -> Vec3 {
        self.drift[layer.index()].offset
    }

    // ── Drift ─────────────────────────────────────────────────────────────

    /// Moves `layer` by `delta` in its parent frame; rotation is untouched.
    pub fn apply_drift(&mut self, layer: DriftLayer, delta: Vec3) {
        let drift = &mut self.drift[layer.index()];
        drift.offset += delta;
        if let Some(node) = self.scene.get_mut(drift.node) {
            node.transform.translation = drift.base.translation + drift.offset;
        }
    }

    /// Restores every layer to its construction transform exactly.
    pub fn reset_drift(&mut self) {
        for drift in &mut self.drift {
            drift.offset = Vec3::ZERO;
            if let Some(node) = self.scene.get_mut(drift.node) {
                node.transform = drift.base;
            }
        }
    }

    // ── Post-processing ───────────────────────────────────────────────────

    /// Appends Render, Glitch, Bloom and GodRays to `chain`, in that order.
    pub fn add_post_processing(&self, chain: &mut EffectChain) {
        PostProcessingBuilder::register(&self.config, self.sun_position(), chain);
    }

    // ── Assets ────────────────────────────────────────────────────────────

    /// Applies every completed asset load. Returns `true` if anything changed.
    pub fn poll_assets(&mut self) -> bool {
        let Some(request) = self.request.as_mut() else { return false };
        let events = request.poll();
        if request.is_done() {
            self.request = None;
        }

        let changed = !events.is_empty();
        for event in events {
            self.apply_asset_event(event);
        }
        changed
    }

    /// Blocks until every asset has reported or `timeout` passes. Returns
    /// whether all loads finished.
    pub fn wait_for_assets(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.request.as_ref().map(AssetRequest::is_done) {
                None => return true,
                Some(true) => {
                    self.request = None;
                    return true;
                }
                Some(false) => {}
            }

            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            if let Some(event) = self.request.as_mut().and_then(|r| r.wait_timeout(left)) {
                self.apply_asset_event(event);
            }
        }
    }

    fn apply_asset_event(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::Character(result) => {
                self.pending_character = Some(result);
                self.try_attach_character();
            }
            AssetEvent::LightProbe(result) => {
                self.pending_probe = Some(result);
                self.try_attach_character();
            }
            AssetEvent::Displacement(Ok(map)) => self.displace_water(&map),
            AssetEvent::Displacement(Err(err)) => {
                log::warn!("water displacement unavailable, water stays flat: {err}");
            }
        }
    }

    /// Attaches the character once both it and its probe have reported.
    fn try_attach_character(&mut self) {
        if self.pending_character.is_none() || self.pending_probe.is_none() {
            return;
        }
        let (Some(character), Some(probe)) = (self.pending_character.take(), self.pending_probe.take()) else {
            return;
        };

        let probe = match probe {
            Ok(probe) => Some(probe),
            Err(err) => {
                log::warn!("light probe unavailable, character is lit without it: {err}");
                None
            }
        };

        match character {
            Ok(asset) => {
                let loaded = character::attach_character(&mut self.scene, asset, probe, &self.config.character);
                log::info!(
                    "character attached: {} meshes, clip {:?}",
                    loaded.mesh_nodes.len(),
                    loaded.mixer.current_clip()
                );
                self.character_group = Some(loaded.group);
                self.character = Some(loaded);
                self.character_state = CharacterState::Loaded;
            }
            Err(err) => {
                log::error!("character failed to load: {err}");
                let group = character::attach_placeholder(&mut self.scene, probe, &self.config.character);
                self.character_group = Some(group);
                self.character_state = CharacterState::Failed(err.to_string());
            }
        }
    }

    fn displace_water(&mut self, map: &HeightMap) {
        if self.water_displaced {
            return;
        }
        let id = self.layer_node(DriftLayer::Water);
        let displaced = build_water(&self.config.water, Some(map));
        if let Some(mesh) = self.scene.get_mut(id).and_then(Node::mesh_data_mut) {
            // In place, so the revision keeps increasing and the renderer re-uploads.
            mesh.positions = displaced.positions;
            mesh.normals = displaced.normals;
            mesh.mark_changed();
            self.water_displaced = true;
            log::info!("water displaced by a {}x{} map", map.width(), map.height());
        }
    }
}

fn scene_fog(env: &EnvironmentConfig) -> Fog {
    match env.fog {
        FogMode::Linear { near, far } => Fog::Linear {
            color: env.fog_color,
            near,
            far,
        },
        FogMode::Exponential { density } => Fog::Exponential {
            color: env.fog_color,
            density,
        },
    }
}
