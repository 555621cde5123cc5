use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use axolotl_demo::animation::{
    AnimationClip, Channel, ChannelValues, CharacterAsset, Interpolation, Rig, RigNode, SkinnedPrimitive, Skin,
};
use axolotl_demo::assets::{AssetError, AssetLoader, HeightMap};
use axolotl_demo::composer::{CharacterState, SceneComposer};
use axolotl_demo::config::{DemoConfig, FogMode};
use axolotl_demo::driver::{AnimationDriver, DriftLayer};
use axolotl_demo::glitch::{CameraReset, GlitchCycle};
use axolotl_demo::post::bloom_intensity_at;
use axolotl_engine::effects::{EffectChain, EffectKind};
use axolotl_engine::scene::{Color, Fog, LightProbe, MeshData, NodeKind, PerspectiveCamera, Transform};

const WAIT: Duration = Duration::from_secs(10);

/// One skinned quad on a single joint that swings up by one unit.
fn test_character() -> CharacterAsset {
    let rig = Rig::new(
        vec![
            RigNode {
                name: "root".into(),
                parent: None,
                rest: Transform::IDENTITY,
            },
            RigNode {
                name: "tail".into(),
                parent: Some(0),
                rest: Transform::IDENTITY,
            },
        ],
        vec![Skin {
            joints: vec![1],
            inverse_bind: vec![Mat4::IDENTITY],
        }],
    );

    let mut mesh = MeshData::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z],
        vec![Vec2::ZERO; 4],
        vec![0, 1, 2, 0, 2, 3],
    );
    mesh.compute_vertex_normals();

    let prim = SkinnedPrimitive {
        name: "body".into(),
        node: 0,
        skin: Some(0),
        mesh,
        joints: vec![[0, 0, 0, 0]; 4],
        weights: vec![[1.0, 0.0, 0.0, 0.0]; 4],
        color: Color::rgb(0.9, 0.5, 0.6),
        opacity: 1.0,
        double_sided: false,
    };

    let swim = AnimationClip::new(
        "swim",
        vec![Channel {
            node: 1,
            interpolation: Interpolation::Linear,
            times: vec![0.0, 1.0],
            values: ChannelValues::Translation(vec![Vec3::ZERO, Vec3::Y]),
        }],
    );

    CharacterAsset {
        rig,
        primitives: vec![prim],
        clips: vec![swim],
    }
}

/// Resolves every asset immediately from memory.
struct MockLoader {
    fail_character: bool,
}

impl AssetLoader for MockLoader {
    fn load_character(&self, _: &Path) -> Result<CharacterAsset, AssetError> {
        if self.fail_character {
            Err(AssetError::Format("corrupt model".into()))
        } else {
            Ok(test_character())
        }
    }

    fn load_light_probe(&self, _: &Path) -> Result<LightProbe, AssetError> {
        Ok(LightProbe {
            sky: Color::rgb(0.4, 0.6, 0.8),
            ground: Color::rgb(0.2, 0.15, 0.1),
        })
    }

    fn load_displacement(&self, _: &Path) -> Result<HeightMap, AssetError> {
        HeightMap::new(2, 2, vec![0.0, 1.0, 1.0, 0.0])
    }
}

fn composed(fail_character: bool) -> SceneComposer {
    let loader = Arc::new(MockLoader { fail_character });
    let mut composer = SceneComposer::initialize_with_rng(&DemoConfig::default(), loader, &mut StdRng::seed_from_u64(1));
    assert!(composer.wait_for_assets(WAIT), "assets did not arrive");
    composer
}

fn count_named(composer: &SceneComposer, name: &str) -> usize {
    composer.scene().iter().filter(|(_, n)| n.name == name).count()
}

#[test]
fn mock_loader_yields_the_full_scene() {
    let composer = composed(false);
    let scene = composer.scene();

    assert_eq!(composer.character_state(), &CharacterState::Loaded);
    assert_eq!(count_named(&composer, "character"), 1);
    assert_eq!(count_named(&composer, "terrain"), 1);
    assert_eq!(count_named(&composer, "water"), 1);

    let clouds = scene.iter().filter(|(_, n)| matches!(n.kind, NodeKind::Points { .. })).count();
    assert_eq!(clouds, 1);
    assert_eq!(scene.lights().count(), 2);
    assert_eq!(scene.lights().filter(|(_, l)| l.casts_shadow()).count(), 1);

    let character = composer.character().expect("character attached");
    assert_eq!(character.mixer.current_clip(), Some(0));
    let body = scene.get(character.mesh_nodes[0]).expect("body node");
    assert_eq!(body.parent, composer.character_node());
    match &body.kind {
        NodeKind::Mesh { material, .. } => assert!(material.probe.is_some()),
        other => panic!("character body is {other:?}"),
    }

    assert!(composer.is_water_displaced());

    let env = DemoConfig::default().environment;
    assert_eq!(scene.background, env.background);
    match (env.fog, scene.fog) {
        (FogMode::Exponential { density }, Some(Fog::Exponential { color, density: d })) => {
            assert_eq!(color, env.fog_color);
            assert_eq!(d, density);
        }
        (mode, fog) => panic!("fog {fog:?} does not match {mode:?}"),
    }

    let mut chain = EffectChain::new();
    composer.add_post_processing(&mut chain);
    assert_eq!(
        chain.kinds(),
        vec![EffectKind::Render, EffectKind::Glitch, EffectKind::Bloom, EffectKind::GodRays]
    );
}

#[test]
fn failed_character_gets_a_placeholder() {
    let composer = composed(true);

    assert!(matches!(composer.character_state(), CharacterState::Failed(reason) if reason.contains("corrupt")));
    assert!(composer.character().is_none());
    assert_eq!(count_named(&composer, "character"), 1);

    let group = composer.character_node().expect("placeholder group");
    assert_eq!(composer.scene().children(group).count(), 1);
}

#[test]
fn driver_skins_the_character_and_drifts_layers() {
    let mut composer = composed(false);
    let mut driver = AnimationDriver::new();

    driver.tick(&mut composer, 0.5);

    let character = composer.character().expect("character attached");
    let mesh = composer
        .scene()
        .get(character.mesh_nodes[0])
        .and_then(|n| n.mesh_data())
        .expect("body mesh");
    // Halfway through the clip the joint has risen by half a unit.
    assert!((mesh.positions[1].y - 0.5).abs() < 1e-4);

    assert_eq!(composer.drift_offset(DriftLayer::Sand), Vec3::new(-0.5, 0.0, 0.0));
    assert_eq!(composer.drift_offset(DriftLayer::Water), Vec3::new(-0.5, -0.5, 0.0));
    let particles = composer.scene().get(composer.layer_node(DriftLayer::Particles)).expect("particles");
    assert_eq!(particles.transform.translation, Vec3::new(-0.5, 0.0, 0.0));
}

fn world_position(composer: &SceneComposer, layer: DriftLayer) -> Vec3 {
    composer
        .scene()
        .world_matrix(composer.layer_node(layer))
        .to_scale_rotation_translation()
        .2
}

#[test]
fn layers_drift_in_world_space() {
    let mut composer = composed(false);
    let before: Vec<Vec3> = DriftLayer::ALL.iter().map(|&l| world_position(&composer, l)).collect();

    AnimationDriver::new().tick(&mut composer, 1.0);

    let expected = [Vec3::new(-1.0, -1.0, 0.0), Vec3::NEG_X, Vec3::NEG_X];
    for ((layer, start), step) in DriftLayer::ALL.into_iter().zip(before).zip(expected) {
        let moved = world_position(&composer, layer) - start;
        assert!((moved - step).length() < 1e-5, "{layer:?} moved by {moved}");
    }
}

#[test]
fn drift_reset_is_an_identity_reset() {
    let mut composer = composed(false);
    let before: Vec<Transform> = DriftLayer::ALL
        .iter()
        .filter_map(|&l| composer.scene().get(composer.layer_node(l)).map(|n| n.transform))
        .collect();

    let mut driver = AnimationDriver::new();
    for dt in [0.016, 0.1, 0.033, 0.25, 0.007, 0.1] {
        driver.tick(&mut composer, dt);
    }
    assert_ne!(composer.drift_offset(DriftLayer::Water), Vec3::ZERO);

    let cycle = GlitchCycle::new(DemoConfig::default().glitch);
    let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
    cycle.on_leave(&mut composer, &mut camera, &mut StdRng::seed_from_u64(4));

    let after: Vec<Transform> = DriftLayer::ALL
        .iter()
        .filter_map(|&l| composer.scene().get(composer.layer_node(l)).map(|n| n.transform))
        .collect();
    assert_eq!(before, after);
    for layer in DriftLayer::ALL {
        assert_eq!(composer.drift_offset(layer), Vec3::ZERO);
    }
}

#[test]
fn camera_resets_land_in_bounds_and_look_at_the_origin() {
    let mut composer = composed(false);
    let config = DemoConfig::default().glitch;
    let cycle = GlitchCycle::new(config.clone());
    let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        camera.look_at(Vec3::ONE);
        match cycle.on_leave(&mut composer, &mut camera, &mut rng) {
            CameraReset::Random(p) => {
                assert_eq!(camera.position, p);
                assert!(p.x.abs() <= 4.0 && p.z.abs() <= 4.0);
                assert!((-2.0..=1.0).contains(&p.y));
            }
            CameraReset::Viewpoint(i) => {
                assert!(config.viewpoints.contains(&camera.position));
                assert_eq!(camera.position, config.viewpoints[i]);
            }
        }
        assert_eq!(camera.target, Vec3::ZERO);
    }
}

#[test]
fn bloom_follows_the_pointer() {
    assert_eq!(bloom_intensity_at(0.5, 0.5), 50.0);
    assert!(bloom_intensity_at(0.0, 0.0) <= 0.0);
    assert!(bloom_intensity_at(1.0, 1.0) <= 0.0);
}

#[test]
fn rotation_clip_keeps_rest_translation() {
    // A rotation-only clip leaves translations of the rest pose untouched.
    let clip = AnimationClip::new(
        "turn",
        vec![Channel {
            node: 0,
            interpolation: Interpolation::Step,
            times: vec![0.0],
            values: ChannelValues::Rotation(vec![Quat::from_rotation_y(1.0)]),
        }],
    );
    let mut pose = vec![Transform::from_translation(Vec3::X)];
    clip.sample(0.0, &mut pose);
    assert_eq!(pose[0].translation, Vec3::X);
}
