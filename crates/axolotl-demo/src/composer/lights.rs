use glam::Vec3;

use axolotl_engine::scene::{Light, Node, Transform};

use crate::config::LightingConfig;

/// Ambient fill plus the shadow-casting sun, which aims at the origin.
pub fn build_lights(config: &LightingConfig) -> [Node; 2] {
    let ambient = Node::light(
        "ambient",
        Light::Ambient {
            color: config.ambient_color,
            intensity: config.ambient_intensity,
        },
    );

    let sun = Node::light(
        "sun",
        Light::Directional {
            color: config.sun_color,
            intensity: config.sun_intensity,
            target: Vec3::ZERO,
            shadow: Some(config.shadow),
        },
    )
    .with_transform(Transform::from_translation(config.sun_position))
    .with_shadows(true, false);

    [ambient, sun]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axolotl_engine::scene::NodeKind;

    #[test]
    fn one_ambient_and_one_shadowed_sun() {
        let config = LightingConfig::default();
        let [ambient, sun] = build_lights(&config);

        assert!(matches!(ambient.kind, NodeKind::Light(Light::Ambient { .. })));
        match sun.kind {
            NodeKind::Light(light @ Light::Directional { shadow: Some(shadow), .. }) => {
                assert!(light.casts_shadow());
                assert_eq!(shadow.map_size, 2048);
                assert!(shadow.near < shadow.far);
            }
            other => panic!("unexpected sun: {other:?}"),
        }
        assert_eq!(sun.transform.translation, config.sun_position);
    }
}
