use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalSize;

use axolotl_engine::coords::Viewport;
use axolotl_engine::core::{App, AppControl, FrameCtx};
use axolotl_engine::device::Gpu;
use axolotl_engine::effects::EffectChain;
use axolotl_engine::input::{InputEvent, Key, PointerMoveEvent};
use axolotl_engine::render::post::EffectComposer;
use axolotl_engine::render::OverlayRenderer;
use axolotl_engine::scene::PerspectiveCamera;

use crate::assets::AssetLoader;
use crate::composer::SceneComposer;
use crate::config::DemoConfig;
use crate::controls::OrbitControls;
use crate::driver::AnimationDriver;
use crate::glitch::GlitchCycle;
use crate::post::bloom_intensity_at;
use crate::stats::FrameStats;

const STATS_ORIGIN: Vec2 = Vec2::new(8.0, 8.0);
const STATS_SIZE: Vec2 = Vec2::new(180.0, 56.0);

/// The drift scene as an engine application.
pub struct DemoApp {
    config: DemoConfig,
    composer: SceneComposer,
    camera: PerspectiveCamera,
    controls: OrbitControls,

    chain: EffectChain,
    effects: EffectComposer,
    overlay: OverlayRenderer,

    driver: AnimationDriver,
    glitch: GlitchCycle,
    stats: FrameStats,
    rng: StdRng,
    viewport: Viewport,
}

impl DemoApp {
    pub fn new(config: DemoConfig, loader: Arc<dyn AssetLoader>) -> Self {
        let composer = SceneComposer::initialize(&config, loader);

        let cam = &config.camera;
        let mut camera = PerspectiveCamera::new(cam.fov_y, 1.0, cam.near, cam.far);
        camera.position = cam.position;
        camera.look_at(cam.target);

        let mut chain = EffectChain::new();
        composer.add_post_processing(&mut chain);
        log::debug!("effect chain: {:?}", chain.kinds());

        Self {
            controls: OrbitControls::new(cam.target),
            glitch: GlitchCycle::new(config.glitch.clone()),
            config,
            composer,
            camera,
            chain,
            effects: EffectComposer::new(),
            overlay: OverlayRenderer::new(),
            driver: AnimationDriver::new(),
            stats: FrameStats::default(),
            rng: StdRng::from_entropy(),
            viewport: Viewport::default(),
        }
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    fn handle_pointer(&mut self, events: &[InputEvent]) {
        let last = events.iter().rev().find_map(|ev| match ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => Some((*x, *y)),
            _ => None,
        });
        let Some((x, y)) = last else { return };

        let (nx, ny) = self.viewport.normalize(x, y);
        if let Some(bloom) = self.chain.bloom_mut() {
            bloom.intensity = bloom_intensity_at(nx, ny);
        }
    }
}

impl App for DemoApp {
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>, scale_factor: f64) {
        self.viewport = Viewport::from_physical(
            size.width,
            size.height,
            scale_factor,
            self.config.camera.max_pixel_ratio,
        );
        self.camera.set_aspect(self.viewport.aspect());

        let render_size = self.viewport.render_size();
        self.effects.set_size(gpu.device(), render_size);
        log::debug!(
            "resized to {}x{} logical, pixel ratio {}, render {}x{}",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
            render_size.0,
            render_size.1
        );
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Input ─────────────────────────────────────────────────────────
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            ctx.runtime.exit();
            return AppControl::Exit;
        }
        self.handle_pointer(&ctx.input_frame.events);

        // ── Simulation ────────────────────────────────────────────────────
        self.composer.poll_assets();

        let dt = ctx.time.dt;
        self.driver.tick(&mut self.composer, dt);

        if let Some(transition) = self.chain.update(dt, &mut self.rng) {
            let reset = self
                .glitch
                .handle(transition, &mut self.composer, &mut self.camera, &mut self.rng);
            if reset.is_some() {
                self.controls.sync(&self.camera);
            }
        }

        self.controls.update(&mut self.camera, ctx.input, ctx.input_frame);

        // ── Render ────────────────────────────────────────────────────────
        let rects = self.stats.overlay_rects(STATS_ORIGIN, STATS_SIZE);
        let effects = &mut self.effects;
        let overlay = &mut self.overlay;
        let scene = self.composer.scene();
        let camera = &self.camera;
        let chain = &self.chain;

        let control = ctx.render(self.viewport, |rctx, target| {
            effects.render(rctx, target, scene, camera, chain);
            overlay.render(rctx, target, &rects);
        });

        // ── Stats ─────────────────────────────────────────────────────────
        if let Some(sample) = self.stats.record(dt) {
            ctx.window.set_title(&sample.title());
        }

        control
    }
}
