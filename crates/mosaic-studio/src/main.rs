mod config;
mod dataset;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use mosaic_engine::classify::KnownEyeShapes;
use mosaic_engine::core::{App, AppControl, FrameCtx};
use mosaic_engine::device::GpuInit;
use mosaic_engine::geometry::{compute_transform, Scene, Transform};
use mosaic_engine::logging::{init_logging, LoggingConfig};
use mosaic_engine::paint::{Color, ColorSelector, Palette};
use mosaic_engine::render::{DrawList, PolygonPipeline, Renderer};
use mosaic_engine::window::{Runtime, RuntimeConfig};

use config::StudioConfig;
use dataset::Dataset;

/// Draws the face mosaic on every redraw.
struct MosaicApp {
    scene: Scene,
    eyes: KnownEyeShapes,
    transform: Transform,
    palette: Palette,
    background: Color,
    seed: u64,

    renderer: Renderer<DrawList>,
    pipeline: PolygonPipeline,
}

impl MosaicApp {
    fn new(dataset: Dataset, config: &StudioConfig) -> Result<Self> {
        let transform = compute_transform(&dataset.scene).context("failed to normalize dataset")?;

        let mut renderer = Renderer::new(DrawList::new());
        renderer
            .initialize_default()
            .context("failed to build the polygon shader program")?;

        Ok(Self {
            scene: dataset.scene,
            eyes: dataset.eyes,
            transform,
            palette: Palette::face_mosaic(),
            background: config.background,
            seed: config.seed,
            renderer,
            pipeline: PolygonPipeline::new(),
        })
    }
}

impl App for MosaicApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // Same seed each redraw, so exposes and resizes keep the colors.
        let mut selector = ColorSelector::new(self.palette.clone(), StdRng::seed_from_u64(self.seed));

        self.renderer.surface_mut().reset();
        if let Err(err) = self.renderer.render_scene(
            &self.scene,
            &self.transform,
            &self.eyes,
            &mut selector,
            self.background,
        ) {
            log::error!("failed to render scene: {err}");
            return AppControl::Exit;
        }

        let program = match self.renderer.program() {
            Ok(program) => program,
            Err(err) => {
                log::error!("{err}");
                return AppControl::Exit;
            }
        };
        let list = self.renderer.surface();
        let pipeline = &mut self.pipeline;

        ctx.render(|rctx, target| pipeline.render(rctx, target, program, list))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = StudioConfig::from_env()?;
    let dataset = match &config.dataset {
        Some(path) => Dataset::load(path)?,
        None => Dataset::embedded()?,
    };
    log::info!(
        "face mosaic: {} polygons ({} skipped), color seed {} (set {} to reproduce)",
        dataset.scene.len(),
        dataset.skipped,
        config.seed,
        config::SEED_VAR
    );

    let app = MosaicApp::new(dataset, &config)?;

    Runtime::run(
        RuntimeConfig {
            title: "Face Mosaic".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        app,
    )
}
