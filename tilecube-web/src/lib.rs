/// tilecube web - paints the scene onto an HTML canvas 2D context
///
/// The page owns the event listeners and timers: it forwards `keydown` key
/// names and window sizes to [`TileCubeView`], and schedules
/// `tick(request.generation)` with `setTimeout(request.delay_ms)` for as long
/// as a [`TickRequest`] comes back.
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tilecube_core::{
    Command, CubeFill, Renderer, Rgba, Scene, SceneConfig, ScheduledTick, Surface, Tick, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// `Surface` over a canvas 2D rendering context
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, viewport: &Viewport) {
        self.context
            .clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, point: Point2<f64>) {
        self.context.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point2<f64>) {
        self.context.line_to(point.x, point.y);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn fill(&mut self, color: Rgba) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }
}

/// When and for which animation run the page should call `tick` next
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRequest {
    pub delay_ms: u32,
    pub generation: u32,
}

impl From<ScheduledTick> for TickRequest {
    fn from(tick: ScheduledTick) -> Self {
        Self {
            delay_ms: tick.delay.as_millis() as u32,
            generation: tick.generation,
        }
    }
}

#[wasm_bindgen]
pub struct TileCubeView {
    scene: Scene,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl TileCubeView {
    /// Attach to the canvas with the given element id and generate a layout
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, corrected_fill: bool) -> Result<TileCubeView, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let scene = Scene::generate(&mut StdRng::seed_from_u64(seed), SceneConfig::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "tilecube: {} tiles from seed {seed}",
            scene.tiles().len()
        )));

        let fill = if corrected_fill {
            CubeFill::VisibleFaces
        } else {
            CubeFill::EveryFace
        };

        Ok(TileCubeView {
            scene,
            renderer: Renderer::new(fill),
            canvas,
            surface: CanvasSurface::new(context),
        })
    }

    /// Match the canvas to the available area and repaint
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.render();
    }

    /// Handle a `KeyboardEvent.key` name. Returns the first tick to schedule
    /// when this key started the animation.
    pub fn handle_key(&mut self, key: &str) -> Option<TickRequest> {
        let response = self.scene.apply(Command::from_key(key));
        if response.repaint {
            self.render();
        }
        response.schedule_tick.map(TickRequest::from)
    }

    /// Advance the animation run `generation`. Returns the next tick, or
    /// `undefined` once that run has been stopped.
    pub fn tick(&mut self, generation: u32) -> Option<TickRequest> {
        match self.scene.advance_animation(generation) {
            Tick::Continue(next) => {
                self.render();
                Some(next.into())
            }
            Tick::Stop => None,
        }
    }

    pub fn render(&mut self) {
        let viewport = Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64);
        self.renderer.render(&self.scene, &viewport, &mut self.surface);
    }
}
