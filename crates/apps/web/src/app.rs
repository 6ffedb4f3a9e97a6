//! Wasm-bindgen surface: state, events, fetch, and frame driving.
//!
//! The host page owns the requestAnimationFrame loop and calls `frame`
//! once per tick; everything else is event-driven. All state lives in one
//! thread-local cell with an explicit lifecycle: created by `init_globe`,
//! mutated only inside event handlers and `frame`, released by `teardown`.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use layers::highlight::{HIGHLIGHT_COLOR, HighlightLayer};
use layers::pipeline::resolve_pointer_move;
use layers::region2d::{
    MercatorView, REGION_FILL, REGION_FILL_HOVER, REGION_STROKE, REGION_STROKE_WIDTH,
    RegionMapLayer,
};
use runtime::{Frame, HoverChannel, HoverUpdate, Scheduler};
use scene::World;
use scene::atlas::FeatureAtlas;
use scene::camera::OrbitCamera;
use scene::prefabs::{GLOBE_RADIUS, GlobeSceneIds, register_frame_jobs, spawn_globe_scene};

use crate::view;
use crate::wgpu;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Bundled configuration and the statically bundled region dataset.
const MANIFEST_JSON: &str = include_str!("../assets/manifest.json");
const REGIONS_JSON: &str = include_str!("../assets/regions_kr.json");
const REGION_NAME_PROPERTY: &str = "name";
/// Hovering this region raises the secondary detail state.
const DETAIL_REGION: &str = "South Jeolla";

/// Directional key light, matching the scene's fixed sun at (5, 2, 5).
const LIGHT_DIR: [f32; 3] = [0.680_4, 0.272_2, 0.680_4];

const FIXED_DT_S: f64 = 1.0 / 60.0;

struct AppState {
    // 3D globe.
    world: World,
    scene_ids: Option<GlobeSceneIds>,
    scheduler: Scheduler<World>,
    camera: OrbitCamera,
    atlas: Option<FeatureAtlas>,
    /// Bumped on teardown so a late fetch completion is ignored.
    atlas_generation: u32,
    highlight: HighlightLayer,
    hover: HoverChannel,
    hover_callback: Option<js_sys::Function>,
    frame: Frame,
    canvas_width: f64,
    canvas_height: f64,
    canvas_3d: Option<HtmlCanvasElement>,
    wgpu: Option<wgpu::WgpuContext>,
    outline_dirty: bool,
    pointer_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    resize_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
    torn_down: bool,

    // 2D region map.
    region_canvas: Option<HtmlCanvasElement>,
    region_ctx: Option<CanvasRenderingContext2d>,
    region_atlas: Option<FeatureAtlas>,
    region_layer: RegionMapLayer,
    region_hovered: Option<String>,
}

impl AppState {
    fn new() -> Self {
        Self {
            world: World::new(),
            scene_ids: None,
            scheduler: Scheduler::new(),
            camera: OrbitCamera::default(),
            atlas: None,
            atlas_generation: 0,
            highlight: HighlightLayer::default(),
            hover: HoverChannel::new(),
            hover_callback: None,
            frame: Frame::new(0, FIXED_DT_S),
            canvas_width: 1280.0,
            canvas_height: 720.0,
            canvas_3d: None,
            wgpu: None,
            outline_dirty: false,
            pointer_closure: None,
            resize_closure: None,
            torn_down: false,
            region_canvas: None,
            region_ctx: None,
            region_atlas: None,
            region_layer: RegionMapLayer::new(
                2,
                MercatorView::default(),
                Some(DETAIL_REGION.to_string()),
            ),
            region_hovered: None,
        }
    }
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::new());
}

/// Safe TLS access helper that returns a default on teardown instead of
/// panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<AppState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization during hot-reload edge cases.
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    Ok(())
}

/// Set up the 3D globe on the given canvas: scene graph, renderer,
/// dataset fetch, and the pointer/resize listeners.
#[wasm_bindgen]
pub fn init_globe(canvas_id: String) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str("globe canvas missing"))?
        .dyn_into::<HtmlCanvasElement>()?;

    let generation = with_state(|state| {
        let mut s = state.borrow_mut();
        s.torn_down = false;
        s.world = World::new();
        s.scene_ids = Some(spawn_globe_scene(&mut s.world));
        s.scheduler = Scheduler::new();
        register_frame_jobs(&mut s.scheduler);
        s.camera = OrbitCamera::default();
        s.highlight.clear();
        s.frame = Frame::new(0, FIXED_DT_S);
        s.canvas_width = canvas.width() as f64;
        s.canvas_height = canvas.height() as f64;
        s.canvas_3d = Some(canvas.clone());
        s.atlas_generation
    });

    register_listeners(&window)?;

    // Renderer setup and dataset fetch are both asynchronous; pointer
    // events arriving before either completes resolve to "no country".
    spawn_local(async move {
        match wgpu::init_from_canvas_id(&canvas_id).await {
            Ok(ctx) => with_state(|state| {
                let mut s = state.borrow_mut();
                if !s.torn_down {
                    s.wgpu = Some(ctx);
                }
            }),
            Err(err) => console_log(&format!("wgpu init error: {err:?}")),
        }
    });
    spawn_dataset_fetch(generation);

    Ok(())
}

fn register_listeners(window: &web_sys::Window) -> Result<(), JsValue> {
    let pointer = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let rect = with_state(|state| {
            state
                .borrow()
                .canvas_3d
                .as_ref()
                .map(|c| c.get_bounding_client_rect())
        });
        let Some(rect) = rect else { return };
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();
        pointer_move(x, y);
    });
    window.add_event_listener_with_callback("mousemove", pointer.as_ref().unchecked_ref())?;

    let resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let size = with_state(|state| {
            state
                .borrow()
                .canvas_3d
                .as_ref()
                .map(|c| (c.client_width() as f64, c.client_height() as f64))
        });
        if let Some((w, h)) = size {
            set_canvas_size(w.max(1.0), h.max(1.0));
        }
    });
    window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.pointer_closure = Some(pointer);
        s.resize_closure = Some(resize);
    });
    Ok(())
}

fn spawn_dataset_fetch(generation: u32) {
    let manifest = match formats::SceneManifest::from_json_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(err) => {
            console_log(&format!("manifest parse error: {err}"));
            return;
        }
    };

    spawn_local(async move {
        let url = manifest.dataset.url.clone();
        let atlas = match fetch_feature_atlas(&url, &manifest.dataset.name_property).await {
            Ok(atlas) => atlas,
            Err(err) => {
                // Stay in the "no data yet" state; hit tests keep
                // resolving to no country.
                console_log(&format!("failed to fetch {url}: {err:?}"));
                return;
            }
        };

        with_state(|state| {
            let mut s = state.borrow_mut();
            if s.torn_down || s.atlas_generation != generation {
                return;
            }
            s.atlas = Some(atlas);
        });
    });
}

async fn fetch_feature_atlas(url: &str, name_property: &str) -> Result<FeatureAtlas, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    formats::atlas_from_geojson_str(&text, name_property)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Register the presentation-layer hover callback.
///
/// Invoked with `{ country: string | null, anchor: [x, y, z] | null }` on
/// every pointer-move resolution.
#[wasm_bindgen]
pub fn set_hover_callback(callback: js_sys::Function) {
    with_state(|state| {
        state.borrow_mut().hover_callback = Some(callback);
    });
}

/// Resolve a pointer position (canvas-relative pixels) against the globe.
///
/// The entire pipeline runs synchronously in this call: ray, sphere hit,
/// spin-corrected surface point, containment, highlight rebuild, hover
/// message. Runs on every mouse move with no throttling.
#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) {
    let updates = with_state(|state| {
        let mut s = state.borrow_mut();
        if s.torn_down {
            return Vec::new();
        }

        let spin_angle = s
            .scene_ids
            .and_then(|ids| s.world.spin(ids.globe))
            .map(|spin| spin.angle_rad)
            .unwrap_or(0.0);
        let frame_index = s.frame.index;
        let (canvas_w, canvas_h) = (s.canvas_width, s.canvas_height);

        {
            let AppState {
                camera,
                atlas,
                highlight,
                hover,
                ..
            } = &mut *s;
            resolve_pointer_move(
                camera,
                canvas_w,
                canvas_h,
                x_px,
                y_px,
                GLOBE_RADIUS,
                spin_angle,
                atlas.as_ref(),
                highlight,
                hover,
                frame_index,
            );
        }
        s.outline_dirty = true;
        s.hover.drain()
    });

    deliver_hover_updates(updates);
}

fn deliver_hover_updates(updates: Vec<HoverUpdate>) {
    if updates.is_empty() {
        return;
    }
    let callback = with_state(|state| state.borrow().hover_callback.clone());
    let Some(callback) = callback else { return };

    // Invoked outside the state borrow: the callback may call back into
    // this module.
    for update in updates {
        let payload = js_sys::Object::new();
        let country = match &update.feature {
            Some(name) => JsValue::from_str(name),
            None => JsValue::NULL,
        };
        let _ = js_sys::Reflect::set(&payload, &JsValue::from_str("country"), &country);

        let anchor = match update.anchor {
            Some([x, y, z]) => {
                let arr = js_sys::Array::new();
                arr.push(&JsValue::from_f64(x));
                arr.push(&JsValue::from_f64(y));
                arr.push(&JsValue::from_f64(z));
                arr.into()
            }
            None => JsValue::NULL,
        };
        let _ = js_sys::Reflect::set(&payload, &JsValue::from_str("anchor"), &anchor);

        if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
            console_log(&format!("hover callback error: {err:?}"));
        }
    }
}

/// Name of the currently hovered country, or null.
#[wasm_bindgen]
pub fn hovered_country() -> JsValue {
    let name = with_state(|state| state.borrow().hover.hovered_feature().map(str::to_string));
    match name {
        Some(name) => JsValue::from_str(&name),
        None => JsValue::NULL,
    }
}

/// Whether the country dataset has finished loading.
#[wasm_bindgen]
pub fn dataset_loaded() -> bool {
    with_state(|state| state.borrow().atlas.is_some())
}

/// Advance one animation frame and redraw.
///
/// `dt_s` is the wall-clock delta reported by the host loop; spins use
/// fixed per-frame deltas, the camera damping uses real time.
#[wasm_bindgen]
pub fn frame(dt_s: f64) {
    let err: Option<String> = with_state(|state| {
        let mut s = state.borrow_mut();
        if s.torn_down {
            return None;
        }

        s.frame = s.frame.next();
        let frame = s.frame;
        {
            let AppState {
                scheduler, world, ..
            } = &mut *s;
            scheduler.run_frame(frame, world);
        }
        s.camera.update(dt_s);

        s.wgpu.as_ref()?;

        if s.outline_dirty {
            let segments = outline_segments(&s.highlight);
            if let Some(ctx) = s.wgpu.as_mut() {
                wgpu::set_outline_lines(ctx, &segments);
            }
            s.outline_dirty = false;
        }

        let render_frame =
            gpu::Renderer::collect(&s.world, &s.highlight.snapshot().rings, HIGHLIGHT_COLOR);
        let aspect = s.canvas_width / s.canvas_height.max(1.0);
        let view_proj = view::view_proj_matrix(&s.camera, aspect);

        match s.wgpu.as_mut() {
            Some(ctx) => wgpu::render(ctx, view_proj, LIGHT_DIR, &render_frame)
                .err()
                .map(|e| format!("{e:?}")),
            None => None,
        }
    });

    if let Some(err) = err {
        console_log(&format!("render error: {err}"));
    }
}

/// Flatten the highlight rings into line-list segments for upload.
fn outline_segments(highlight: &HighlightLayer) -> Vec<[f32; 3]> {
    let mut segments = Vec::new();
    for ring in &highlight.snapshot().rings {
        for pair in ring.windows(2) {
            segments.push([pair[0].x as f32, pair[0].y as f32, pair[0].z as f32]);
            segments.push([pair[1].x as f32, pair[1].y as f32, pair[1].z as f32]);
        }
    }
    segments
}

/// Apply a new render-surface size: camera aspect and renderer output
/// dimensions update immediately.
#[wasm_bindgen]
pub fn set_canvas_size(width: f64, height: f64) {
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = width.max(1.0);
        s.canvas_height = height.max(1.0);
        let (w, h) = (s.canvas_width as u32, s.canvas_height as u32);
        if let Some(canvas) = &s.canvas_3d {
            canvas.set_width(w);
            canvas.set_height(h);
        }
        if let Some(ctx) = s.wgpu.as_mut() {
            wgpu::resize(ctx, w, h);
        }
    });
}

/// Orbit the camera by a pointer drag delta in pixels.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) {
    with_state(|state| {
        let mut s = state.borrow_mut();
        let (w, h) = (s.canvas_width, s.canvas_height);
        s.camera.orbit(delta_x_px, delta_y_px, w, h);
    });
}

/// Zoom the camera by a wheel delta (positive zooms out).
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta: f64) {
    with_state(|state| {
        state.borrow_mut().camera.zoom(wheel_delta);
    });
}

/// Upload RGBA pixels for one of the globe texture slots ("day", "night",
/// "clouds"). Never required: without uploads the globe renders with its
/// shaded fallback ramp.
#[wasm_bindgen]
pub fn set_globe_texture(
    slot: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<(), JsValue> {
    let slot = wgpu::TextureSlot::from_name(&slot)
        .ok_or_else(|| JsValue::from_str("unknown texture slot"))?;
    let err: Option<JsValue> = with_state(|state| {
        let mut s = state.borrow_mut();
        match s.wgpu.as_mut() {
            Some(ctx) => wgpu::set_texture_slot(ctx, slot, width, height, &rgba).err(),
            // Renderer not ready yet; dropping the upload only degrades
            // visuals.
            None => None,
        }
    });
    match err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Release everything: listeners, renderer, dataset, hover state.
///
/// After this call no frame or pointer handling mutates released state;
/// a dataset fetch still in flight is ignored on arrival.
#[wasm_bindgen]
pub fn teardown() {
    let (pointer, resize) = with_state(|state| {
        let mut s = state.borrow_mut();
        s.torn_down = true;
        s.atlas_generation = s.atlas_generation.wrapping_add(1);
        s.atlas = None;
        s.highlight.clear();
        s.hover = HoverChannel::new();
        s.hover_callback = None;
        s.wgpu = None;
        s.canvas_3d = None;
        s.region_canvas = None;
        s.region_ctx = None;
        s.region_atlas = None;
        s.region_hovered = None;
        (s.pointer_closure.take(), s.resize_closure.take())
    });

    if let Some(window) = web_sys::window() {
        if let Some(pointer) = pointer {
            let _ = window.remove_event_listener_with_callback(
                "mousemove",
                pointer.as_ref().unchecked_ref(),
            );
        }
        if let Some(resize) = resize {
            let _ = window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
    }
}

// ---------------------------------------------------------------------------
// 2D region map
// ---------------------------------------------------------------------------

/// Set up the 2D region map on its own canvas. The region dataset ships
/// with the app bundle, so there is no network round-trip here.
#[wasm_bindgen]
pub fn init_region_map(canvas_id: String) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str("region canvas missing"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let atlas = formats::atlas_from_geojson_str(REGIONS_JSON, REGION_NAME_PROPERTY)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.region_canvas = Some(canvas);
        s.region_ctx = Some(ctx);
        s.region_atlas = Some(atlas);
        s.region_hovered = None;
    });

    render_region_map();
    Ok(())
}

/// Hover the region map at a canvas-relative pixel position.
///
/// Returns `{ region: string | null, detail: bool }`; the detail flag is
/// raised only for the designated detail region.
#[wasm_bindgen]
pub fn region_pointer_move(x_px: f64, y_px: f64) -> JsValue {
    let (hovered, changed, detail) = with_state(|state| {
        let mut s = state.borrow_mut();
        let hit: Option<String> = s.region_atlas.as_ref().and_then(|atlas| {
            s.region_layer
                .hit_test(atlas, x_px, y_px)
                .map(str::to_string)
        });
        let changed = hit != s.region_hovered;
        s.region_hovered = hit.clone();
        let detail = hit
            .as_deref()
            .map(|name| s.region_layer.is_detail_region(name))
            .unwrap_or(false);
        (hit, changed, detail)
    });

    if changed {
        render_region_map();
    }

    let payload = js_sys::Object::new();
    let region = match &hovered {
        Some(name) => JsValue::from_str(name),
        None => JsValue::NULL,
    };
    let _ = js_sys::Reflect::set(&payload, &JsValue::from_str("region"), &region);
    let _ = js_sys::Reflect::set(
        &payload,
        &JsValue::from_str("detail"),
        &JsValue::from_bool(detail),
    );
    payload.into()
}

/// Clear region hover (pointer left the map).
#[wasm_bindgen]
pub fn region_pointer_leave() {
    let changed = with_state(|state| {
        let mut s = state.borrow_mut();
        let changed = s.region_hovered.is_some();
        s.region_hovered = None;
        changed
    });
    if changed {
        render_region_map();
    }
}

/// Full redraw of the region map for the current hover state.
fn render_region_map() {
    with_state(|state| {
        let s = state.borrow();
        let (Some(canvas), Some(ctx), Some(atlas)) =
            (&s.region_canvas, &s.region_ctx, &s.region_atlas)
        else {
            return;
        };

        let w = canvas.width() as f64;
        let h = canvas.height() as f64;
        ctx.clear_rect(0.0, 0.0, w, h);

        let paths = s.region_layer.extract(atlas, s.region_hovered.as_deref());
        ctx.set_line_width(REGION_STROKE_WIDTH);
        ctx_set_stroke_style(ctx, REGION_STROKE);
        for path in &paths {
            ctx_set_fill_style(
                ctx,
                if path.hovered {
                    REGION_FILL_HOVER
                } else {
                    REGION_FILL
                },
            );
            ctx.begin_path();
            for ring in &path.rings {
                let Some(first) = ring.first() else { continue };
                ctx.move_to(first.x, first.y);
                for p in &ring[1..] {
                    ctx.line_to(p.x, p.y);
                }
                ctx.close_path();
            }
            ctx.fill();
            ctx.stroke();
        }
    });
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(value),
    );
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(value),
    );
}
