#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use gpu::{RenderCommand, RenderFrame};

    /// Number of procedural background stars.
    const STAR_COUNT: u32 = 2400;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub depth_view: ::wgpu::TextureView,

        stars_pipeline: ::wgpu::RenderPipeline,
        globe_pipeline: ::wgpu::RenderPipeline,
        clouds_pipeline: ::wgpu::RenderPipeline,
        outline_pipeline: ::wgpu::RenderPipeline,

        globe_globals: ::wgpu::Buffer,
        clouds_globals: ::wgpu::Buffer,
        outline_globals: ::wgpu::Buffer,
        globe_bind_group: ::wgpu::BindGroup,
        clouds_bind_group: ::wgpu::BindGroup,
        outline_bind_group: ::wgpu::BindGroup,

        texture_layout: ::wgpu::BindGroupLayout,
        texture_bind_group: ::wgpu::BindGroup,
        sampler: ::wgpu::Sampler,
        day_view: ::wgpu::TextureView,
        night_view: ::wgpu::TextureView,
        clouds_view: ::wgpu::TextureView,
        day_loaded: bool,
        night_loaded: bool,
        clouds_loaded: bool,

        sphere_vertex_buffer: ::wgpu::Buffer,
        sphere_index_buffer: ::wgpu::Buffer,
        sphere_index_count: u32,
        outline_vertex_buffer: Option<::wgpu::Buffer>,
        outline_vertex_count: u32,
    }

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum TextureSlot {
        Day,
        Night,
        Clouds,
    }

    impl TextureSlot {
        pub fn from_name(name: &str) -> Option<Self> {
            match name {
                "day" => Some(TextureSlot::Day),
                "night" => Some(TextureSlot::Night),
                "clouds" => Some(TextureSlot::Clouds),
                _ => None,
            }
        }
    }

    const SHARED_GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_dir: vec3<f32>,
    _pad0: f32,
    // x: spin angle (rad), y: radius scale, z: opacity, w: unused
    params: vec4<f32>,
    // x: day texture, y: night texture, z: clouds texture, w: stars alpha
    flags: vec4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

fn spin_about_y(p: vec3<f32>, angle: f32) -> vec3<f32> {
    let c = cos(angle);
    let s = sin(angle);
    return vec3<f32>(c * p.x + s * p.z, p.y, -s * p.x + c * p.z);
}
"#;

    const GLOBE_SHADER_BODY: &str = r#"
@group(1) @binding(0) var samp: sampler;
@group(1) @binding(1) var day_tex: texture_2d<f32>;
@group(1) @binding(2) var night_tex: texture_2d<f32>;
@group(1) @binding(3) var clouds_tex: texture_2d<f32>;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    let world = spin_about_y(position * globals.params.y, globals.params.x);
    let normal = spin_about_y(position, globals.params.x);
    return VsOut(globals.view_proj * vec4<f32>(world, 1.0), normal, uv);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let l = normalize(globals.light_dir);
    let ndotl = max(dot(n, l), 0.0);

    if (globals.flags.x > 0.5) {
        let day = textureSample(day_tex, samp, in.uv).rgb;
        let night_sample = textureSample(night_tex, samp, in.uv).rgb;
        var night = vec3<f32>(0.0, 0.0, 0.0);
        if (globals.flags.y > 0.5) {
            night = night_sample * 0.7;
        }
        // Day/night terminator softened around grazing light.
        let k = smoothstep(-0.05, 0.25, dot(n, l));
        let lit = day * (0.3 + 0.7 * ndotl);
        return vec4<f32>(mix(night, lit, k), 1.0);
    }

    // Untextured fallback: shaded ocean-blue ramp.
    let base = vec3<f32>(0.16, 0.34, 0.58);
    let shade = 0.25 + 0.75 * ndotl;
    return vec4<f32>(base * shade, 1.0);
}
"#;

    const CLOUDS_SHADER_BODY: &str = r#"
@group(1) @binding(0) var samp: sampler;
@group(1) @binding(1) var day_tex: texture_2d<f32>;
@group(1) @binding(2) var night_tex: texture_2d<f32>;
@group(1) @binding(3) var clouds_tex: texture_2d<f32>;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    let world = spin_about_y(position * globals.params.y, globals.params.x);
    let normal = spin_about_y(position, globals.params.x);
    return VsOut(globals.view_proj * vec4<f32>(world, 1.0), normal, uv);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let l = normalize(globals.light_dir);
    let shade = 0.35 + 0.65 * max(dot(n, l), 0.0);
    let cover = textureSample(clouds_tex, samp, in.uv).r;
    // Without a cloud map there is nothing to draw.
    var alpha = 0.0;
    if (globals.flags.z > 0.5) {
        alpha = cover * globals.params.z;
    }
    return vec4<f32>(vec3<f32>(shade), alpha);
}
"#;

    const STARS_SHADER_BODY: &str = r#"
fn hash_u32(x_in: u32) -> u32 {
    var x = x_in;
    x ^= x >> 16u;
    x *= 0x7feb352du;
    x ^= x >> 15u;
    x *= 0x846ca68bu;
    x ^= x >> 16u;
    return x;
}

fn hash01(x: u32) -> f32 {
    return f32(hash_u32(x)) / 4294967295.0;
}

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) a: f32,
};

@vertex
fn vs_main(@builtin(vertex_index) vid: u32) -> VsOut {
    // Deterministic star directions on the unit sphere, rendered as a
    // backdrop at infinity: w = 0 removes camera translation, rotation
    // still applies.
    let rx = hash01(vid ^ 0x68bc21ebu);
    let ry = hash01(vid ^ 0x02e5be93u);
    let rb = hash01(vid ^ 0x9e3779b9u);

    let z = ry * 2.0 - 1.0;
    let phi = 6.2831853 * rx;
    let r = sqrt(max(1.0 - z * z, 0.0));
    let dir = vec3<f32>(r * cos(phi), r * sin(phi), z);
    let a = 0.05 + 0.3 * rb * rb;

    var clip = globals.view_proj * vec4<f32>(dir, 0.0);
    clip = vec4<f32>(clip.x, clip.y, clip.w, clip.w);
    return VsOut(clip, a);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, in.a * globals.flags.w);
}
"#;

    const OUTLINE_SHADER_BODY: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    let world = spin_about_y(position, globals.params.x);
    return globals.view_proj * vec4<f32>(world, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return globals.color;
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        uv: [f32; 2],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct LineVertex {
        position: [f32; 3],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        light_dir: [f32; 3],
        _pad0: f32,
        params: [f32; 4],
        flags: [f32; 4],
        color: [f32; 4],
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// 1×1 placeholder so texture bindings are always valid before (or
    /// without) any real asset upload.
    fn create_placeholder_texture(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        label: &str,
    ) -> ::wgpu::TextureView {
        create_rgba_texture(device, queue, label, 1, 1, &[0, 0, 0, 255])
    }

    fn create_rgba_texture(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> ::wgpu::TextureView {
        let size = ::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            ::wgpu::TexelCopyTextureInfo {
                texture: &tex,
                mip_level: 0,
                origin: ::wgpu::Origin3d::ZERO,
                aspect: ::wgpu::TextureAspect::All,
            },
            rgba,
            ::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere with equirectangular UVs: u 0→1 spans lon -180°→180°,
    /// v 0→1 spans lat 90°→-90°. Positions follow the same axis convention
    /// as the picking pipeline (+Y polar axis, theta = -lon).
    fn generate_unit_sphere_mesh(lat_segments: u32, lon_segments: u32) -> (Vec<Vertex>, Vec<u16>) {
        let lat_segments = lat_segments.max(3);
        let lon_segments = lon_segments.max(3);

        let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
        for row in 0..=lat_segments {
            let v = row as f32 / lat_segments as f32;
            let lat_deg = 90.0 - 180.0 * v;
            let phi = (90.0 - lat_deg).to_radians();

            for col in 0..=lon_segments {
                let u = col as f32 / lon_segments as f32;
                let lon_deg = -180.0 + 360.0 * u;
                let theta = (-lon_deg).to_radians();

                vertices.push(Vertex {
                    position: [
                        phi.sin() * theta.cos(),
                        phi.cos(),
                        phi.sin() * theta.sin(),
                    ],
                    uv: [u, v],
                });
            }
        }

        let stride = lon_segments + 1;
        let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
        for row in 0..lat_segments {
            for col in 0..lon_segments {
                let i0 = row * stride + col;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;

                indices.push(i0 as u16);
                indices.push(i2 as u16);
                indices.push(i1 as u16);
                indices.push(i1 as u16);
                indices.push(i2 as u16);
                indices.push(i3 as u16);
            }
        }

        (vertices, indices)
    }

    fn make_shader(device: &::wgpu::Device, label: &str, body: &str) -> ::wgpu::ShaderModule {
        let source = format!("{SHARED_GLOBALS_WGSL}{body}");
        device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        })
    }

    fn make_globals_buffer(device: &::wgpu::Device, label: &str) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn make_texture_bind_group(
        device: &::wgpu::Device,
        layout: &::wgpu::BindGroupLayout,
        sampler: &::wgpu::Sampler,
        day: &::wgpu::TextureView,
        night: &::wgpu::TextureView,
        clouds: &::wgpu::TextureView,
    ) -> ::wgpu::BindGroup {
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-textures-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ::wgpu::BindingResource::Sampler(sampler),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::TextureView(day),
                },
                ::wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ::wgpu::BindingResource::TextureView(night),
                },
                ::wgpu::BindGroupEntry {
                    binding: 3,
                    resource: ::wgpu::BindingResource::TextureView(clouds),
                },
            ],
        })
    }

    pub async fn init_from_canvas_id(canvas_id: &str) -> Result<WgpuContext, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // IMPORTANT: `wgpu::Surface` must not outlive its `wgpu::Instance`.
        // To avoid UB, we leak the instance for the lifetime of the app.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globe_shader = make_shader(&device, "globe-shader", GLOBE_SHADER_BODY);
        let clouds_shader = make_shader(&device, "clouds-shader", CLOUDS_SHADER_BODY);
        let stars_shader = make_shader(&device, "stars-shader", STARS_SHADER_BODY);
        let outline_shader = make_shader(&device, "outline-shader", OUTLINE_SHADER_BODY);

        let globals_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-globals-bgl"),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-textures-bgl"),
            entries: &[
                ::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: ::wgpu::AddressMode::Repeat,
            address_mode_v: ::wgpu::AddressMode::ClampToEdge,
            mag_filter: ::wgpu::FilterMode::Linear,
            min_filter: ::wgpu::FilterMode::Linear,
            mipmap_filter: ::wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let day_view = create_placeholder_texture(&device, &queue, "globe-day-placeholder");
        let night_view = create_placeholder_texture(&device, &queue, "globe-night-placeholder");
        let clouds_view = create_placeholder_texture(&device, &queue, "globe-clouds-placeholder");
        let texture_bind_group = make_texture_bind_group(
            &device,
            &texture_layout,
            &sampler,
            &day_view,
            &night_view,
            &clouds_view,
        );

        let globe_globals = make_globals_buffer(&device, "globe-globals");
        let clouds_globals = make_globals_buffer(&device, "clouds-globals");
        let outline_globals = make_globals_buffer(&device, "outline-globals");

        let make_globals_bg = |buffer: &::wgpu::Buffer, label: &str| {
            device.create_bind_group(&::wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &globals_layout,
                entries: &[::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let globe_bind_group = make_globals_bg(&globe_globals, "globe-globals-bg");
        let clouds_bind_group = make_globals_bg(&clouds_globals, "clouds-globals-bg");
        let outline_bind_group = make_globals_bg(&outline_globals, "outline-globals-bg");

        let sphere_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-sphere-pipeline-layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            immediate_size: 0,
        });
        let line_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-line-pipeline-layout"),
            bind_group_layouts: &[&globals_layout],
            immediate_size: 0,
        });

        let sphere_vertex_layout = ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as ::wgpu::BufferAddress,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes: &[
                ::wgpu::VertexAttribute {
                    format: ::wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                ::wgpu::VertexAttribute {
                    format: ::wgpu::VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        };

        let stars_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("stars-pipeline"),
            layout: Some(&line_layout),
            vertex: ::wgpu::VertexState {
                module: &stars_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &stars_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::PointList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let globe_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-pipeline"),
            layout: Some(&sphere_layout),
            vertex: ::wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[sphere_vertex_layout.clone()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let clouds_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("clouds-pipeline"),
            layout: Some(&sphere_layout),
            vertex: ::wgpu::VertexState {
                module: &clouds_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[sphere_vertex_layout.clone()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &clouds_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: false,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Outlines draw last with depth testing disabled so the hover
        // highlight is never swallowed by the globe.
        let outline_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("outline-pipeline"),
            layout: Some(&line_layout),
            vertex: ::wgpu::VertexState {
                module: &outline_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[::wgpu::VertexAttribute {
                        format: ::wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &outline_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: false,
                depth_compare: ::wgpu::CompareFunction::Always,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (vertices, indices) = generate_unit_sphere_mesh(64, 64);
        let sphere_vertex_buffer =
            device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-sphere-vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
        let sphere_index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-sphere-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            depth_view,
            stars_pipeline,
            globe_pipeline,
            clouds_pipeline,
            outline_pipeline,
            globe_globals,
            clouds_globals,
            outline_globals,
            globe_bind_group,
            clouds_bind_group,
            outline_bind_group,
            texture_layout,
            texture_bind_group,
            sampler,
            day_view,
            night_view,
            clouds_view,
            day_loaded: false,
            night_loaded: false,
            clouds_loaded: false,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: indices.len() as u32,
            outline_vertex_buffer: None,
            outline_vertex_count: 0,
        })
    }

    pub fn resize(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    /// Upload RGBA pixels into one of the globe texture slots.
    pub fn set_texture_slot(
        ctx: &mut WgpuContext,
        slot: TextureSlot,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), JsValue> {
        if width == 0 || height == 0 || rgba.len() != (4 * width * height) as usize {
            return Err(JsValue::from_str("texture payload size mismatch"));
        }

        let label = match slot {
            TextureSlot::Day => "globe-day",
            TextureSlot::Night => "globe-night",
            TextureSlot::Clouds => "globe-clouds",
        };
        let view = create_rgba_texture(&ctx.device, &ctx.queue, label, width, height, rgba);
        match slot {
            TextureSlot::Day => {
                ctx.day_view = view;
                ctx.day_loaded = true;
            }
            TextureSlot::Night => {
                ctx.night_view = view;
                ctx.night_loaded = true;
            }
            TextureSlot::Clouds => {
                ctx.clouds_view = view;
                ctx.clouds_loaded = true;
            }
        }
        ctx.texture_bind_group = make_texture_bind_group(
            &ctx.device,
            &ctx.texture_layout,
            &ctx.sampler,
            &ctx.day_view,
            &ctx.night_view,
            &ctx.clouds_view,
        );
        Ok(())
    }

    /// Replace the outline vertex buffer with line-list segments.
    pub fn set_outline_lines(ctx: &mut WgpuContext, segments: &[[f32; 3]]) {
        if segments.is_empty() {
            ctx.outline_vertex_buffer = None;
            ctx.outline_vertex_count = 0;
            return;
        }
        let vertices: Vec<LineVertex> = segments
            .iter()
            .map(|p| LineVertex { position: *p })
            .collect();
        ctx.outline_vertex_buffer = Some(ctx.device.create_buffer_init(
            &::wgpu::util::BufferInitDescriptor {
                label: Some("hover-outline-vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            },
        ));
        ctx.outline_vertex_count = vertices.len() as u32;
    }

    fn globals_for(
        view_proj: [[f32; 4]; 4],
        light_dir: [f32; 3],
        params: [f32; 4],
        flags: [f32; 4],
        color: [f32; 4],
    ) -> Globals {
        Globals {
            view_proj,
            light_dir,
            _pad0: 0.0,
            params,
            flags,
            color,
        }
    }

    /// Replay the frame's command list into render passes.
    pub fn render(
        ctx: &mut WgpuContext,
        view_proj: [[f32; 4]; 4],
        light_dir: [f32; 3],
        frame: &RenderFrame,
    ) -> Result<(), JsValue> {
        let mut draw_stars = false;
        let mut globe: Option<(f64, f64)> = None;
        let mut clouds: Option<(f64, f64, f64)> = None;
        let mut outlines: Option<(f64, [f32; 4])> = None;

        for command in &frame.commands {
            match command {
                RenderCommand::DrawStars { .. } => draw_stars = true,
                RenderCommand::DrawGlobe {
                    radius,
                    spin_angle_rad,
                } => globe = Some((*radius, *spin_angle_rad)),
                RenderCommand::DrawClouds {
                    radius,
                    opacity,
                    spin_angle_rad,
                } => clouds = Some((*radius, *opacity, *spin_angle_rad)),
                RenderCommand::DrawOutlines {
                    spin_angle_rad,
                    color,
                    ..
                } => outlines = Some((*spin_angle_rad, *color)),
            }
        }

        let tex_flags = |with_clouds: bool| {
            [
                if ctx.day_loaded { 1.0 } else { 0.0 },
                if ctx.night_loaded { 1.0 } else { 0.0 },
                if with_clouds && ctx.clouds_loaded { 1.0 } else { 0.0 },
                1.0,
            ]
        };

        if let Some((radius, spin)) = globe {
            let globals = globals_for(
                view_proj,
                light_dir,
                [spin as f32, radius as f32, 1.0, 0.0],
                tex_flags(false),
                [0.0; 4],
            );
            ctx.queue
                .write_buffer(&ctx.globe_globals, 0, bytemuck::bytes_of(&globals));
        }
        if let Some((radius, opacity, spin)) = clouds {
            let globals = globals_for(
                view_proj,
                light_dir,
                [spin as f32, radius as f32, opacity as f32, 0.0],
                tex_flags(true),
                [0.0; 4],
            );
            ctx.queue
                .write_buffer(&ctx.clouds_globals, 0, bytemuck::bytes_of(&globals));
        }
        if let Some((spin, color)) = outlines {
            let globals = globals_for(
                view_proj,
                light_dir,
                [spin as f32, 1.0, 1.0, 0.0],
                tex_flags(false),
                color,
            );
            ctx.queue
                .write_buffer(&ctx.outline_globals, 0, bytemuck::bytes_of(&globals));
        }

        let surface_frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = surface_frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("globe-frame-encoder"),
            });

        // Pass 1: clear to deep space and draw stars (no depth attachment).
        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("stars-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: 0.004,
                            g: 0.004,
                            b: 0.016,
                            a: 1.0,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            if draw_stars {
                rpass.set_pipeline(&ctx.stars_pipeline);
                rpass.set_bind_group(0, &ctx.globe_bind_group, &[]);
                rpass.draw(0..STAR_COUNT, 0..1);
            }
        }

        // Pass 2: globe, clouds, and outlines share one depth buffer.
        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Load,
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            if globe.is_some() {
                rpass.set_pipeline(&ctx.globe_pipeline);
                rpass.set_bind_group(0, &ctx.globe_bind_group, &[]);
                rpass.set_bind_group(1, &ctx.texture_bind_group, &[]);
                rpass.set_vertex_buffer(0, ctx.sphere_vertex_buffer.slice(..));
                rpass.set_index_buffer(
                    ctx.sphere_index_buffer.slice(..),
                    ::wgpu::IndexFormat::Uint16,
                );
                rpass.draw_indexed(0..ctx.sphere_index_count, 0, 0..1);
            }

            if clouds.is_some() {
                rpass.set_pipeline(&ctx.clouds_pipeline);
                rpass.set_bind_group(0, &ctx.clouds_bind_group, &[]);
                rpass.set_bind_group(1, &ctx.texture_bind_group, &[]);
                rpass.set_vertex_buffer(0, ctx.sphere_vertex_buffer.slice(..));
                rpass.set_index_buffer(
                    ctx.sphere_index_buffer.slice(..),
                    ::wgpu::IndexFormat::Uint16,
                );
                rpass.draw_indexed(0..ctx.sphere_index_count, 0, 0..1);
            }

            if outlines.is_some()
                && let Some(buffer) = &ctx.outline_vertex_buffer
            {
                rpass.set_pipeline(&ctx.outline_pipeline);
                rpass.set_bind_group(0, &ctx.outline_bind_group, &[]);
                rpass.set_vertex_buffer(0, buffer.slice(..));
                rpass.draw(0..ctx.outline_vertex_count, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    //! Native stub so the crate typechecks off-wasm; the renderer is only
    //! ever constructed in the browser.

    use gpu::RenderFrame;

    #[derive(Debug)]
    pub struct WgpuContext;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum TextureSlot {
        Day,
        Night,
        Clouds,
    }

    impl TextureSlot {
        pub fn from_name(name: &str) -> Option<Self> {
            match name {
                "day" => Some(TextureSlot::Day),
                "night" => Some(TextureSlot::Night),
                "clouds" => Some(TextureSlot::Clouds),
                _ => None,
            }
        }
    }

    pub fn resize(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn set_outline_lines(_ctx: &mut WgpuContext, _segments: &[[f32; 3]]) {}

    pub fn render(
        _ctx: &mut WgpuContext,
        _view_proj: [[f32; 4]; 4],
        _light_dir: [f32; 3],
        _frame: &RenderFrame,
    ) -> Result<(), String> {
        Ok(())
    }
}

pub use imp::*;
