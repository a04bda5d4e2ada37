//! Headless demo: renders a few layered frames offscreen and reports batching stats.

use anyhow::Result;
use glam::{Mat4, Quat, Vec3};

use stratum_engine::device::{Gpu, GpuInit, RenderTarget, WgpuBackend};
use stratum_engine::logging::{init_logging, LoggingConfig};
use stratum_engine::paint::Color;
use stratum_engine::render::{
    BufferDesc, BufferUsage, GpuBackend, IndexFormat, Renderer, RendererConfig, Topology,
    VertexBinding,
};
use stratum_engine::scene::{
    BatchCmd, MaterialId, PrimitiveCmd, QueueId, RenderCommand, TrianglesCmd, Vertex,
};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FRAMES: u32 = 3;

const BACKDROP: MaterialId = MaterialId(0);
const PANEL: MaterialId = MaterialId(1);
const ACCENT: MaterialId = MaterialId(2);
const SOLID: MaterialId = MaterialId(3);
const GLASS: MaterialId = MaterialId(4);

/// Marker quad (6 triangle indices) followed by its outline (5 line-strip indices).
const MARKER_INDICES: [u16; 11] = [0, 1, 2, 0, 2, 3, 0, 1, 2, 3, 0];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = Gpu::new_blocking(GpuInit::default())?;
    let target =
        RenderTarget::new(gpu.device(), WIDTH, HEIGHT, wgpu::TextureFormat::Rgba8UnormSrgb);

    let mut backend = WgpuBackend::new(&gpu, target.format());
    // Pixel space, top-left origin, +Y down.
    backend.set_view_projection(Mat4::orthographic_rh(
        0.0,
        WIDTH as f32,
        HEIGHT as f32,
        0.0,
        -100.0,
        100.0,
    ));
    backend.set_material_tint(PANEL, Color::from_srgb_u8(200, 210, 230, 255));
    backend.set_material_tint(ACCENT, Color::from_srgb_u8(255, 180, 60, 255));
    backend.set_material_tint(GLASS, Color::from_srgb_u8(120, 200, 255, 128));

    let mut renderer = Renderer::with_config(RendererConfig {
        queue_reserve: 64,
        clear_color: Color::from_srgb_u8(18, 20, 28, 255),
        ..Default::default()
    });
    let hud = renderer.create_queue();
    let marker = upload_marker(&mut backend);

    for frame in 0..FRAMES {
        renderer.clear(&mut backend);
        build_frame(&mut renderer, hud, marker, frame);
        renderer.render(&mut backend);

        let mut encoder = gpu.create_encoder("stratum studio frame");
        backend.encode(&mut encoder, &target);
        gpu.submit(encoder);

        let stats = renderer.stats();
        log::info!(
            "frame {frame}: {} batched draws, {} indices, {} vertices, {} flushes",
            stats.drawn_batches,
            stats.drawn_indices,
            stats.drawn_vertices,
            stats.flushes
        );
    }

    renderer.release(&mut backend);
    backend.destroy_buffer(marker.vertex);
    backend.destroy_buffer(marker.index);

    log::info!(
        "done: {} pipelines cached, {} buffers alive",
        backend.pipeline_count(),
        backend.live_buffers()
    );
    Ok(())
}

fn build_frame(renderer: &mut Renderer, hud: QueueId, marker: VertexBinding, frame: u32) {
    let t = frame as f32 * 0.25;

    // Backdrop stripes: one material, merged into a single draw.
    for i in 0..8 {
        let y = i as f32 * (HEIGHT as f32 / 8.0);
        let shade = 30 + i as u8 * 6;
        renderer.add_command(RenderCommand::triangles(
            -10.0,
            BACKDROP,
            rect(0.0, y, WIDTH as f32, HEIGHT as f32 / 8.0, [shade, shade, shade + 10, 255]),
        ));
    }

    // Panels alternate materials, so each one breaks the batch.
    for i in 0..4 {
        let material = if i % 2 == 0 { PANEL } else { ACCENT };
        let x = 40.0 + i as f32 * 140.0;
        renderer.add_command(RenderCommand::triangles(
            0.0,
            material,
            rect(x, 60.0, 120.0, 80.0, [255; 4]),
        ));
    }

    // 3D content: opaque first, then translucent over it.
    let spin = Mat4::from_rotation_translation(
        Quat::from_rotation_z(t),
        Vec3::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0, 10.0),
    );
    renderer.add_3d_command(
        RenderCommand::triangles(0.0, SOLID, rect_ccw(-60.0, -60.0, 120.0, 120.0, spin)),
        false,
    );
    renderer.add_3d_command(
        RenderCommand::triangles(
            0.0,
            GLASS,
            rect_ccw(-90.0, -30.0, 180.0, 60.0, Mat4::from_translation(Vec3::new(320.0, 240.0, 20.0))),
        ),
        true,
    );

    // Pre-uploaded geometry, drawn directly.
    let at = Mat4::from_translation(Vec3::new(600.0, 40.0, 0.0));
    renderer.add_command(RenderCommand::batch(2.0, ACCENT, BatchCmd::new(marker, 6, at)));
    renderer.add_command(RenderCommand::primitive(
        2.0,
        PANEL,
        PrimitiveCmd {
            binding: marker,
            topology: Topology::LineStrip,
            index_format: IndexFormat::Uint16,
            first_index: 6,
            index_count: 5,
            transform: at,
        },
    ));

    renderer.add_command(RenderCommand::custom(3.0, |gpu| {
        log::debug!("custom command sees {:?}", gpu.ambient_state());
    }));

    // HUD lives in its own queue, drawn above everything else.
    renderer.add_command(RenderCommand::group(5.0, hud));
    renderer.push_group(hud);
    for i in 0..3 {
        let w = 60.0 + 40.0 * ((t + i as f32).sin() * 0.5 + 0.5);
        renderer.add_command(RenderCommand::triangles(
            0.0,
            ACCENT,
            rect(20.0, HEIGHT as f32 - 40.0 - i as f32 * 24.0, w, 16.0, [255; 4]),
        ));
    }
    renderer.pop_group();
}

fn rect(x: f32, y: f32, w: f32, h: f32, color: [u8; 4]) -> TrianglesCmd {
    TrianglesCmd::quad([x, y], [w, h], color, Mat4::IDENTITY)
}

/// Quad wound counter-clockwise after the y-flipping projection, so back-face
/// culling in the 3D buckets keeps it.
fn rect_ccw(x: f32, y: f32, w: f32, h: f32, transform: Mat4) -> TrianglesCmd {
    let mut cmd = TrianglesCmd::quad([x, y], [w, h], [255; 4], transform);
    cmd.indices = vec![0, 2, 1, 0, 3, 2];
    cmd
}

fn upload_marker(gpu: &mut dyn GpuBackend) -> VertexBinding {
    let quad = TrianglesCmd::quad([-12.0, -12.0], [24.0, 24.0], [255; 4], Mat4::IDENTITY);

    let vertex = gpu.create_buffer(&BufferDesc {
        label: "studio marker vertices",
        usage: BufferUsage::Vertex,
        size: (quad.vertices.len() * std::mem::size_of::<Vertex>()) as u64,
    });
    gpu.update_buffer(vertex, 0, bytemuck::cast_slice(&quad.vertices));

    let index = gpu.create_buffer(&BufferDesc {
        label: "studio marker indices",
        usage: BufferUsage::Index,
        size: std::mem::size_of_val(&MARKER_INDICES) as u64,
    });
    gpu.update_buffer(index, 0, bytemuck::cast_slice(&MARKER_INDICES));

    VertexBinding { vertex, index }
}
