use crate::camera::OrbitCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use fieldscape_common::Rgb;
use fieldscape_scene::{Scene, TerrainMesh};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};
const GRID_SIZE: f32 = 20.0;
const GRID_DIVISIONS: u32 = 20;
const GRID_Y: f32 = -2.0;
const GRID_CENTER_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const GRID_LINE_COLOR: [f32; 4] = [0.102, 0.102, 0.102, 1.0];
const TERRAIN_COLOR: [f32; 4] = [0.290, 0.565, 0.886, 1.0];
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: Rgb) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: color.to_rgba(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Unit cube, four vertices per face so each face has a flat normal.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let normals = [Vec3::Z, Vec3::NEG_Z, Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for n in normals {
        let up = if n.y.abs() > 0.5 { Vec3::Z } else { Vec3::Y };
        // a × b == n keeps every face counter-clockwise from outside.
        let a = up.cross(n).normalize();
        let b = n.cross(a);
        let base = vertices.len() as u16;
        for (sa, sb) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = 0.5 * (n + sa * a + sb * b);
            vertices.push(Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            });
        }
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

/// Square line grid in the XZ plane, centre lines highlighted.
fn grid_mesh(size: f32, divisions: u32, y: f32) -> Vec<LineVertex> {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut verts = Vec::with_capacity(4 * (divisions as usize + 1));
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i * 2 == divisions {
            GRID_CENTER_COLOR
        } else {
            GRID_LINE_COLOR
        };
        for (from, to) in [
            ([-half, y, k], [half, y, k]),
            ([k, y, -half], [k, y, half]),
        ] {
            verts.push(LineVertex {
                position: from,
                color,
            });
            verts.push(LineVertex {
                position: to,
                color,
            });
        }
    }
    verts
}

fn terrain_vertices(terrain: &TerrainMesh, out: &mut Vec<LineVertex>) {
    out.clear();
    out.extend(terrain.positions().iter().map(|p| LineVertex {
        position: p.to_array(),
        color: TERRAIN_COLOR,
    }));
}

/// Instances for the visible particle and cube layers, particles first.
fn scene_instances(scene: &Scene, out: &mut Vec<InstanceData>) {
    out.clear();
    if scene.layers.particles {
        let particles = scene.particles();
        let placed = particles
            .positions()
            .iter()
            .zip(particles.colors())
            .zip(particles.sizes());
        for ((position, color), size) in placed {
            let model =
                Mat4::from_scale_rotation_translation(Vec3::splat(*size), Quat::IDENTITY, *position);
            out.push(InstanceData::new(model, *color));
        }
    }
    if scene.layers.cube {
        let cube = scene.cube();
        let t = &cube.transform;
        let model = Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.position);
        out.push(InstanceData::new(model, cube.color));
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    source: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(spec.label),
        source: wgpu::ShaderSource::Wgsl(spec.source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(spec.vs_entry),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(spec.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu renderer for a [`Scene`].
///
/// Terrain topology is fixed when the renderer is built; only vertex
/// positions are uploaded per frame.
pub struct WgpuRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    grid_vertex_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    terrain_vertex_buffer: wgpu::Buffer,
    terrain_index_buffer: wgpu::Buffer,
    terrain_index_count: u32,
    terrain_vertex_count: usize,
    instance_buffer: wgpu::Buffer,
    max_instances: usize,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    terrain_scratch: Vec<LineVertex>,
    instance_scratch: Vec<InstanceData>,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        terrain: &TerrainMesh,
        max_instances: usize,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "lit_pipeline",
                source: shaders::LIT_SHADER,
                vs_entry: "vs_lit",
                fs_entry: "fs_lit",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );

        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "line_pipeline",
                source: shaders::LINE_SHADER,
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
                }],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
            },
        );

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let grid_verts = grid_mesh(GRID_SIZE, GRID_DIVISIONS, GRID_Y);
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&grid_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut terrain_scratch = Vec::with_capacity(terrain.vertex_count());
        terrain_vertices(terrain, &mut terrain_scratch);
        let terrain_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_vertex_buffer"),
            contents: bytemuck::cast_slice(&terrain_scratch),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let terrain_indices = terrain.line_indices();
        let terrain_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_index_buffer"),
            contents: bytemuck::cast_slice(&terrain_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let max_instances = max_instances.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!(
            terrain_vertices = terrain.vertex_count(),
            terrain_lines = terrain_indices.len() / 2,
            max_instances,
            "gpu buffers created"
        );

        Self {
            lit_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            grid_vertex_buffer,
            grid_vertex_count: grid_verts.len() as u32,
            terrain_vertex_buffer,
            terrain_index_buffer,
            terrain_index_count: terrain_indices.len() as u32,
            terrain_vertex_count: terrain.vertex_count(),
            instance_buffer,
            max_instances,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
            terrain_scratch,
            instance_scratch: Vec::with_capacity(max_instances),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: grid floor, terrain wireframe, then lit instances.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );

        let terrain = scene.terrain();
        let draw_terrain =
            scene.layers.terrain && terrain.vertex_count() == self.terrain_vertex_count;
        if draw_terrain {
            terrain_vertices(terrain, &mut self.terrain_scratch);
            queue.write_buffer(
                &self.terrain_vertex_buffer,
                0,
                bytemuck::cast_slice(&self.terrain_scratch),
            );
        } else if scene.layers.terrain {
            tracing::warn!(
                expected = self.terrain_vertex_count,
                got = terrain.vertex_count(),
                "terrain size changed, skipping wireframe"
            );
        }

        scene_instances(scene, &mut self.instance_scratch);
        if self.instance_scratch.len() > self.max_instances {
            tracing::warn!(
                instances = self.instance_scratch.len(),
                max = self.max_instances,
                "instance buffer full, dropping extras"
            );
            self.instance_scratch.truncate(self.max_instances);
        }
        if !self.instance_scratch.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instance_scratch),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            if draw_terrain {
                pass.set_vertex_buffer(0, self.terrain_vertex_buffer.slice(..));
                pass.set_index_buffer(
                    self.terrain_index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..self.terrain_index_count, 0, 0..1);
            }

            if !self.instance_scratch.is_empty() {
                pass.set_pipeline(&self.lit_pipeline);
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(
                    0..self.cube_index_count,
                    0,
                    0..self.instance_scratch.len() as u32,
                );
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscape_kernel::FieldKernel;
    use fieldscape_scene::SceneConfig;

    #[test]
    fn cube_faces_wind_outward() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(verts[i as usize].position));
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            assert!(a.abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn grid_lies_on_floor() {
        let verts = grid_mesh(GRID_SIZE, GRID_DIVISIONS, GRID_Y);
        assert_eq!(verts.len(), 4 * 21);
        assert!(verts.iter().all(|v| v.position[1] == GRID_Y));
        let centre = verts.iter().filter(|v| v.color == GRID_CENTER_COLOR).count();
        assert_eq!(centre, 4);
    }

    #[test]
    fn instances_follow_visible_layers() {
        let kernel = FieldKernel::default();
        let mut scene = Scene::new(&kernel, &SceneConfig::default()).unwrap();
        scene.update(&kernel, 1.0).unwrap();

        let mut out = Vec::new();
        scene_instances(&scene, &mut out);
        assert_eq!(out.len(), 151);
        assert_eq!(out[150].color, scene.cube().color.to_rgba());

        scene.layers.particles = false;
        scene_instances(&scene, &mut out);
        assert_eq!(out.len(), 1);

        scene.layers.cube = false;
        scene_instances(&scene, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn particle_instance_matches_particle() {
        let kernel = FieldKernel::default();
        let mut scene = Scene::new(&kernel, &SceneConfig::default()).unwrap();
        scene.update(&kernel, 0.5).unwrap();

        let mut out = Vec::new();
        scene_instances(&scene, &mut out);
        let particles = scene.particles();
        let translation = Vec3::new(out[7].model_3[0], out[7].model_3[1], out[7].model_3[2]);
        assert_eq!(translation, particles.positions()[7]);
        assert_eq!(out[7].model_0[0], particles.sizes()[7]);
        assert_eq!(out[7].color, particles.colors()[7].to_rgba());
    }

    #[test]
    fn terrain_vertices_copy_positions() {
        let kernel = FieldKernel::default();
        let mut terrain = TerrainMesh::plane(4.0, 4, -2.0).unwrap();
        terrain.update(&kernel, 0.3);
        let mut out = Vec::new();
        terrain_vertices(&terrain, &mut out);
        assert_eq!(out.len(), 25);
        assert_eq!(out[6].position, terrain.positions()[6].to_array());
        assert!(out.iter().all(|v| v.color == TERRAIN_COLOR));
    }
}
