/// Lit instanced cubes: ambient plus a white and a blue point light.
pub const LIT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_lit(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

fn point_light(pos: vec3<f32>, normal: vec3<f32>, light: vec3<f32>) -> f32 {
    return max(dot(normal, normalize(light - pos)), 0.0);
}

@fragment
fn fs_lit(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let key = point_light(in.world_pos, n, vec3<f32>(10.0, 10.0, 10.0));
    let fill = point_light(in.world_pos, n, vec3<f32>(-10.0, -10.0, -10.0)) * 0.5;
    let fill_color = vec3<f32>(0.290, 0.565, 0.886);
    let light = vec3<f32>(0.4) + vec3<f32>(key) + fill_color * fill;
    return vec4<f32>(min(in.color.rgb * light, vec3<f32>(1.0)), in.color.a);
}
"#;

/// Unlit colored lines: grid floor and terrain wireframe.
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
