/// WGSL raymarched scene, drawn as one full-screen triangle into the scaled target.
pub const SCENE_SHADER: &str = r#"
struct Scene {
    // xy = target size in pixels, z = elapsed seconds, w = render scale
    resolution: vec4<f32>,
    // w = view distance
    cam_position: vec4<f32>,
    cam_forward: vec4<f32>,
    cam_up: vec4<f32>,
    // x = contrast, y = saturation, z = brightness, w = high detail flag
    grading: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: Scene;

@vertex
fn vs_fullscreen(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}

fn sd_scene(p: vec3<f32>) -> f32 {
    let cell = 40.0;
    let q = p - cell * round(p / cell);
    let spheres = length(q) - 8.0;
    let ground = p.y + 24.0 + 4.0 * sin(p.x * 0.05) * cos(p.z * 0.05);
    return min(spheres, ground);
}

fn normal_at(p: vec3<f32>) -> vec3<f32> {
    let e = vec2<f32>(0.01, 0.0);
    return normalize(vec3<f32>(
        sd_scene(p + e.xyy) - sd_scene(p - e.xyy),
        sd_scene(p + e.yxy) - sd_scene(p - e.yxy),
        sd_scene(p + e.yyx) - sd_scene(p - e.yyx),
    ));
}

@fragment
fn fs_scene(@builtin(position) frag: vec4<f32>) -> @location(0) vec4<f32> {
    let res = scene.resolution.xy;
    let uv = (vec2<f32>(frag.x, res.y - frag.y) * 2.0 - res) / res.y;

    let forward = normalize(scene.cam_forward.xyz);
    let up = normalize(scene.cam_up.xyz);
    let right = normalize(cross(forward, up));
    let dir = normalize(forward * 1.5 + right * uv.x + up * uv.y);
    let origin = scene.cam_position.xyz;
    let view_distance = scene.cam_position.w;

    var max_steps = 96;
    if scene.grading.w > 0.5 {
        max_steps = 256;
    }

    var t = 0.0;
    var hit = false;
    for (var i = 0; i < max_steps; i++) {
        let d = sd_scene(origin + dir * t);
        if d < 0.0005 * max(t, 1.0) {
            hit = true;
            break;
        }
        t += d;
        if t > view_distance {
            break;
        }
    }

    let sky = mix(
        vec3<f32>(0.55, 0.65, 0.8),
        vec3<f32>(0.12, 0.16, 0.3),
        clamp(dir.y * 0.5 + 0.5, 0.0, 1.0),
    );
    var color = sky;
    if hit {
        let p = origin + dir * t;
        let n = normal_at(p);
        let light = normalize(vec3<f32>(0.4, 0.8, 0.3));
        let diffuse = max(dot(n, light), 0.0);
        let base = 0.5 + 0.5 * cos(vec3<f32>(0.0, 0.6, 1.2) + p.y * 0.05 + scene.resolution.z * 0.1);
        color = base * (0.2 + 0.8 * diffuse);
        let fog = clamp(t / view_distance, 0.0, 1.0);
        color = mix(color, sky, fog * fog);
    }

    color = (color - 0.5) * scene.grading.x + 0.5;
    let luma = dot(color, vec3<f32>(0.2126, 0.7152, 0.0722));
    color = mix(vec3<f32>(luma), color, scene.grading.y);
    color = clamp(color * scene.grading.z, vec3<f32>(0.0), vec3<f32>(1.0));
    return vec4<f32>(color, 1.0);
}
"#;

/// WGSL upscale pass: samples the scaled target across the whole surface.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var source: texture_2d<f32>;
@group(0) @binding(1)
var source_sampler: sampler;

struct BlitOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@location(0) position: vec2<f32>) -> BlitOutput {
    var out: BlitOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    out.uv = vec2<f32>(position.x * 0.5 + 0.5, 0.5 - position.y * 0.5);
    return out;
}

@fragment
fn fs_blit(in: BlitOutput) -> @location(0) vec4<f32> {
    return textureSample(source, source_sampler, in.uv);
}
"#;
