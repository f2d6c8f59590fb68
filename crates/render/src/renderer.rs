use flythrough_common::SceneConstants;
use flythrough_kernel::FrameOutput;
use glam::Vec3;

/// Pixel size of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Size of the offscreen target for a `base` output at `scale`:
/// each side is `floor(side * scale)`, but at least one pixel.
pub fn scaled_extent(base: Extent, scale: f32) -> Extent {
    let side = |v: u32| -> u32 {
        let scaled = (v as f32 * scale).floor();
        if scaled.is_finite() && scaled >= 1.0 {
            scaled as u32
        } else {
            1
        }
    };
    Extent {
        width: side(base.width),
        height: side(base.height),
    }
}

/// Per-frame shader inputs, independent of any GPU API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Size of the scaled target the scene is drawn into.
    pub resolution: Extent,
    pub scale: f32,
    pub time: f32,
    pub cam_position: Vec3,
    pub cam_forward: Vec3,
    pub cam_up: Vec3,
    pub scene: SceneConstants,
}

impl FrameUniforms {
    pub fn new(frame: &FrameOutput, scene: &SceneConstants, base: Extent) -> Self {
        Self {
            resolution: scaled_extent(base, frame.scale),
            scale: frame.scale,
            time: frame.elapsed_secs(),
            cam_position: frame.camera.position,
            cam_forward: frame.camera.forward,
            cam_up: frame.camera.up,
            scene: *scene,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given uniforms.
    fn render(&self, frame: &FrameUniforms) -> Self::Output;
}

/// Renders a frame as a human-readable line, for the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameUniforms) -> String {
        let p = frame.cam_position;
        let f = frame.cam_forward;
        let u = frame.cam_up;
        format!(
            "t={:.3}s {}x{} scale={:.2} pos=({:.2}, {:.2}, {:.2}) fwd=({:.2}, {:.2}, {:.2}) up=({:.2}, {:.2}, {:.2}) view={:.0}{}",
            frame.time,
            frame.resolution.width,
            frame.resolution.height,
            frame.scale,
            p.x,
            p.y,
            p.z,
            f.x,
            f.y,
            f.z,
            u.x,
            u.y,
            u.z,
            frame.scene.view_distance,
            if frame.scene.high_detail { " hd" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flythrough_kernel::FlightLoop;
    use std::time::Duration;

    #[test]
    fn full_scale_keeps_base() {
        let base = Extent::new(1280, 720);
        assert_eq!(scaled_extent(base, 1.0), base);
    }

    #[test]
    fn scaled_extent_floors() {
        let e = scaled_extent(Extent::new(1280, 721), 0.5);
        assert_eq!(e, Extent::new(640, 360));
        let e = scaled_extent(Extent::new(1000, 999), 0.97);
        assert_eq!(e, Extent::new(970, 969));
    }

    #[test]
    fn scaled_extent_never_zero() {
        assert_eq!(scaled_extent(Extent::new(3, 3), 0.1), Extent::new(1, 1));
        assert_eq!(scaled_extent(Extent::new(0, 0), 1.0), Extent::new(1, 1));
        assert_eq!(scaled_extent(Extent::new(800, 600), f32::NAN), Extent::new(1, 1));
    }

    #[test]
    fn aspect_of_degenerate_height() {
        assert_eq!(Extent::new(10, 0).aspect(), 10.0);
        assert_eq!(Extent::new(1920, 1080).aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn uniforms_follow_frame() {
        let mut flight = FlightLoop::default();
        flight.tick(Duration::from_millis(0));
        let frame = flight.tick(Duration::from_millis(250));
        let uniforms = FrameUniforms::new(&frame, flight.scene(), Extent::new(1920, 1080));

        assert_eq!(uniforms.resolution, scaled_extent(Extent::new(1920, 1080), frame.scale));
        assert!((uniforms.time - 0.25).abs() < 1e-6);
        assert_eq!(uniforms.cam_forward, Vec3::NEG_Z);
        assert_eq!(uniforms.scene, *flight.scene());
    }

    #[test]
    fn debug_renderer_output() {
        let mut flight = FlightLoop::default();
        let frame = flight.tick(Duration::ZERO);
        let uniforms = FrameUniforms::new(&frame, flight.scene(), Extent::new(800, 600));
        let out = DebugTextRenderer::new().render(&uniforms);

        assert!(out.contains("800x600"));
        assert!(out.contains("scale=1.00"));
        assert!(out.contains("-1.00) up=("));
        assert!(out.contains("view=700"));
        assert!(!out.contains(" hd"));
    }
}
