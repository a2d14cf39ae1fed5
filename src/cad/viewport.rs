use std::path::Path;

use anyhow::Context as _;
use kurbo::{BezPath, Point, Rect};

use crate::foundation::core::{Resolution, Rgb, Vec3};

use super::{CadService, DocumentId, ServiceError, ServiceResult, Viewport, ensure_parent_dir};

const BACKGROUND: [u8; 4] = [18, 20, 28, 255];
/// Share of the frame the fitted scene may occupy.
const FIT_FILL: f64 = 0.9;
const AMBIENT: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Projection {
    /// Looking along +Y, Z up.
    Front,
    /// Camera on the (1, 1, 1) diagonal, Z up.
    Isometric,
}

impl Projection {
    /// `(right, up, toward viewer)` unit vectors.
    fn basis(self) -> (Vec3, Vec3, Vec3) {
        match self {
            Self::Front => (Vec3::X, Vec3::Z, Vec3::NEG_Y),
            Self::Isometric => (
                Vec3::new(-1.0, 1.0, 0.0).normalize(),
                Vec3::new(-1.0, -1.0, 2.0).normalize(),
                Vec3::ONE.normalize(),
            ),
        }
    }

    fn project(self, p: Vec3) -> Point {
        let (r, u, _) = self.basis();
        Point::new(p.dot(r), p.dot(u))
    }
}

/// Fitted view: projected-plane rectangle the frame is centred on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoCamera {
    pub view: Rect,
}

impl IsoCamera {
    fn to_pixels(self, p: Point, w: f64, h: f64) -> Point {
        let scale = (w * FIT_FILL / self.view.width().max(1e-9))
            .min(h * FIT_FILL / self.view.height().max(1e-9));
        let c = self.view.center();
        Point::new(w / 2.0 + (p.x - c.x) * scale, h / 2.0 - (p.y - c.y) * scale)
    }
}

/// Software viewport: flat-shaded painter's-order rasterization through `vello_cpu`.
#[derive(Clone, Debug)]
pub struct CpuViewport {
    projection: Projection,
    camera: Option<IsoCamera>,
    light: Vec3,
}

impl Default for CpuViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuViewport {
    pub fn new() -> Self {
        Self {
            projection: Projection::Front,
            camera: None,
            light: Vec3::new(0.4, 0.2, 1.0).normalize(),
        }
    }

    pub fn camera(&self) -> Option<IsoCamera> {
        self.camera
    }

    fn scene_bounds(&self, cad: &dyn CadService, doc: DocumentId) -> ServiceResult<Option<Rect>> {
        let mut bounds: Option<Rect> = None;
        for id in cad.solids(doc)? {
            for p in &cad.scene_mesh(id)?.mesh.positions {
                let q = self.projection.project(*p);
                bounds = Some(match bounds {
                    Some(b) => b.union_pt(q),
                    None => Rect::from_points(q, q),
                });
            }
        }
        Ok(bounds)
    }
}

struct Facet {
    depth: f64,
    path: BezPath,
    color: Rgb,
}

impl Viewport for CpuViewport {
    fn set_isometric_view(&mut self) -> ServiceResult<()> {
        self.projection = Projection::Isometric;
        self.camera = None;
        Ok(())
    }

    fn fit_view(&mut self, cad: &dyn CadService, doc: DocumentId) -> ServiceResult<()> {
        if let Some(view) = self.scene_bounds(cad, doc)? {
            self.camera = Some(IsoCamera { view });
        }
        Ok(())
    }

    fn capture_image(
        &mut self,
        cad: &dyn CadService,
        doc: DocumentId,
        path: &Path,
        resolution: Resolution,
    ) -> ServiceResult<()> {
        let (Ok(width), Ok(height)) = (
            u16::try_from(resolution.width),
            u16::try_from(resolution.height),
        ) else {
            return Err(ServiceError::Unsupported(format!(
                "capture size {}x{} exceeds the rasterizer limit",
                resolution.width, resolution.height
            )));
        };
        if self.camera.is_none() {
            self.fit_view(cad, doc)?;
        }
        let camera = self.camera.unwrap_or(IsoCamera {
            view: Rect::new(-1.0, -1.0, 1.0, 1.0),
        });
        let (_, _, toward) = self.projection.basis();
        let (w, h) = (f64::from(width), f64::from(height));

        let mut facets = Vec::new();
        for id in cad.solids(doc)? {
            let scene = cad.scene_mesh(id)?;
            for t in &scene.mesh.triangles {
                let n = scene.mesh.face_normal(*t);
                let facing = n.dot(toward);
                if facing <= 0.0 {
                    continue;
                }
                let tri = scene.mesh.triangle(*t);
                let shade = AMBIENT + (1.0 - AMBIENT) * n.normalize().dot(self.light).abs();
                let mut path = BezPath::new();
                for (i, p) in tri.iter().enumerate() {
                    let q = camera.to_pixels(self.projection.project(*p), w, h);
                    if i == 0 {
                        path.move_to(q);
                    } else {
                        path.line_to(q);
                    }
                }
                path.close_path();
                facets.push(Facet {
                    depth: (tri[0] + tri[1] + tri[2]).dot(toward) / 3.0,
                    path,
                    color: scene.color.scaled(shade),
                });
            }
        }
        // Farthest first.
        facets.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let [r, g, b, a] = BACKGROUND;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        for f in &facets {
            let [r, g, b, a] = f.color.to_rgba8();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_path(&bezpath_to_cpu(&f.path));
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        // Opaque background, so the premultiplied buffer is already straight RGBA.
        ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            pixmap.data_as_u8_slice(),
            u32::from(width),
            u32::from(height),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Viewport of a run without a display: every call reports the service as unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessViewport;

impl HeadlessViewport {
    fn unavailable<T>() -> ServiceResult<T> {
        Err(ServiceError::Unavailable("no display attached".to_string()))
    }
}

impl Viewport for HeadlessViewport {
    fn set_isometric_view(&mut self) -> ServiceResult<()> {
        Self::unavailable()
    }

    fn fit_view(&mut self, _cad: &dyn CadService, _doc: DocumentId) -> ServiceResult<()> {
        Self::unavailable()
    }

    fn capture_image(
        &mut self,
        _cad: &dyn CadService,
        _doc: DocumentId,
        _path: &Path,
        _resolution: Resolution,
    ) -> ServiceResult<()> {
        Self::unavailable()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cad/viewport.rs"]
mod tests;
