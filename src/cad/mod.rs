//! Collaborator seams: the solid-modelling kernel with its document graph, and the viewport
//! that turns a document into pixels.
//!
//! Both are consumed through traits with opaque handles. `MemoryCad` and `CpuViewport` are the
//! in-process implementations the binary runs with; `HeadlessViewport` stands in for a missing
//! display.

mod export;
mod memory;
mod viewport;

use std::path::Path;

use crate::foundation::core::{Axis, Resolution, Rgb, Vec3};
use crate::geometry::mesh::TriMesh;
use crate::geometry::{Annotation, Primitive};

pub use memory::MemoryCad;
pub use viewport::{CpuViewport, HeadlessViewport, IsoCamera};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub(crate) u32);

/// Neutral interchange format for [`CadService::export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Step,
    Obj,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Step => "step",
            Self::Obj => "obj",
        }
    }
}

/// Failure reported by a collaborator. Never fatal on its own; the driver decides.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("unknown {kind} handle #{id}")]
    UnknownHandle { kind: &'static str, id: u32 },

    #[error("{0:#}")]
    Failed(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(anyhow::anyhow!(msg.into()))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A solid object's world-space triangles and display color.
#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub name: String,
    pub mesh: TriMesh,
    pub color: Rgb,
}

/// Solid-modelling kernel plus document/scene-graph persistence.
///
/// Shapes are free-standing until attached to a document object. `rotate` and `translate`
/// edit a shape in place; the object placement is a separate translation on top of it.
pub trait CadService {
    fn create_document(&mut self, name: &str) -> ServiceResult<DocumentId>;

    fn add_shape(&mut self, primitive: Primitive) -> ServiceResult<ShapeId>;
    /// `base` minus `tool`, as a new shape.
    fn cut(&mut self, base: ShapeId, tool: ShapeId) -> ServiceResult<ShapeId>;
    fn rotate(&mut self, shape: ShapeId, origin: Vec3, axis: Axis, degrees: f64)
    -> ServiceResult<()>;
    fn translate(&mut self, shape: ShapeId, by: Vec3) -> ServiceResult<()>;

    fn add_object(&mut self, doc: DocumentId, name: &str, shape: ShapeId)
    -> ServiceResult<ObjectId>;
    fn set_placement(&mut self, object: ObjectId, position: Vec3) -> ServiceResult<()>;
    fn set_color(&mut self, object: ObjectId, color: Rgb) -> ServiceResult<()>;

    fn add_group(&mut self, doc: DocumentId, name: &str) -> ServiceResult<GroupId>;
    fn add_to_group(&mut self, group: GroupId, object: ObjectId) -> ServiceResult<()>;
    fn add_label(&mut self, doc: DocumentId, annotation: &Annotation) -> ServiceResult<ObjectId>;
    fn set_comment(&mut self, doc: DocumentId, text: &str) -> ServiceResult<()>;

    fn recompute(&mut self, doc: DocumentId) -> ServiceResult<()>;
    /// Persist the document in the kernel's native format.
    fn save(&self, doc: DocumentId, path: &Path) -> ServiceResult<()>;
    fn export(&self, objects: &[ObjectId], path: &Path, format: ExportFormat)
    -> ServiceResult<()>;

    /// Solid objects of a document in creation order (labels excluded).
    fn solids(&self, doc: DocumentId) -> ServiceResult<Vec<ObjectId>>;
    fn scene_mesh(&self, object: ObjectId) -> ServiceResult<SceneMesh>;
}

/// Interactive view of a document. Capture reads the live document state at call time.
pub trait Viewport {
    fn set_isometric_view(&mut self) -> ServiceResult<()>;
    fn fit_view(&mut self, cad: &dyn CadService, doc: DocumentId) -> ServiceResult<()>;
    fn capture_image(
        &mut self,
        cad: &dyn CadService,
        doc: DocumentId,
        path: &Path,
        resolution: Resolution,
    ) -> ServiceResult<()>;
}

/// Ensure the parent directory of `path` exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
