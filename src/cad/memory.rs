use std::path::Path;

use anyhow::Context as _;
use glam::DQuat;

use crate::foundation::core::{Axis, Rgb, Vec3};
use crate::geometry::mesh::{self, DEFAULT_SEGMENTS, TriMesh};
use crate::geometry::{Annotation, Primitive, Solid};

use super::{
    CadService, DocumentId, ExportFormat, GroupId, ObjectId, SceneMesh, ServiceError,
    ServiceResult, ShapeId, ensure_parent_dir, export,
};

#[derive(Clone, Debug)]
struct ShapeRecord {
    solid: Solid,
    rotation: DQuat,
    translation: Vec3,
}

impl ShapeRecord {
    fn is_untransformed(&self) -> bool {
        self.rotation == DQuat::IDENTITY && self.translation == Vec3::ZERO
    }

    fn mesh(&self, segments: u32) -> TriMesh {
        let mut m = mesh::tessellate(&self.solid, segments);
        let (q, t) = (self.rotation, self.translation);
        m.map_positions(|p| q * p + t);
        m
    }
}

#[derive(Clone, Debug)]
enum Content {
    Solid(ShapeId),
    Label(Annotation),
}

#[derive(Clone, Debug)]
struct ObjectRecord {
    doc: DocumentId,
    name: String,
    content: Content,
    placement: Vec3,
    color: Rgb,
    group: Option<GroupId>,
}

#[derive(Clone, Debug)]
struct GroupRecord {
    doc: DocumentId,
    name: String,
    members: Vec<ObjectId>,
}

#[derive(Clone, Debug)]
struct DocumentRecord {
    name: String,
    comment: String,
    objects: Vec<ObjectId>,
    groups: Vec<GroupId>,
    recomputes: u32,
}

/// In-process kernel: an arena of shapes, objects and groups per document.
///
/// Saves as JSON, exports tessellated solids as STEP (faceted B-rep) or OBJ.
#[derive(Clone, Debug)]
pub struct MemoryCad {
    documents: Vec<DocumentRecord>,
    shapes: Vec<ShapeRecord>,
    objects: Vec<ObjectRecord>,
    groups: Vec<GroupRecord>,
    segments: u32,
    label_support: bool,
}

impl Default for MemoryCad {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCad {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            shapes: Vec::new(),
            objects: Vec::new(),
            groups: Vec::new(),
            segments: DEFAULT_SEGMENTS,
            label_support: true,
        }
    }

    /// Circle subdivision used for tessellation.
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments.max(3);
        self
    }

    /// A kernel without the drafting workbench: every `add_label` fails.
    pub fn without_labels(mut self) -> Self {
        self.label_support = false;
        self
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document_name(&self, doc: DocumentId) -> ServiceResult<&str> {
        Ok(&self.document(doc)?.name)
    }

    pub fn comment(&self, doc: DocumentId) -> ServiceResult<&str> {
        Ok(&self.document(doc)?.comment)
    }

    pub fn recompute_count(&self, doc: DocumentId) -> ServiceResult<u32> {
        Ok(self.document(doc)?.recomputes)
    }

    pub fn object_name(&self, object: ObjectId) -> ServiceResult<&str> {
        Ok(&self.object(object)?.name)
    }

    pub fn placement(&self, object: ObjectId) -> ServiceResult<Vec3> {
        Ok(self.object(object)?.placement)
    }

    pub fn color(&self, object: ObjectId) -> ServiceResult<Rgb> {
        Ok(self.object(object)?.color)
    }

    pub fn find_object(&self, doc: DocumentId, name: &str) -> ServiceResult<ObjectId> {
        self.document(doc)?
            .objects
            .iter()
            .copied()
            .find(|id| self.objects[id.0 as usize].name == name)
            .ok_or_else(|| ServiceError::failed(format!("no object named '{name}'")))
    }

    /// Labels of a document in creation order.
    pub fn labels(&self, doc: DocumentId) -> ServiceResult<Vec<&Annotation>> {
        Ok(self
            .document(doc)?
            .objects
            .iter()
            .filter_map(|id| match &self.objects[id.0 as usize].content {
                Content::Label(a) => Some(a),
                Content::Solid(_) => None,
            })
            .collect())
    }

    /// `(group name, member object names)` in creation order.
    pub fn groups(&self, doc: DocumentId) -> ServiceResult<Vec<(String, Vec<String>)>> {
        Ok(self
            .document(doc)?
            .groups
            .iter()
            .map(|g| {
                let g = &self.groups[g.0 as usize];
                let members = g
                    .members
                    .iter()
                    .map(|m| self.objects[m.0 as usize].name.clone())
                    .collect();
                (g.name.clone(), members)
            })
            .collect())
    }

    fn document(&self, doc: DocumentId) -> ServiceResult<&DocumentRecord> {
        self.documents
            .get(doc.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "document",
                id: doc.0,
            })
    }

    fn shape(&self, shape: ShapeId) -> ServiceResult<&ShapeRecord> {
        self.shapes
            .get(shape.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "shape",
                id: shape.0,
            })
    }

    fn shape_mut(&mut self, shape: ShapeId) -> ServiceResult<&mut ShapeRecord> {
        self.shapes
            .get_mut(shape.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "shape",
                id: shape.0,
            })
    }

    fn object(&self, object: ObjectId) -> ServiceResult<&ObjectRecord> {
        self.objects
            .get(object.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "object",
                id: object.0,
            })
    }

    fn object_mut(&mut self, object: ObjectId) -> ServiceResult<&mut ObjectRecord> {
        self.objects
            .get_mut(object.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "object",
                id: object.0,
            })
    }

    fn push_object(&mut self, record: ObjectRecord) -> ServiceResult<ObjectId> {
        let doc = record.doc;
        let taken = self
            .document(doc)?
            .objects
            .iter()
            .any(|id| self.objects[id.0 as usize].name == record.name);
        if taken {
            return Err(ServiceError::failed(format!(
                "object name '{}' already used in document",
                record.name
            )));
        }
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(record);
        self.documents[doc.0 as usize].objects.push(id);
        Ok(id)
    }

    fn snapshot(&self, doc: DocumentId) -> ServiceResult<DocumentSnapshot> {
        let record = self.document(doc)?;
        let mut objects = Vec::with_capacity(record.objects.len());
        for id in &record.objects {
            let o = &self.objects[id.0 as usize];
            let group = o.group.map(|g| self.groups[g.0 as usize].name.clone());
            let body = match &o.content {
                Content::Solid(s) => {
                    let shape = self.shape(*s)?;
                    SnapshotBody::Solid {
                        solid: shape.solid.clone(),
                        rotation: shape.rotation.to_array(),
                        translation: shape.translation,
                    }
                }
                Content::Label(a) => SnapshotBody::Label {
                    annotation: a.clone(),
                },
            };
            objects.push(SnapshotObject {
                name: o.name.clone(),
                placement: o.placement,
                color: o.color,
                group,
                body,
            });
        }
        Ok(DocumentSnapshot {
            name: record.name.clone(),
            comment: record.comment.clone(),
            groups: record
                .groups
                .iter()
                .map(|g| self.groups[g.0 as usize].name.clone())
                .collect(),
            objects,
        })
    }
}

#[derive(serde::Serialize)]
struct DocumentSnapshot {
    name: String,
    comment: String,
    groups: Vec<String>,
    objects: Vec<SnapshotObject>,
}

#[derive(serde::Serialize)]
struct SnapshotObject {
    name: String,
    placement: Vec3,
    color: Rgb,
    group: Option<String>,
    #[serde(flatten)]
    body: SnapshotBody,
}

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SnapshotBody {
    Solid {
        solid: Solid,
        rotation: [f64; 4],
        translation: Vec3,
    },
    Label {
        annotation: Annotation,
    },
}

impl CadService for MemoryCad {
    fn create_document(&mut self, name: &str) -> ServiceResult<DocumentId> {
        let id = DocumentId(self.documents.len() as u32);
        self.documents.push(DocumentRecord {
            name: name.to_string(),
            comment: String::new(),
            objects: Vec::new(),
            groups: Vec::new(),
            recomputes: 0,
        });
        Ok(id)
    }

    fn add_shape(&mut self, primitive: Primitive) -> ServiceResult<ShapeId> {
        let bad = primitive
            .dimensions()
            .into_iter()
            .any(|v| !v.is_finite() || v <= 0.0);
        if bad {
            return Err(ServiceError::failed(format!(
                "{} needs positive dimensions, got {:?}",
                primitive.kind_name(),
                primitive.dimensions()
            )));
        }
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(ShapeRecord {
            solid: Solid::Primitive(primitive),
            rotation: DQuat::IDENTITY,
            translation: Vec3::ZERO,
        });
        Ok(id)
    }

    fn cut(&mut self, base: ShapeId, tool: ShapeId) -> ServiceResult<ShapeId> {
        let (b, t) = (self.shape(base)?, self.shape(tool)?);
        if !b.is_untransformed() || !t.is_untransformed() {
            return Err(ServiceError::Unsupported(
                "boolean cut of transformed shapes".to_string(),
            ));
        }
        let solid = b.solid.clone().cut(t.solid.clone());
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(ShapeRecord {
            solid,
            rotation: DQuat::IDENTITY,
            translation: Vec3::ZERO,
        });
        Ok(id)
    }

    fn rotate(
        &mut self,
        shape: ShapeId,
        origin: Vec3,
        axis: Axis,
        degrees: f64,
    ) -> ServiceResult<()> {
        let q = mesh::rotation(axis, degrees);
        let s = self.shape_mut(shape)?;
        s.rotation = q * s.rotation;
        s.translation = origin + q * (s.translation - origin);
        Ok(())
    }

    fn translate(&mut self, shape: ShapeId, by: Vec3) -> ServiceResult<()> {
        self.shape_mut(shape)?.translation += by;
        Ok(())
    }

    fn add_object(
        &mut self,
        doc: DocumentId,
        name: &str,
        shape: ShapeId,
    ) -> ServiceResult<ObjectId> {
        self.shape(shape)?;
        self.push_object(ObjectRecord {
            doc,
            name: name.to_string(),
            content: Content::Solid(shape),
            placement: Vec3::ZERO,
            color: Rgb::new(0.8, 0.8, 0.8),
            group: None,
        })
    }

    fn set_placement(&mut self, object: ObjectId, position: Vec3) -> ServiceResult<()> {
        self.object_mut(object)?.placement = position;
        Ok(())
    }

    fn set_color(&mut self, object: ObjectId, color: Rgb) -> ServiceResult<()> {
        self.object_mut(object)?.color = color;
        Ok(())
    }

    fn add_group(&mut self, doc: DocumentId, name: &str) -> ServiceResult<GroupId> {
        self.document(doc)?;
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(GroupRecord {
            doc,
            name: name.to_string(),
            members: Vec::new(),
        });
        self.documents[doc.0 as usize].groups.push(id);
        Ok(id)
    }

    fn add_to_group(&mut self, group: GroupId, object: ObjectId) -> ServiceResult<()> {
        let group_doc = self
            .groups
            .get(group.0 as usize)
            .ok_or(ServiceError::UnknownHandle {
                kind: "group",
                id: group.0,
            })?
            .doc;
        let (object_doc, previous) = {
            let o = self.object(object)?;
            (o.doc, o.group)
        };
        if group_doc != object_doc {
            return Err(ServiceError::failed(
                "group and object belong to different documents",
            ));
        }
        if let Some(previous) = previous {
            self.groups[previous.0 as usize]
                .members
                .retain(|m| *m != object);
        }
        self.groups[group.0 as usize].members.push(object);
        self.objects[object.0 as usize].group = Some(group);
        Ok(())
    }

    fn add_label(&mut self, doc: DocumentId, annotation: &Annotation) -> ServiceResult<ObjectId> {
        if !self.label_support {
            return Err(ServiceError::Unsupported(
                "text labels are not available in this kernel".to_string(),
            ));
        }
        let n = self.labels(doc)?.len();
        self.push_object(ObjectRecord {
            doc,
            name: format!("label_{:02}", n + 1),
            content: Content::Label(annotation.clone()),
            placement: annotation.position,
            color: annotation.color,
            group: None,
        })
    }

    fn set_comment(&mut self, doc: DocumentId, text: &str) -> ServiceResult<()> {
        self.document(doc)?;
        self.documents[doc.0 as usize].comment = text.to_string();
        Ok(())
    }

    fn recompute(&mut self, doc: DocumentId) -> ServiceResult<()> {
        for id in &self.document(doc)?.objects {
            let o = &self.objects[id.0 as usize];
            if let Content::Solid(s) = o.content
                && self.shape(s)?.mesh(self.segments).is_empty()
            {
                return Err(ServiceError::failed(format!(
                    "object '{}' has an empty shape",
                    o.name
                )));
            }
        }
        self.documents[doc.0 as usize].recomputes += 1;
        Ok(())
    }

    fn save(&self, doc: DocumentId, path: &Path) -> ServiceResult<()> {
        let snapshot = self.snapshot(doc)?;
        ensure_parent_dir(path)?;
        let json = serde_json::to_vec_pretty(&snapshot).context("serialize document")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write document '{}'", path.display()))?;
        Ok(())
    }

    fn export(
        &self,
        objects: &[ObjectId],
        path: &Path,
        format: ExportFormat,
    ) -> ServiceResult<()> {
        let meshes = objects
            .iter()
            .map(|id| self.scene_mesh(*id))
            .collect::<ServiceResult<Vec<_>>>()?;
        ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create export '{}'", path.display()))?;
        let mut out = std::io::BufWriter::new(file);
        match format {
            ExportFormat::Step => export::write_step(&mut out, &meshes, path),
            ExportFormat::Obj => export::write_obj(&mut out, &meshes),
        }
        .with_context(|| format!("failed to write export '{}'", path.display()))?;
        Ok(())
    }

    fn solids(&self, doc: DocumentId) -> ServiceResult<Vec<ObjectId>> {
        Ok(self
            .document(doc)?
            .objects
            .iter()
            .copied()
            .filter(|id| matches!(self.objects[id.0 as usize].content, Content::Solid(_)))
            .collect())
    }

    fn scene_mesh(&self, object: ObjectId) -> ServiceResult<SceneMesh> {
        let o = self.object(object)?;
        let Content::Solid(shape) = o.content else {
            return Err(ServiceError::Unsupported(format!(
                "'{}' is a label, not a solid",
                o.name
            )));
        };
        let mut mesh = self.shape(shape)?.mesh(self.segments);
        let offset = o.placement;
        mesh.map_positions(|p| p + offset);
        Ok(SceneMesh {
            name: o.name.clone(),
            mesh,
            color: o.color,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cad/memory.rs"]
mod tests;
