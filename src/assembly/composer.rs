use std::collections::BTreeMap;

use crate::cad::{CadService, DocumentId, GroupId, ObjectId, ServiceResult, ShapeId};
use crate::foundation::core::Vec3;
use crate::geometry::{Part, Solid};

use super::{Assembly, PartGroup};

/// Handles of an assembly living in a document.
#[derive(Clone, Debug)]
pub struct ComposedAssembly {
    pub document: DocumentId,
    /// Solid objects in catalog order, paired with their part names.
    pub objects: Vec<(String, ObjectId)>,
    pub moving: ObjectId,
    pub groups: BTreeMap<PartGroup, GroupId>,
    pub labels_created: usize,
    pub labels_failed: usize,
}

impl ComposedAssembly {
    pub fn object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|(_, id)| *id).collect()
    }
}

fn realize_solid(cad: &mut dyn CadService, solid: &Solid) -> ServiceResult<ShapeId> {
    match solid {
        Solid::Primitive(p) => cad.add_shape(*p),
        Solid::Cut { base, tool } => {
            let base = realize_solid(cad, base)?;
            let tool = realize_solid(cad, tool)?;
            cad.cut(base, tool)
        }
    }
}

/// Booleans first, then the part rotation about the origin, then the offset.
fn realize_part(cad: &mut dyn CadService, part: &Part) -> ServiceResult<ShapeId> {
    let shape = realize_solid(cad, &part.solid)?;
    if let Some(r) = part.rotation {
        cad.rotate(shape, Vec3::ZERO, r.axis, r.degrees)?;
    }
    if part.offset != Vec3::ZERO {
        cad.translate(shape, part.offset)?;
    }
    Ok(shape)
}

/// Push an assembly into a fresh document.
///
/// Object names are the catalog's part names, so identical parameters always give identical
/// documents. Label failures are counted, not returned.
#[tracing::instrument(skip(cad, assembly), fields(parts = assembly.parts().len()))]
pub fn compose(
    cad: &mut dyn CadService,
    assembly: &Assembly,
    document_name: &str,
) -> ServiceResult<ComposedAssembly> {
    let document = cad.create_document(document_name)?;

    let mut groups = BTreeMap::new();
    for g in PartGroup::ALL {
        groups.insert(g, cad.add_group(document, g.label())?);
    }

    let mut objects = Vec::with_capacity(assembly.parts().len());
    for part in assembly.parts() {
        let shape = realize_part(cad, part)?;
        let object = cad.add_object(document, &part.name, shape)?;
        cad.set_color(object, part.color)?;
        if let Some(group) = groups.get(&part.group) {
            cad.add_to_group(*group, object)?;
        }
        objects.push((part.name.clone(), object));
    }

    let moving_body = &assembly.catalog.moving;
    let moving = objects
        .iter()
        .find(|(n, _)| *n == moving_body.part)
        .map(|(_, id)| *id)
        .ok_or_else(|| {
            crate::cad::ServiceError::failed(format!(
                "moving part '{}' was not created",
                moving_body.part
            ))
        })?;
    cad.set_placement(moving, moving_body.placement(moving_body.rest))?;

    let mut labels_created = 0;
    let mut labels_failed = 0;
    for a in &assembly.catalog.annotations {
        match cad.add_label(document, a) {
            Ok(_) => labels_created += 1,
            Err(err) => {
                labels_failed += 1;
                tracing::warn!(text = %a.text.replace('\n', " | "), "label not created: {err}");
            }
        }
    }

    cad.set_comment(document, &assembly.info.comment())?;

    tracing::info!(
        objects = objects.len(),
        labels_created,
        labels_failed,
        "assembly composed"
    );
    Ok(ComposedAssembly {
        document,
        objects,
        moving,
        groups,
        labels_created,
        labels_failed,
    })
}
