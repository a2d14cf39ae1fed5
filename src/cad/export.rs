//! Interchange writers for tessellated solids.

use std::io::{self, Write};
use std::path::Path;

use super::SceneMesh;

/// ISO 10303-21 entity list, one faceted B-rep per solid.
struct StepWriter {
    entity_id: usize,
    entities: Vec<String>,
}

impl StepWriter {
    fn new() -> Self {
        Self {
            entity_id: 0,
            entities: Vec::new(),
        }
    }

    fn next_id(&mut self) -> usize {
        self.entity_id += 1;
        self.entity_id
    }

    fn push(&mut self, body: String) -> usize {
        let id = self.next_id();
        self.entities.push(format!("#{id} = {body};"));
        id
    }

    fn add_solid(&mut self, solid: &SceneMesh) {
        let points: Vec<usize> = solid
            .mesh
            .positions
            .iter()
            .map(|p| self.push(format!("CARTESIAN_POINT('', ({:.6}, {:.6}, {:.6}))", p.x, p.y, p.z)))
            .collect();

        let mut faces = Vec::with_capacity(solid.mesh.triangles.len());
        for [a, b, c] in &solid.mesh.triangles {
            let lp = self.push(format!(
                "POLY_LOOP('', (#{}, #{}, #{}))",
                points[*a as usize], points[*b as usize], points[*c as usize]
            ));
            let bound = self.push(format!("FACE_OUTER_BOUND('', #{lp}, .T.)"));
            faces.push(self.push(format!("FACE('', (#{bound}))")));
        }

        let list = faces
            .iter()
            .map(|id| format!("#{id}"))
            .collect::<Vec<_>>()
            .join(", ");
        let shell = self.push(format!("CLOSED_SHELL('', ({list}))"));
        self.push(format!(
            "FACETED_BREP('{}', #{shell})",
            escape_step(&solid.name)
        ));
    }

    fn write<W: Write>(&self, out: &mut W, file_name: &str) -> io::Result<()> {
        writeln!(out, "ISO-10303-21;")?;
        writeln!(out, "HEADER;")?;
        writeln!(
            out,
            "FILE_DESCRIPTION(('billetline faceted export'), '2;1');"
        )?;
        writeln!(
            out,
            "FILE_NAME('{}', '', (''), (''), 'billetline', '', '');",
            escape_step(file_name)
        )?;
        writeln!(out, "FILE_SCHEMA(('AUTOMOTIVE_DESIGN'));")?;
        writeln!(out, "ENDSEC;")?;
        writeln!(out, "DATA;")?;
        for entity in &self.entities {
            writeln!(out, "{entity}")?;
        }
        writeln!(out, "ENDSEC;")?;
        writeln!(out, "END-ISO-10303-21;")?;
        out.flush()
    }
}

fn escape_step(s: &str) -> String {
    s.replace('\'', "''")
}

pub(super) fn write_step<W: Write>(out: &mut W, solids: &[SceneMesh], path: &Path) -> io::Result<()> {
    let mut w = StepWriter::new();
    for solid in solids {
        w.add_solid(solid);
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    w.write(out, &file_name)
}

pub(super) fn write_obj<W: Write>(out: &mut W, solids: &[SceneMesh]) -> io::Result<()> {
    writeln!(out, "# billetline export")?;
    let mut base = 1usize;
    for solid in solids {
        let c = solid.color;
        writeln!(out, "o {}", solid.name)?;
        writeln!(out, "# color {:.3} {:.3} {:.3}", c.r, c.g, c.b)?;
        for p in &solid.mesh.positions {
            writeln!(out, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
        }
        for [a, b, c] in &solid.mesh.triangles {
            writeln!(
                out,
                "f {} {} {}",
                base + *a as usize,
                base + *b as usize,
                base + *c as usize
            )?;
        }
        base += solid.mesh.positions.len();
    }
    out.flush()
}
