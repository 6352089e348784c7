//! Wavefront OBJ export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::mesh::{IndexedMesh, VertexBuffer};

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `mesh` as OBJ text with positions, normals and 1-based faces.
pub fn write_obj<W: Write>(mesh: &IndexedMesh, mut writer: W) -> Result<(), ObjExportError> {
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;

    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in mesh.normals() {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes `mesh` to an OBJ file at `path`, creating parent directories.
pub fn export_mesh_obj(mesh: &IndexedMesh, path: &Path) -> Result<(), ObjExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_obj(mesh, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxMesh;
    use tempfile::tempdir;

    #[test]
    fn test_obj_line_counts() {
        let mesh = BoxMesh::new(2.0, 2).build();
        let mut out = Vec::new();
        write_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), mesh.vertex_count());
        assert_eq!(count("vn "), mesh.vertex_count());
        assert_eq!(count("f "), mesh.triangle_count());
    }

    #[test]
    fn test_faces_are_one_based() {
        let mesh = IndexedMesh::new(
            vec![glam::Vec3::X, glam::Vec3::Y, glam::Vec3::Z],
            vec![0, 1, 2],
        )
        .unwrap();
        let mut out = Vec::new();
        write_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("f 1//1 2//2 3//3"));
    }

    #[test]
    fn test_export_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("planet.obj");
        export_mesh_obj(&BoxMesh::new(1.0, 1).build(), &path).unwrap();
        assert!(path.exists());
    }
}
