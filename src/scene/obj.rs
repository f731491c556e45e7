//! Wavefront OBJ import.

use std::io::BufRead;
use std::path::Path;

use super::Module;
use crate::error::RenderError;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::primitives::Polygon;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        ..Default::default()
    }
}

impl Module {
    /// Append every face of an OBJ file as a polygon, with vertex normals
    /// when the file provides them. Materials are ignored.
    pub fn load_obj<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self, RenderError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &load_options())?;
        log::debug!("loaded {} object(s) from {}", models.len(), path.display());
        self.append_models(&models);
        Ok(self)
    }

    /// Like [`Module::load_obj`], reading OBJ text from `reader`.
    /// `mtllib` references are not followed.
    pub fn load_obj_from_reader<R: BufRead>(
        &mut self,
        reader: &mut R,
    ) -> Result<&mut Self, RenderError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        self.append_models(&models);
        Ok(self)
    }

    fn append_models(&mut self, models: &[tobj::Model]) {
        for model in models {
            let mesh = &model.mesh;
            let position = |i: u32| {
                let i = i as usize * 3;
                Vec4::point(
                    mesh.positions[i],
                    mesh.positions[i + 1],
                    mesh.positions[i + 2],
                )
            };
            let has_normals =
                !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len();
            let normal = |i: u32| {
                let i = i as usize * 3;
                Vec3::new(mesh.normals[i], mesh.normals[i + 1], mesh.normals[i + 2])
            };

            // no arities means every face is a triangle
            let arities: Vec<usize> = if mesh.face_arities.is_empty() {
                vec![3; mesh.indices.len() / 3]
            } else {
                mesh.face_arities.iter().map(|&n| n as usize).collect()
            };

            let mut start = 0;
            let mut faces = 0;
            for arity in arities {
                let Some(face) = mesh.indices.get(start..start + arity) else {
                    log::warn!("{}: face index list is truncated", model.name);
                    break;
                };
                start += arity;

                let mut polygon = Polygon::new(face.iter().map(|&i| position(i)).collect());
                if has_normals {
                    let normals = face.iter().map(|&i| normal(i)).collect();
                    if let Err(err) = polygon.set_normals(normals) {
                        log::warn!("{}: {}", model.name, err);
                    }
                }
                self.polygon(polygon);
                faces += 1;
            }
            log::trace!("{}: appended {} faces", model.name, faces);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const QUAD_AND_TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
f 1//1 2//1 3//1
";

    #[test]
    fn test_load_faces_with_normals() {
        let mut module = Module::new();
        module
            .load_obj_from_reader(&mut Cursor::new(QUAD_AND_TRIANGLE))
            .unwrap();

        let polygons: Vec<&Polygon> = module
            .elements()
            .iter()
            .filter_map(|e| match e {
                Element::Polygon(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 4);
        assert_eq!(polygons[1].len(), 3);

        assert_eq!(polygons[0].vertices()[2], Vec4::point(1.0, 1.0, 0.0));
        let normals = polygons[0].normals().unwrap();
        assert_relative_eq!(normals[3].z, 1.0);
    }

    #[test]
    fn test_load_without_normals() {
        let mut module = Module::new();
        module
            .load_obj_from_reader(&mut Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"))
            .unwrap();
        assert_eq!(module.len(), 1);
        let Element::Polygon(triangle) = &module.elements()[0] else {
            panic!("expected a polygon");
        };
        assert!(triangle.normals().is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut module = Module::new();
        let result = module.load_obj("does/not/exist.obj");
        assert!(matches!(result, Err(RenderError::Obj(_))));
    }
}
