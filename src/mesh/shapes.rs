//! Canonical solids used to seed Boolean operations and tests.

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use crate::traits::CSG;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// An axis-aligned cube spanning `[0, width]³`.
    pub fn cube(width: Real, metadata: Option<S>) -> Mesh<S> {
        Self::cuboid(width, width, width, metadata)
    }

    /// An axis-aligned rectangular prism spanning
    /// `[0, width] × [0, length] × [0, height]`.
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        // Define the eight corner points of the prism.
        let p000 = Point3::new(0.0, 0.0, 0.0);
        let p100 = Point3::new(width, 0.0, 0.0);
        let p110 = Point3::new(width, length, 0.0);
        let p010 = Point3::new(0.0, length, 0.0);

        let p001 = Point3::new(0.0, 0.0, height);
        let p101 = Point3::new(width, 0.0, height);
        let p111 = Point3::new(width, length, height);
        let p011 = Point3::new(0.0, length, height);

        // Six faces, wound counter-clockwise as viewed from outside the prism
        // so all normals point outward.

        // Bottom face (z=0, normal -Z)
        let bottom_normal = -Vector3::z();
        let bottom = Polygon::new(
            vec![
                Vertex::new(p000, bottom_normal),
                Vertex::new(p010, bottom_normal),
                Vertex::new(p110, bottom_normal),
                Vertex::new(p100, bottom_normal),
            ],
            metadata.clone(),
        );

        // Top face (z=height, normal +Z)
        let top_normal = Vector3::z();
        let top = Polygon::new(
            vec![
                Vertex::new(p001, top_normal),
                Vertex::new(p101, top_normal),
                Vertex::new(p111, top_normal),
                Vertex::new(p011, top_normal),
            ],
            metadata.clone(),
        );

        // Front face (y=0, normal -Y)
        let front_normal = -Vector3::y();
        let front = Polygon::new(
            vec![
                Vertex::new(p000, front_normal),
                Vertex::new(p100, front_normal),
                Vertex::new(p101, front_normal),
                Vertex::new(p001, front_normal),
            ],
            metadata.clone(),
        );

        // Back face (y=length, normal +Y)
        let back_normal = Vector3::y();
        let back = Polygon::new(
            vec![
                Vertex::new(p010, back_normal),
                Vertex::new(p011, back_normal),
                Vertex::new(p111, back_normal),
                Vertex::new(p110, back_normal),
            ],
            metadata.clone(),
        );

        // Left face (x=0, normal -X)
        let left_normal = -Vector3::x();
        let left = Polygon::new(
            vec![
                Vertex::new(p000, left_normal),
                Vertex::new(p001, left_normal),
                Vertex::new(p011, left_normal),
                Vertex::new(p010, left_normal),
            ],
            metadata.clone(),
        );

        // Right face (x=width, normal +X)
        let right_normal = Vector3::x();
        let right = Polygon::new(
            vec![
                Vertex::new(p100, right_normal),
                Vertex::new(p110, right_normal),
                Vertex::new(p111, right_normal),
                Vertex::new(p101, right_normal),
            ],
            metadata.clone(),
        );

        Mesh::from_polygons(&[bottom, top, front, back, left, right])
    }

    /// A UV sphere with the given radius, longitudinal `segments` and
    /// latitudinal `stacks`. Rings adjacent to the poles come out as
    /// triangles, the rest as quads.
    pub fn sphere(radius: Real, segments: usize, stacks: usize, metadata: Option<S>) -> Mesh<S> {
        let mut polygons = Vec::new();

        for i in 0..segments {
            for j in 0..stacks {
                let mut vertices = Vec::new();

                let vertex = |theta: Real, phi: Real| {
                    let dir = Vector3::new(
                        theta.cos() * phi.sin(),
                        phi.cos(),
                        theta.sin() * phi.sin(),
                    );
                    Vertex::new(
                        Point3::new(dir.x * radius, dir.y * radius, dir.z * radius),
                        dir,
                    )
                };

                let t0 = i as Real / segments as Real;
                let t1 = (i + 1) as Real / segments as Real;
                let p0 = j as Real / stacks as Real;
                let p1 = (j + 1) as Real / stacks as Real;

                let theta0 = t0 * TAU;
                let theta1 = t1 * TAU;
                let phi0 = p0 * PI;
                let phi1 = p1 * PI;

                vertices.push(vertex(theta0, phi0));
                if j > 0 {
                    vertices.push(vertex(theta1, phi0));
                }
                if j < stacks - 1 {
                    vertices.push(vertex(theta1, phi1));
                }
                vertices.push(vertex(theta0, phi1));

                polygons.push(Polygon::new(vertices, metadata.clone()));
            }
        }
        Mesh::from_polygons(&polygons)
    }

    /// A frustum whose axis runs from `start` to `end`, with radius `radius1`
    /// at the start face and `radius2` at the end face.
    pub fn frustum_ptp(
        start: Point3<Real>,
        end: Point3<Real>,
        radius1: Real,
        radius2: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let s = start.coords;
        let ray = end.coords - s;

        // If the start and end coincide there is no axis to build around
        if ray.norm_squared() < EPSILON {
            return Mesh::new();
        }

        let axis_z = ray.normalize();

        // Pick an axis_x that is not parallel to axis_z
        let axis_x = if axis_z.y.abs() > 0.5 {
            Vector3::x()
        } else {
            Vector3::y()
        }
        .cross(&axis_z)
        .normalize();

        let axis_y = axis_x.cross(&axis_z).normalize();

        let start_v = Vertex::new(start, -axis_z); // bottom cap center
        let end_v = Vertex::new(end, axis_z); // top cap center

        let mut polygons = Vec::new();

        // A vertex on the frustum surface at the given axial stack (0..1) and
        // angular slice (0..1). `normal_blend` blends the radial side normal
        // toward ±axis_z at the caps.
        let point = |stack: Real, slice: Real, normal_blend: Real| {
            let r = radius1 * (1.0 - stack) + radius2 * stack;
            let angle = slice * TAU;
            let radial_dir = axis_x * angle.cos() + axis_y * angle.sin();

            let pos = s + ray * stack + radial_dir * r;
            let normal = radial_dir * (1.0 - normal_blend.abs()) + axis_z * normal_blend;
            Vertex::new(Point3::from(pos), normal.normalize())
        };

        for i in 0..segments {
            let slice0 = i as Real / segments as Real;
            let slice1 = (i + 1) as Real / segments as Real;

            // Bottom cap triangle, fanned from the cap center
            polygons.push(Polygon::new(
                vec![
                    start_v.clone(),
                    point(0.0, slice0, -1.0),
                    point(0.0, slice1, -1.0),
                ],
                metadata.clone(),
            ));

            // Side wall quad bridging stack 0..1 at slice0..slice1
            polygons.push(Polygon::new(
                vec![
                    point(0.0, slice1, 0.0),
                    point(0.0, slice0, 0.0),
                    point(1.0, slice0, 0.0),
                    point(1.0, slice1, 0.0),
                ],
                metadata.clone(),
            ));

            // Top cap triangle
            polygons.push(Polygon::new(
                vec![
                    end_v.clone(),
                    point(1.0, slice1, 1.0),
                    point(1.0, slice0, 1.0),
                ],
                metadata.clone(),
            ));
        }

        Mesh::from_polygons(&polygons)
    }

    /// A vertical cylinder along Z from z=0 to z=height with the given radius.
    pub fn cylinder(radius: Real, height: Real, segments: usize, metadata: Option<S>) -> Mesh<S> {
        Mesh::frustum_ptp(
            Point3::origin(),
            Point3::new(0.0, 0.0, height),
            radius,
            radius,
            segments,
            metadata,
        )
    }

    /// Creates a Mesh polyhedron from raw vertex data (`points`) and face
    /// indices.
    ///
    /// - `points`: a slice of `[x, y, z]` coordinates.
    /// - `faces`: each element lists indices into `points` describing one
    ///   face. A face with fewer than 3 indices or an out-of-range index is
    ///   an error.
    ///
    /// Every vertex normal is set to its face's plane normal.
    pub fn polyhedron(
        points: &[[Real; 3]],
        faces: &[Vec<usize>],
        metadata: Option<S>,
    ) -> Result<Mesh<S>, ValidationError> {
        let mut polygons = Vec::with_capacity(faces.len());

        for face in faces {
            if face.len() < 3 {
                return Err(ValidationError::TooFewPoints(face.len()));
            }

            let mut face_vertices = Vec::with_capacity(face.len());
            for &idx in face {
                if idx >= points.len() {
                    return Err(ValidationError::IndexOutOfRange {
                        index: idx,
                        len: points.len(),
                    });
                }
                let [x, y, z] = points[idx];
                face_vertices.push(Vertex::new(
                    Point3::new(x, y, z),
                    Vector3::zeros(), // set from the face plane below
                ));
            }

            let mut poly = Polygon::new(face_vertices, metadata.clone());
            let plane_normal = poly.plane.normal();
            for v in &mut poly.vertices {
                v.normal = plane_normal;
            }
            polygons.push(poly);
        }

        Ok(Mesh::from_polygons(&polygons))
    }
}
