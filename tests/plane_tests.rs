use solidcsg::{
    float_types::EPSILON,
    mesh::{
        plane::{BACK, COPLANAR, FRONT, Plane, SPANNING},
        polygon::Polygon,
        vertex::Vertex,
    },
};
use nalgebra::{Point3, Vector3};

mod support;

use crate::support::approx_eq;

#[test]
fn flip() {
    let mut plane = Plane::from_normal(Vector3::y(), 2.0);
    plane.flip();
    assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), -2.0);
}

#[test]
fn from_points_right_hand_rule() {
    let plane = Plane::from_points(
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    );
    assert!(approx_eq(plane.normal().z, 1.0, EPSILON));
    assert!(approx_eq(plane.offset(), 0.0, EPSILON));
}

#[test]
fn from_points_degenerate_falls_back() {
    // Three collinear points define no plane; the fallback must still be a
    // valid (unit-normal) plane rather than NaN.
    let plane = Plane::from_points(
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    );
    assert!(approx_eq(plane.normal().norm(), 1.0, EPSILON));
}

#[test]
fn orient_point_classification() {
    let plane = Plane::from_normal(Vector3::z(), 0.0);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 1.0)), FRONT);
    assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, -1.0)), BACK);
    assert_eq!(plane.orient_point(&Point3::new(5.0, -3.0, 0.0)), COPLANAR);
    // Within tolerance of the plane counts as coplanar
    assert_eq!(
        plane.orient_point(&Point3::new(0.0, 0.0, EPSILON * 0.5)),
        COPLANAR
    );
}

#[test]
fn classify_polygon_is_or_of_vertices() {
    let plane = Plane::from_normal(Vector3::z(), 0.0);
    let above: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 1.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 1.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 2.0), Vector3::z()),
        ],
        None,
    );
    assert_eq!(plane.classify_polygon(&above), FRONT);

    let crossing: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, -1.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, -1.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 1.0), Vector3::z()),
        ],
        None,
    );
    assert_eq!(plane.classify_polygon(&crossing), SPANNING);
    assert_eq!(SPANNING, FRONT | BACK);
}

#[test]
fn split_polygon() {
    // Define a plane that splits the XY plane at y=0
    let plane = Plane::from_normal(Vector3::new(0.0, 1.0, 0.0), 0.0);

    // A polygon that crosses y=0 line: a square from ( -1, -1 ) to (1, 1 )
    let poly: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );

    let (cf, cb, f, b) = plane.split_polygon(&poly);
    // This polygon is spanning across y=0 plane => we expect no coplanar, but front/back polygons.
    assert_eq!(cf.len(), 0);
    assert_eq!(cb.len(), 0);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);

    // Check that each part has at least 3 vertices and is "above" or "below" the plane
    // in rough terms
    let front_poly = &f[0];
    let back_poly = &b[0];
    assert!(front_poly.vertices.len() >= 3);
    assert!(back_poly.vertices.len() >= 3);

    // Quick check: all front vertices should have y >= 0 (within an epsilon).
    for v in &front_poly.vertices {
        assert!(v.pos.y >= -EPSILON);
    }
    // All back vertices should have y <= 0 (within an epsilon).
    for v in &back_poly.vertices {
        assert!(v.pos.y <= EPSILON);
    }
}

#[test]
fn split_polygon_coplanar_routing() {
    let plane = Plane::from_normal(Vector3::z(), 0.0);

    // A polygon lying in the splitting plane with an agreeing normal
    let agreeing: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );
    let (cf, cb, f, b) = plane.split_polygon(&agreeing);
    assert_eq!((cf.len(), cb.len(), f.len(), b.len()), (1, 0, 0, 0));

    // Same geometry wound the other way: normal opposes the splitting plane
    let mut opposing = agreeing.clone();
    opposing.flip();
    let (cf, cb, f, b) = plane.split_polygon(&opposing);
    assert_eq!((cf.len(), cb.len(), f.len(), b.len()), (0, 1, 0, 0));
}

#[test]
fn split_polygon_fragments_keep_parent_plane() {
    let plane = Plane::from_normal(Vector3::x(), 0.0);
    let poly: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(-1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );
    let (_, _, f, b) = plane.split_polygon(&poly);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(f[0].plane, poly.plane);
    assert_eq!(b[0].plane, poly.plane);
}
