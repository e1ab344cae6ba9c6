//! Structured C-grid around an aerofoil.
//!
//! The grid is assembled from four regions: one band of quadrilateral cells
//! along each of the top and bottom surfaces, a fan closing the leading
//! edge, and a wake block behind the trailing edge. Every surface is
//! transfinite so gmsh produces a fully structured quadrilateral mesh.

use nalgebra::{Point3, Vector3};

use crate::aerofoil::{Aerofoil, Coordinate};
use crate::geo::{
    Circle, CurveLoop, Geometry, Line, PhysicalCurve, PhysicalSurface, Point, Surface,
};
use crate::mesh::MeshConfig;
use crate::utils::error::{AeroxError, Result};

/// Gridded band along one aerofoil surface: points on the surface, points on
/// the outer grid boundary, and the quad cells between them.
struct HalfAerofoil {
    surface_points: Vec<Point>,
    boundary_points: Vec<Point>,
    surface_lines: Vec<Line>,
    boundary_lines: Vec<Line>,
    normal_lines: Vec<Line>,
    loops: Vec<CurveLoop>,
    surfaces: Vec<Surface>,
}

struct LeadingEdge {
    center: Point,
    inner: Line,
    outer: Circle,
    curve_loop: CurveLoop,
    surface: Surface,
}

struct WakeRectangle {
    top_right: Point,
    bottom_right: Point,
    top_line: Line,
    right_line: Line,
    bottom_line: Line,
    curve_loop: CurveLoop,
    surface: Surface,
}

struct TrailingEdge {
    te_line: Line,
    top: WakeRectangle,
    bottom: WakeRectangle,
    center_right: Line,
    center_loop: CurveLoop,
    center_surface: Surface,
}

/// Build the gmsh statements describing the C-grid for `aerofoil`.
pub fn geometry(aerofoil: &Aerofoil, config: &MeshConfig) -> Result<Vec<String>> {
    let mut geo = Geometry::new();

    let mut top_coordinates = vec![aerofoil.leading_edge];
    top_coordinates.extend_from_slice(&aerofoil.top);

    let mut bottom_coordinates = aerofoil.bottom.clone();
    bottom_coordinates.push(aerofoil.leading_edge);

    let top = half_aerofoil(&mut geo, &top_coordinates, config)?;
    let bottom = half_aerofoil(&mut geo, &bottom_coordinates, config)?;
    let leading = leading_edge(&mut geo, &top, &bottom, config);
    let trailing = trailing_edge(&mut geo, &top, &bottom, config);

    let aerofoil_curve = PhysicalCurve {
        name: "aerofoil".to_string(),
        elements: top
            .surface_lines
            .iter()
            .map(|l| l.id)
            .chain([trailing.te_line.id])
            .chain(bottom.surface_lines.iter().map(|l| l.id))
            .chain([leading.inner.id])
            .collect(),
    };
    let far_field_curve = PhysicalCurve {
        name: "far_field".to_string(),
        elements: top
            .boundary_lines
            .iter()
            .map(|l| l.id)
            .chain([
                trailing.top.top_line.id,
                trailing.top.right_line.id,
                trailing.center_right.id,
                trailing.bottom.right_line.id,
                trailing.bottom.top_line.id,
            ])
            .chain(bottom.boundary_lines.iter().map(|l| l.id))
            .chain([leading.outer.id])
            .collect(),
    };
    let physical_surface = PhysicalSurface {
        name: "dummy".to_string(),
        elements: top
            .surfaces
            .iter()
            .chain(bottom.surfaces.iter())
            .map(|s| s.id)
            .chain([
                leading.surface.id,
                trailing.top.surface.id,
                trailing.bottom.surface.id,
                trailing.center_surface.id,
            ])
            .collect(),
    };

    let mut statements = Vec::new();
    statements.extend(top.statements());
    statements.extend(bottom.statements());
    statements.extend(leading.statements());
    statements.extend(trailing.statements());
    statements.push(aerofoil_curve.to_string());
    statements.push(far_field_curve.to_string());
    statements.push(physical_surface.to_string());
    Ok(statements)
}

impl HalfAerofoil {
    fn statements(&self) -> Vec<String> {
        self.surface_points
            .iter()
            .map(Point::to_string)
            .chain(self.boundary_points.iter().map(Point::to_string))
            .chain(self.surface_lines.iter().map(Line::to_string))
            .chain(self.boundary_lines.iter().map(Line::to_string))
            .chain(self.normal_lines.iter().map(Line::to_string))
            .chain(self.loops.iter().map(CurveLoop::to_string))
            .chain(self.surfaces.iter().map(Surface::to_string))
            .collect()
    }
}

impl LeadingEdge {
    fn statements(&self) -> Vec<String> {
        vec![
            self.center.to_string(),
            self.inner.to_string(),
            self.outer.to_string(),
            self.curve_loop.to_string(),
            self.surface.to_string(),
        ]
    }
}

impl TrailingEdge {
    fn statements(&self) -> Vec<String> {
        vec![
            self.top.top_right.to_string(),
            self.top.bottom_right.to_string(),
            self.bottom.top_right.to_string(),
            self.bottom.bottom_right.to_string(),
            self.top.top_line.to_string(),
            self.top.right_line.to_string(),
            self.top.bottom_line.to_string(),
            self.bottom.top_line.to_string(),
            self.bottom.right_line.to_string(),
            self.bottom.bottom_line.to_string(),
            self.center_right.to_string(),
            self.te_line.to_string(),
            self.top.curve_loop.to_string(),
            self.bottom.curve_loop.to_string(),
            self.center_loop.to_string(),
            self.top.surface.to_string(),
            self.bottom.surface.to_string(),
            self.center_surface.to_string(),
        ]
    }
}

fn as_vector(c: Coordinate) -> Vector3<f64> {
    Vector3::new(c.0, c.1, 0.0)
}

/// Grid one surface of the aerofoil.
///
/// Surface grid points sit at segment midpoints (pushed to 95% of the last
/// segment so the wake starts almost at the trailing edge); boundary points
/// are offset outward along the segment normal by the grid thickness.
fn half_aerofoil(
    geo: &mut Geometry,
    coordinates: &[Coordinate],
    config: &MeshConfig,
) -> Result<HalfAerofoil> {
    if coordinates.len() < 3 {
        return Err(AeroxError::ProcessingError {
            message: format!(
                "aerofoil surface has {} points, need at least 3 to grid it",
                coordinates.len()
            ),
        });
    }

    let mut coords: Vec<Coordinate> = coordinates.to_vec();
    let reversed = coords[0].0 > coords[1].0;
    if reversed {
        coords.reverse();
    }
    // naca456 emits nearly coincident x values near the trailing edge which
    // would produce degenerate quads
    let mut i = 1;
    while i < coords.len() {
        if coords[i - 1].0 > 0.7 && (coords[i].0 - coords[i - 1].0).abs() < 1e-3 {
            coords.remove(i - 1);
        } else {
            i += 1;
        }
    }
    if reversed {
        coords.reverse();
    }

    if coords.len() < 3 {
        return Err(AeroxError::ProcessingError {
            message: "aerofoil surface degenerated while removing trailing edge slivers"
                .to_string(),
        });
    }

    let mut surface_points: Vec<Point> = Vec::new();
    let mut boundary_points: Vec<Point> = Vec::new();
    let out_of_plane = Vector3::new(0.0, 0.0, -1.0);

    for i in 1..coords.len() {
        let first = as_vector(coords[i - 1]);
        let second = as_vector(coords[i]);

        let mut ratio = 0.5;
        if !reversed && i == coords.len() - 1 {
            ratio = 0.95;
        }
        if reversed && i == 1 {
            ratio = 0.05;
        }

        let segment = second - first;
        let midpoint = first + ratio * segment;
        let boundary = midpoint + (config.thickness / segment.norm()) * segment.cross(&out_of_plane);

        surface_points.push(geo.point(Point3::from(midpoint)));
        boundary_points.push(geo.point(Point3::from(boundary)));
    }

    // keep boundary x values monotonic in the surface walking direction so
    // the outer boundary never folds back on itself
    let indices: Vec<usize> = if surface_points[1].coordinates.x > surface_points[0].coordinates.x {
        (0..boundary_points.len()).collect()
    } else {
        (0..boundary_points.len()).rev().collect()
    };
    for pair in indices.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if boundary_points[current].coordinates.x < boundary_points[previous].coordinates.x {
            let dx =
                surface_points[current].coordinates.x - surface_points[previous].coordinates.x;
            let base = boundary_points[previous].coordinates;
            boundary_points[current].coordinates = Point3::new(base.x + dx, base.y, 0.0);
        }
    }

    let mut surface_lines: Vec<Line> = Vec::new();
    let mut boundary_lines: Vec<Line> = Vec::new();
    let mut normal_lines =
        vec![geo.line(&surface_points[0], &boundary_points[0], Some(config.layers))];
    let mut loops: Vec<CurveLoop> = Vec::new();
    let mut surfaces: Vec<Surface> = Vec::new();

    for i in 1..surface_points.len() {
        let length =
            (boundary_points[i - 1].coordinates - boundary_points[i].coordinates).norm();
        let count = ((length / config.grid_width) as usize + 1).max(2);

        let surface_line = geo.line(&surface_points[i - 1], &surface_points[i], Some(count));
        let boundary_line = geo.line(&boundary_points[i], &boundary_points[i - 1], Some(count));
        let normal_line = geo.line(&surface_points[i], &boundary_points[i], Some(config.layers));

        let previous_normal = normal_lines[i - 1].id;
        let cell_loop = geo.curve_loop(vec![
            surface_line.id,
            normal_line.id,
            boundary_line.id,
            -previous_normal,
        ]);
        surfaces.push(geo.surface(vec![cell_loop.id], true));

        surface_lines.push(surface_line);
        boundary_lines.push(boundary_line);
        normal_lines.push(normal_line);
        loops.push(cell_loop);
    }

    for line in &mut normal_lines {
        line.progression_from_width(config.initial_cell_thickness);
    }

    Ok(HalfAerofoil {
        surface_points,
        boundary_points,
        surface_lines,
        boundary_lines,
        normal_lines,
        loops,
        surfaces,
    })
}

/// Close the leading edge with a fan between the two surface bands: a
/// straight inner line between the first surface points and a circle arc
/// tangential to the front segments on the outside.
fn leading_edge(
    geo: &mut Geometry,
    top: &HalfAerofoil,
    bottom: &HalfAerofoil,
    config: &MeshConfig,
) -> LeadingEdge {
    let last = bottom.surface_points.len() - 1;

    let q = top.surface_points[0].coordinates - top.surface_points[1].coordinates;
    let r = bottom.surface_points[last].coordinates - bottom.surface_points[last - 1].coordinates;
    let c = q.cross(&Vector3::new(0.0, 0.0, -1.0)) / q.norm();
    let d = r.cross(&Vector3::new(0.0, 0.0, 1.0)) / r.norm();
    let radius = (q.y - r.y) / (d.y - c.y);
    let s = q + radius * c;
    let center = geo.point(Point3::from(-s));

    let count = (((top.boundary_points[0].coordinates
        - bottom.boundary_points[last].coordinates)
        .norm()
        / config.grid_width) as usize)
        .max(2);

    let inner = geo.line(
        &top.surface_points[0],
        &bottom.surface_points[last],
        Some(count),
    );
    let outer = geo.circle(
        top.boundary_points[0].id,
        center.id,
        bottom.boundary_points[last].id,
        Some(count),
    );
    let curve_loop = geo.curve_loop(vec![
        inner.id,
        bottom.normal_lines[last].id,
        -outer.id,
        -top.normal_lines[0].id,
    ]);
    let surface = geo.surface(vec![curve_loop.id], true);

    LeadingEdge {
        center,
        inner,
        outer,
        curve_loop,
        surface,
    }
}

/// Wake block behind the trailing edge: a rectangle behind each surface band
/// plus a thin center strip closed by the trailing edge line, all extending
/// to twice the grid thickness downstream.
fn trailing_edge(
    geo: &mut Geometry,
    top: &HalfAerofoil,
    bottom: &HalfAerofoil,
    config: &MeshConfig,
) -> TrailingEdge {
    let top_last = top.surface_points.len() - 1;

    let mut te_line = geo.line(
        &top.surface_points[top_last],
        &bottom.surface_points[0],
        None,
    );
    te_line.transfinite_from_grid_size(config.initial_cell_thickness);

    // wake cells start at roughly the streamwise spacing of the rear surface
    let reference_spacing = if config.wake_progression.is_none() {
        let k = bottom.surface_points.len().min(4);
        let xs: Vec<f64> = bottom.surface_points[..k]
            .iter()
            .map(|p| p.coordinates.x)
            .collect();
        let mean_step = xs
            .windows(2)
            .map(|w| w[1] - w[0])
            .sum::<f64>()
            / (xs.len() - 1) as f64;
        Some(mean_step.abs())
    } else {
        None
    };

    let top_rect = wake_rectangle(
        geo,
        &top.boundary_points[top_last],
        &top.surface_points[top_last],
        &top.normal_lines[top_last],
        config,
        reference_spacing,
    );
    let bottom_rect = wake_rectangle(
        geo,
        &bottom.boundary_points[0],
        &bottom.surface_points[0],
        &bottom.normal_lines[0],
        config,
        reference_spacing,
    );

    let mut center_right = geo.line(&top_rect.bottom_right, &bottom_rect.bottom_right, None);
    center_right.transfinite_from_grid_size(config.initial_cell_thickness);

    let center_loop = geo.curve_loop(vec![
        te_line.id,
        -top_rect.bottom_line.id,
        -center_right.id,
        bottom_rect.bottom_line.id,
    ]);
    let center_surface = geo.surface(vec![center_loop.id], true);

    TrailingEdge {
        te_line,
        top: top_rect,
        bottom: bottom_rect,
        center_right,
        center_loop,
        center_surface,
    }
}

fn wake_rectangle(
    geo: &mut Geometry,
    top_left: &Point,
    bottom_left: &Point,
    left_line: &Line,
    config: &MeshConfig,
    reference_spacing: Option<f64>,
) -> WakeRectangle {
    let x_dim = 2.0 * config.thickness;
    let top_right = geo.point(Point3::new(x_dim, top_left.coordinates.y, 0.0));
    let bottom_right = geo.point(Point3::new(x_dim, bottom_left.coordinates.y, 0.0));

    let count =
        (((x_dim - bottom_left.coordinates.x) / config.wake_width) as usize).max(2);

    let mut top_line = geo.line(top_left, &top_right, Some(count));
    let mut bottom_line = geo.line(bottom_left, &bottom_right, Some(count));
    match (config.wake_progression, reference_spacing) {
        (Some(progression), _) => {
            top_line.progression = Some(progression);
            bottom_line.progression = Some(progression);
        }
        (None, Some(spacing)) => {
            top_line.progression_from_width(spacing);
            bottom_line.progression_from_width(spacing);
        }
        (None, None) => {}
    }

    let mut right_line = geo.line(&bottom_right, &top_right, left_line.transfinite);
    right_line.progression = left_line.progression;

    let curve_loop = geo.curve_loop(vec![
        left_line.id,
        top_line.id,
        -right_line.id,
        -bottom_line.id,
    ]);
    let surface = geo.surface(vec![curve_loop.id], true);

    WakeRectangle {
        top_right,
        bottom_right,
        top_line,
        right_line,
        bottom_line,
        curve_loop,
        surface,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_aerofoil() -> Aerofoil {
        let top = vec![(0.2, 0.05), (0.4, 0.06), (0.6, 0.055), (0.8, 0.04)];
        // bottom runs from the trailing edge towards the leading edge
        let bottom = vec![(0.8, -0.04), (0.6, -0.055), (0.4, -0.06), (0.2, -0.05)];
        let mut coordinates = vec![(0.0, 0.0)];
        coordinates.extend_from_slice(&top);
        coordinates.push((1.0, 0.0));
        coordinates.extend_from_slice(&bottom);
        Aerofoil {
            name: "test".to_string(),
            coordinates,
            top,
            bottom,
            leading_edge: (0.0, 0.0),
            trailing_edge: (1.0, 0.0),
        }
    }

    #[test]
    fn test_geometry_produces_all_regions() {
        let statements = geometry(&test_aerofoil(), &MeshConfig::default()).unwrap();

        let count = |prefix: &str| statements.iter().filter(|s| s.starts_with(prefix)).count();

        // 4 segments per half surface -> 3 quads each, plus the leading edge
        // fan and the three wake surfaces
        assert_eq!(count("Plane Surface"), 3 + 3 + 1 + 3);
        assert_eq!(count("Curve Loop"), 10);
        assert_eq!(count("Circle"), 1);
        assert_eq!(count("Physical Curve"), 2);
        assert_eq!(count("Physical Surface"), 1);
    }

    #[test]
    fn test_geometry_physical_groups_are_last() {
        let statements = geometry(&test_aerofoil(), &MeshConfig::default()).unwrap();
        let n = statements.len();
        assert!(statements[n - 3].starts_with("Physical Curve( \"aerofoil\" )"));
        assert!(statements[n - 2].starts_with("Physical Curve( \"far_field\" )"));
        assert!(statements[n - 1].starts_with("Physical Surface( \"dummy\" )"));
    }

    #[test]
    fn test_geometry_points_precede_curves_that_use_them() {
        let statements = geometry(&test_aerofoil(), &MeshConfig::default()).unwrap();

        let mut defined_points = std::collections::HashSet::new();
        for statement in &statements {
            if let Some(rest) = statement.strip_prefix("Point( ") {
                let id: i64 = rest.split(' ').next().unwrap().parse().unwrap();
                defined_points.insert(id);
            } else if let Some(rest) = statement.strip_prefix("Line( ") {
                let body = rest.split('{').nth(1).unwrap();
                let body = body.split('}').next().unwrap();
                for field in body.split(',') {
                    let id: i64 = field.trim().parse().unwrap();
                    assert!(defined_points.contains(&id), "undefined point {}", id);
                }
            }
        }
    }

    #[test]
    fn test_geometry_normals_have_boundary_layer_progression() {
        let statements = geometry(&test_aerofoil(), &MeshConfig::default()).unwrap();

        // the surface normals are transfinite with the configured layer count
        // and a progression above 1 so cells grow away from the surface
        let layered: Vec<&String> = statements
            .iter()
            .filter(|s| s.contains("= 50 Using Progression"))
            .collect();
        assert!(!layered.is_empty());
        for statement in layered {
            let progression: f64 = statement
                .rsplit(' ')
                .next()
                .unwrap()
                .trim_end_matches(';')
                .parse()
                .unwrap();
            assert!(progression > 1.0, "statement: {}", statement);
        }
    }

    #[test]
    fn test_geometry_rejects_degenerate_surface() {
        let mut aerofoil = test_aerofoil();
        aerofoil.top = vec![];
        aerofoil.bottom = vec![];
        assert!(geometry(&aerofoil, &MeshConfig::default()).is_err());
    }
}
