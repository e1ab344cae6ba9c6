//! gmsh `.geo` primitives.
//!
//! Each entity renders itself as a gmsh statement through `Display`. Ids are
//! handed out by the [`Geometry`] builder: points, curves (lines, circle
//! arcs and curve loops share one sequence) and surfaces each have their own
//! counter starting at 1, matching gmsh's id spaces.

use std::fmt;

use nalgebra::Point3;

#[derive(Debug, Clone)]
pub struct Point {
    pub id: i64,
    pub coordinates: Point3<f64>,
    pub grid_size: Option<f64>,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.coordinates;
        match self.grid_size {
            Some(size) => write!(
                f,
                "Point( {} ) = {{ {}, {}, {}, {} }};",
                self.id, c.x, c.y, c.z, size
            ),
            None => write!(f, "Point( {} ) = {{ {}, {}, {} }};", self.id, c.x, c.y, c.z),
        }
    }
}

fn transfinite_clause(id: i64, transfinite: Option<usize>, progression: Option<f64>) -> String {
    match transfinite {
        Some(n) => format!(
            " Transfinite Line {{ {} }} = {} Using Progression {};",
            id,
            n,
            progression.unwrap_or(1.0)
        ),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub id: i64,
    pub begin: i64,
    pub end: i64,
    pub length: f64,
    pub transfinite: Option<usize>,
    pub progression: Option<f64>,
}

impl Line {
    /// Pick the transfinite point count so cells along the line are roughly
    /// `size` wide.
    pub fn transfinite_from_grid_size(&mut self, size: f64) {
        let count = (self.length / size) as usize + 1;
        self.transfinite = Some(count.max(2));
    }

    /// Solve for the geometric progression that makes the first cell
    /// `first_width` wide, given the line length and transfinite count.
    /// Does nothing on a line without a transfinite count.
    pub fn progression_from_width(&mut self, first_width: f64) {
        let Some(n) = self.transfinite else {
            return;
        };
        if first_width <= 0.0 || self.length <= 0.0 {
            return;
        }
        let cells = n.saturating_sub(1).max(1) as f64;
        if first_width * cells >= self.length {
            // uniform spacing already reaches the far end
            self.progression = Some(1.0);
            return;
        }

        let total = |r: f64| first_width * (r.powf(cells) - 1.0) / (r - 1.0);
        let mut lo = 1.0 + 1e-9;
        let mut hi = 2.0;
        while total(hi) < self.length && hi < 1e6 {
            hi *= 2.0;
        }
        for _ in 0..100 {
            let mid = 0.5 * (lo + hi);
            if total(mid) < self.length {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        self.progression = Some(0.5 * (lo + hi));
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line( {} ) = {{ {}, {} }};{}",
            self.id,
            self.begin,
            self.end,
            transfinite_clause(self.id, self.transfinite, self.progression)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Circle {
    pub id: i64,
    pub begin: i64,
    pub center: i64,
    pub end: i64,
    pub transfinite: Option<usize>,
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circle( {} ) = {{ {}, {}, {} }};{}",
            self.id,
            self.begin,
            self.center,
            self.end,
            transfinite_clause(self.id, self.transfinite, None)
        )
    }
}

/// Closed loop of signed curve ids; a negative id reverses the curve.
#[derive(Debug, Clone)]
pub struct CurveLoop {
    pub id: i64,
    pub elements: Vec<i64>,
}

impl fmt::Display for CurveLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "Curve Loop( {} ) = {{ {} }};",
            self.id,
            elements.join(",")
        )
    }
}

#[derive(Debug, Clone)]
pub struct Surface {
    pub id: i64,
    pub elements: Vec<i64>,
    pub transfinite: bool,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "Plane Surface( {} ) = {{ {} }};",
            self.id,
            elements.join(",")
        )?;
        if self.transfinite {
            write!(
                f,
                " Transfinite Surface{{ {id} }}; Recombine Surface{{ {id} }};",
                id = self.id
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PhysicalCurve {
    pub name: String,
    pub elements: Vec<i64>,
}

impl fmt::Display for PhysicalCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "Physical Curve( \"{}\" ) = {{ {} }};",
            self.name,
            elements.join(",")
        )
    }
}

#[derive(Debug, Clone)]
pub struct PhysicalSurface {
    pub name: String,
    pub elements: Vec<i64>,
}

impl fmt::Display for PhysicalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "Physical Surface( \"{}\" ) = {{ {} }};",
            self.name,
            elements.join(",")
        )
    }
}

/// Id allocator for geometry entities.
#[derive(Debug, Default)]
pub struct Geometry {
    next_point: i64,
    next_curve: i64,
    next_surface: i64,
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            next_point: 1,
            next_curve: 1,
            next_surface: 1,
        }
    }

    fn point_id(&mut self) -> i64 {
        let id = self.next_point;
        self.next_point += 1;
        id
    }

    fn curve_id(&mut self) -> i64 {
        let id = self.next_curve;
        self.next_curve += 1;
        id
    }

    pub fn point(&mut self, coordinates: Point3<f64>) -> Point {
        Point {
            id: self.point_id(),
            coordinates,
            grid_size: None,
        }
    }

    pub fn sized_point(&mut self, coordinates: Point3<f64>, grid_size: f64) -> Point {
        Point {
            id: self.point_id(),
            coordinates,
            grid_size: Some(grid_size),
        }
    }

    pub fn line(&mut self, begin: &Point, end: &Point, transfinite: Option<usize>) -> Line {
        Line {
            id: self.curve_id(),
            begin: begin.id,
            end: end.id,
            length: (end.coordinates - begin.coordinates).norm(),
            transfinite,
            progression: None,
        }
    }

    pub fn circle(
        &mut self,
        begin: i64,
        center: i64,
        end: i64,
        transfinite: Option<usize>,
    ) -> Circle {
        Circle {
            id: self.curve_id(),
            begin,
            center,
            end,
            transfinite,
        }
    }

    pub fn curve_loop(&mut self, elements: Vec<i64>) -> CurveLoop {
        CurveLoop {
            id: self.curve_id(),
            elements,
        }
    }

    pub fn surface(&mut self, elements: Vec<i64>, transfinite: bool) -> Surface {
        let id = self.next_surface;
        self.next_surface += 1;
        Surface {
            id,
            elements,
            transfinite,
        }
    }
}
