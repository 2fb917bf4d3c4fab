//! Two-variable projection of a problem for plotting.

use crate::problem::ProblemDescription;
use crate::solution::Solution;

const PALETTE: [&str; 6] = ["#ef4444", "#3b82f6", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4"];
const OBJECTIVE_COLOR: &str = "#000000";

const PARALLEL_TOLERANCE: f64 = 1e-10;
const FEASIBILITY_TOLERANCE: f64 = 1e-5;
const DEDUP_TOLERANCE: f64 = 0.001;
const MIN_EXTENT: f64 = 10.0;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub name: String,
    /// Clipped endpoints, sorted by x
    pub points: Vec<PlotPoint>,
    pub color: String,
    pub equation: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GraphData {
    /// Feasible polygon vertices in winding order
    pub feasible_region: Vec<PlotPoint>,
    pub constraints: Vec<LineSegment>,
    pub objective_line: LineSegment,
    pub optimal_point: OptimalPoint,
    /// Set by branch-and-bound for overlay on the continuous region
    pub integer_optimal_point: Option<OptimalPoint>,
}

/// `a*x + b*y = rhs`
#[derive(Debug, Clone, Copy)]
struct Line {
    a: f64,
    b: f64,
    rhs: f64,
}

impl Line {
    fn intersect(&self, other: &Line) -> Option<PlotPoint> {
        let det = self.a * other.b - self.b * other.a;
        if det.abs() < PARALLEL_TOLERANCE {
            return None;
        }
        Some(PlotPoint {
            x: (self.rhs * other.b - self.b * other.rhs) / det,
            y: (self.a * other.rhs - self.rhs * other.a) / det,
        })
    }

    /// Intersections with x=0, x=limit, y=0, y=limit whose free coordinate
    /// lies in `[lower, 1.5 * limit]`, sorted by x with coincident hits merged
    fn clip(&self, limit: f64, lower: f64) -> Vec<PlotPoint> {
        let upper = limit * 1.5;
        let in_range = |v: f64| v >= lower && v <= upper;
        let mut points = Vec::with_capacity(4);

        if self.b.abs() > PARALLEL_TOLERANCE {
            let y0 = self.rhs / self.b;
            if in_range(y0) {
                points.push(PlotPoint { x: 0.0, y: y0 });
            }
            let y_limit = (self.rhs - self.a * limit) / self.b;
            if in_range(y_limit) {
                points.push(PlotPoint { x: limit, y: y_limit });
            }
        }
        if self.a.abs() > PARALLEL_TOLERANCE {
            let x0 = self.rhs / self.a;
            if in_range(x0) {
                points.push(PlotPoint { x: x0, y: 0.0 });
            }
            let x_limit = (self.rhs - self.b * limit) / self.a;
            if in_range(x_limit) {
                points.push(PlotPoint { x: x_limit, y: limit });
            }
        }

        points.sort_by(|p, q| p.x.total_cmp(&q.x));
        points.dedup_by(|p, q| (p.x - q.x).abs() < DEDUP_TOLERANCE && (p.y - q.y).abs() < DEDUP_TOLERANCE);
        points
    }
}

/// Builds plot data for a two-variable problem from its solution.
///
/// Callers must only pass problems with exactly two variables.
pub fn project(problem: &ProblemDescription, solution: &Solution) -> GraphData {
    debug_assert_eq!(problem.num_variables(), 2);

    let feasible_region = feasible_region(problem);

    let optimal_point = OptimalPoint {
        x: solution.values.first().copied().unwrap_or(0.0),
        y: solution.values.get(1).copied().unwrap_or(0.0),
        value: solution.objective_value,
    };

    let max_x = feasible_region.iter().map(|p| p.x).fold(0.0, f64::max);
    let max_y = feasible_region.iter().map(|p| p.y).fold(0.0, f64::max);
    let limit_x = max_x.max(optimal_point.x).max(MIN_EXTENT) * 1.5;
    let limit_y = max_y.max(optimal_point.y).max(MIN_EXTENT) * 1.5;
    let limit = limit_x.max(limit_y);

    let constraints = problem
        .constraints
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (a, b) = (c.coefficients[0], c.coefficients[1]);
            let line = Line { a, b, rhs: c.rhs };
            LineSegment {
                name: format!("R{}", i + 1),
                points: line.clip(limit, -1.0),
                color: PALETTE[i % PALETTE.len()].to_string(),
                equation: format!(
                    "{}x + {}y {} {}",
                    format_coefficient(a),
                    format_coefficient(b),
                    c.sign,
                    format_coefficient(c.rhs)
                ),
            }
        })
        .collect();

    let (c1, c2) = (problem.objective[0], problem.objective[1]);
    let z = solution.objective_value;
    let iso_line = Line { a: c1, b: c2, rhs: z };
    let objective_line = LineSegment {
        name: "Objective".to_string(),
        points: iso_line.clip(limit, -limit),
        color: OBJECTIVE_COLOR.to_string(),
        equation: format!("{}x + {}y = {:.2}", format_coefficient(c1), format_coefficient(c2), z),
    };

    GraphData {
        feasible_region,
        constraints,
        objective_line,
        optimal_point,
        integer_optimal_point: None,
    }
}

/// Vertices of the feasible polygon, ordered by angle around their centroid.
pub fn feasible_region(problem: &ProblemDescription) -> Vec<PlotPoint> {
    let mut lines: Vec<Line> = problem
        .constraints
        .iter()
        .map(|c| Line {
            a: c.coefficients[0],
            b: c.coefficients[1],
            rhs: c.rhs,
        })
        .collect();
    // x >= 0, y >= 0
    lines.push(Line { a: 1.0, b: 0.0, rhs: 0.0 });
    lines.push(Line { a: 0.0, b: 1.0, rhs: 0.0 });

    let mut points: Vec<PlotPoint> = Vec::new();
    for (i, first) in lines.iter().enumerate() {
        for second in &lines[i + 1..] {
            let Some(p) = first.intersect(second) else {
                continue;
            };
            if !is_feasible(problem, p) {
                continue;
            }
            let duplicate = points
                .iter()
                .any(|q| (q.x - p.x).abs() < DEDUP_TOLERANCE && (q.y - p.y).abs() < DEDUP_TOLERANCE);
            if !duplicate {
                points.push(p);
            }
        }
    }

    if !points.is_empty() {
        let n = points.len() as f64;
        let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
        let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
        points.sort_by(|p, q| {
            let ap = (p.y - cy).atan2(p.x - cx);
            let aq = (q.y - cy).atan2(q.x - cx);
            ap.total_cmp(&aq)
        });
    }
    points
}

fn is_feasible(problem: &ProblemDescription, p: PlotPoint) -> bool {
    if p.x < -FEASIBILITY_TOLERANCE || p.y < -FEASIBILITY_TOLERANCE {
        return false;
    }
    problem.constraints.iter().all(|c| {
        let lhs = c.coefficients[0] * p.x + c.coefficients[1] * p.y;
        c.sign.holds(lhs, c.rhs, FEASIBILITY_TOLERANCE)
    })
}

/// Two decimals with a trailing `.00` dropped
fn format_coefficient(v: f64) -> String {
    let text = format!("{:.2}", v);
    match text.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}
