use simplexlab_solver::{
    ConstraintSign, IntegerStatus, ProblemDescription, Sense, SignRestriction, SolutionStatus, Solver,
};

const TOL: f64 = 1e-5;

fn problem(sense: Sense, names: &[&str], objective: &[f64], rows: &[(Vec<f64>, ConstraintSign, f64)]) -> ProblemDescription {
    let mut p = ProblemDescription::new(sense, names.iter().map(|s| s.to_string()).collect());
    p.set_objective(objective.to_vec());
    for (coefs, sign, rhs) in rows {
        p.add_constraint(coefs.clone(), *sign, *rhs);
    }
    p
}

fn assert_consistent(problem: &ProblemDescription) {
    let solution = Solver::new().solve(problem);
    assert_eq!(solution.status, SolutionStatus::Optimal, "{}", problem);

    let recomputed = problem.objective_value(&solution.values);
    assert!(
        (recomputed - solution.objective_value).abs() < TOL,
        "reported {} but c.x = {}",
        solution.objective_value,
        recomputed
    );
    for (i, c) in problem.constraints.iter().enumerate() {
        assert!(c.is_satisfied(&solution.values, TOL), "constraint {} violated by {:?}", i, solution.values);
    }
    assert!(solution.values.iter().all(|&v| v >= -TOL), "negative value in {:?}", solution.values);
}

#[test]
fn reported_values_reproduce_objective_and_satisfy_constraints() {
    use ConstraintSign::*;
    assert_consistent(&problem(
        Sense::Maximize,
        &["x1", "x2"],
        &[3.0, 5.0],
        &[(vec![1.0, 0.0], Le, 4.0), (vec![0.0, 2.0], Le, 12.0), (vec![3.0, 2.0], Le, 18.0)],
    ));
    assert_consistent(&problem(
        Sense::Minimize,
        &["x", "y", "z"],
        &[2.0, 3.0, 1.0],
        &[(vec![1.0, 1.0, 1.0], Ge, 10.0), (vec![1.0, 0.0, -1.0], Eq, 2.0), (vec![0.0, 1.0, 0.0], Ge, 1.0)],
    ));
    assert_consistent(&problem(
        Sense::Maximize,
        &["a", "b"],
        &[1.0, 1.0],
        &[(vec![1.0, -1.0], Le, -1.0), (vec![1.0, 1.0], Le, 5.0)],
    ));
}

#[test]
fn solving_twice_is_idempotent() {
    let p = problem(
        Sense::Maximize,
        &["x1", "x2"],
        &[3.0, 4.0],
        &[(vec![2.0, 1.0], ConstraintSign::Le, 6.0), (vec![2.0, 3.0], ConstraintSign::Le, 9.0)],
    );
    let solver = Solver::new();
    assert_eq!(solver.solve(&p), solver.solve(&p));
}

#[test]
fn negated_minimization_mirrors_maximization() {
    use ConstraintSign::*;
    let rows = &[(vec![1.0, 1.0], Le, 4.0), (vec![1.0, 3.0], Le, 6.0), (vec![1.0, 0.0], Ge, 1.0)];
    let max = problem(Sense::Maximize, &["x", "y"], &[2.0, 3.0], rows);
    let min = problem(Sense::Minimize, &["x", "y"], &[-2.0, -3.0], rows);

    let a = Solver::new().solve(&max);
    let b = Solver::new().solve(&min);

    assert_eq!(a.status, SolutionStatus::Optimal);
    assert_eq!(b.status, SolutionStatus::Optimal);
    assert!((a.objective_value + b.objective_value).abs() < TOL, "{} vs {}", a.objective_value, b.objective_value);
    assert_eq!(a.values, b.values);
}

#[test]
fn contradictory_bounds_are_infeasible() {
    let p = problem(
        Sense::Maximize,
        &["x"],
        &[1.0],
        &[(vec![1.0], ConstraintSign::Ge, 5.0), (vec![1.0], ConstraintSign::Le, 2.0)],
    );
    let solution = Solver::new().solve(&p);
    assert_eq!(solution.status, SolutionStatus::Infeasible);
    assert!(!solution.iterations.is_empty());
}

#[test]
fn open_region_is_unbounded() {
    let p = problem(Sense::Maximize, &["x"], &[1.0], &[(vec![1.0], ConstraintSign::Ge, 0.0)]);
    let solution = Solver::new().solve(&p);
    assert_eq!(solution.status, SolutionStatus::Unbounded);
}

#[test]
fn parallel_objective_reports_alternate_optimum() {
    // objective parallel to the only binding constraint
    let p = problem(
        Sense::Maximize,
        &["x", "y"],
        &[11.0, 4.0],
        &[(vec![11.0, 4.0], ConstraintSign::Le, 99.0)],
    );
    let solution = Solver::new().solve(&p);

    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert!((solution.objective_value - 99.0).abs() < TOL);
    assert!(solution.multiple_solutions);
    assert!((solution.values[0] - 9.0).abs() < TOL, "x = {}", solution.values[0]);

    let alt = solution.alternate_values.expect("alternate vertex");
    assert!(alt[0].abs() < TOL && (alt[1] - 24.75).abs() < TOL, "alt = {:?}", alt);
    assert!((p.objective_value(&alt) - 99.0).abs() < TOL);
}

#[test]
fn branch_and_bound_finds_integer_optimum() {
    let p = problem(
        Sense::Maximize,
        &["x1", "x2"],
        &[3.0, 4.0],
        &[(vec![2.0, 1.0], ConstraintSign::Le, 6.0), (vec![2.0, 3.0], ConstraintSign::Le, 9.0)],
    );
    let solver = Solver::new();

    let relaxed = solver.solve(&p);
    assert!((relaxed.values[0] - 2.25).abs() < TOL, "x1 = {}", relaxed.values[0]);
    assert!((relaxed.values[1] - 1.5).abs() < TOL, "x2 = {}", relaxed.values[1]);
    assert!((relaxed.objective_value - 12.75).abs() < TOL);

    let integer = solver.solve_integer(&p);
    assert_eq!(integer.status, IntegerStatus::Optimal);
    let best = integer.best.expect("integer incumbent");
    assert!((best.objective_value - 12.0).abs() < TOL, "Z = {}", best.objective_value);
    assert!(best.values.iter().all(|v| (v - v.round()).abs() < TOL), "{:?}", best.values);
    assert!(best.graph.and_then(|g| g.integer_optimal_point).is_some());
}

#[test]
fn dual_of_all_le_maximization() {
    use ConstraintSign::*;
    let p = problem(
        Sense::Maximize,
        &["x1", "x2"],
        &[3.0, 5.0],
        &[(vec![1.0, 0.0], Le, 4.0), (vec![0.0, 2.0], Le, 12.0), (vec![3.0, 2.0], Le, 18.0)],
    );
    let dual = p.dual();

    assert_eq!(dual.sense, Sense::Minimize);
    assert_eq!(dual.variables.len(), 3);
    assert_eq!(dual.constraints.len(), 2);
    assert!(dual.variables.iter().all(|v| v.restriction == SignRestriction::NonNegative));

    let solution = Solver::new().solve(&p);
    assert!((solution.objective_value - 36.0).abs() < TOL);
    // slack of the non-binding first row stays basic
    assert_eq!(solution.final_basis(), ["S1", "x2", "x1"]);
    assert!(dual.verify_strong_duality(solution.objective_value, &solution.shadow_prices, TOL));
}

#[test]
fn feasible_polygon_vertices_are_feasible_and_distinct() {
    use ConstraintSign::*;
    let p = problem(
        Sense::Maximize,
        &["x", "y"],
        &[3.0, 5.0],
        &[(vec![1.0, 0.0], Le, 4.0), (vec![0.0, 2.0], Le, 12.0), (vec![3.0, 2.0], Le, 18.0), (vec![1.0, 1.0], Ge, 1.0)],
    );
    let graph = Solver::new().solve(&p).graph.expect("graph for two variables");
    let vertices = &graph.feasible_region;

    assert_eq!(vertices.len(), 6, "{:?}", vertices);
    assert_eq!(&simplexlab_solver::feasible_region(&p), vertices);
    for v in vertices {
        assert!(v.x >= -TOL && v.y >= -TOL);
        for c in &p.constraints {
            assert!(c.is_satisfied(&[v.x, v.y], TOL), "{:?} violates {:?}", v, c);
        }
    }
    for pair in vertices.windows(2) {
        let d = (pair[0].x - pair[1].x).abs().max((pair[0].y - pair[1].y).abs());
        assert!(d > 0.001, "consecutive vertices too close: {:?}", pair);
    }
}
