//! Simulation dynamics: integration and the contact/joint solver.

pub mod integrator;
pub mod solver;

pub use integrator::Integrator;
pub use solver::{ContactSolver, SolverStepMetrics};
