//! Resource allocation
//!
//! For each scenario an integer program decides how many trucks of each
//! type and how many firefighter units of each type go to every site:
//!
//! - [`resources`] holds the fixed truck and firefighter catalogue
//! - [`AllocationModel`] builds and solves the program
//! - [`ResourceAllocator`] turns solutions into [`Allocation`] records and
//!   folds solver failures into an infinite-cost outcome

mod allocator;
mod config;
mod model;
pub mod resources;

pub use allocator::{Allocation, AllocationOutcome, ResourceAllocator, ResourceKind, SolveStatus};
pub use config::AllocationConfig;
pub use model::{AllocationModel, ModelSolution};
pub use resources::{FirefighterSpec, FirefighterType, TruckSpec, TruckType};
