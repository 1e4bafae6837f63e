//! # pile_core - Pile Axial Capacity Engine
//!
//! `pile_core` sizes deep foundations from SPT borings with the Brazilian
//! semi-empirical methods: Aoki-Velloso and Décourt-Quaresma (aggregate and
//! per 1 m segment). All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and coefficient tables and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Explicit Tables**: Coefficients are passed in, never read from globals
//!
//! ## Quick Start
//!
//! ```rust
//! use pile_core::calculations::decourt_quaresma::{calculate, DecourtQuaresmaFactors, DecourtQuaresmaInput};
//! use pile_core::coefficients::{DecourtQuaresmaCoefficients, DecourtQuaresmaTable};
//! use pile_core::pile::PileGeometry;
//! use pile_core::soil::{SoilLayer, Stratigraphy};
//!
//! let input = DecourtQuaresmaInput {
//!     label: "E-1".to_string(),
//!     layers: Stratigraphy::new(vec![
//!         SoilLayer::new(0.0, 2.0, "Areia", 15.0),
//!         SoilLayer::new(2.0, 5.0, "Argila", 8.0),
//!     ])
//!     .unwrap(),
//!     tip_spt: 20.0,
//!     geometry: PileGeometry::new(0.2, 1.0),
//!     factors: DecourtQuaresmaFactors::default(),
//!     tip_soil_type: Some("Areia".into()),
//! };
//! let table = DecourtQuaresmaTable::new()
//!     .with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0))
//!     .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0));
//!
//! let result = calculate(&input, &table).unwrap();
//! assert!((result.admissible_load_kn - 112.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`soil`] - Soil types, categories, layers and the stratigraphy accessor
//! - [`pile`] - Pile geometry and execution types
//! - [`coefficients`] - Coefficient tables for each method
//! - [`calculations`] - The capacity methods and stored pile designs
//! - [`borehole`] - SPT boring records and the registry
//! - [`project`] - Project container, metadata, and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod borehole;
pub mod calculations;
pub mod coefficients;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod pile;
pub mod project;
pub mod soil;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use borehole::{BoreholeRecord, BoreholeRegistry};
pub use coefficients::CoefficientSet;
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{GlobalSettings, Project, ProjectMetadata};
