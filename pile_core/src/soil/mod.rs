//! # Soil Profiles
//!
//! The stratigraphy model every calculation reads from: soil layers with
//! depth bounds, soil description and SPT blow count, plus the depth lookups
//! and soil categorization built on them.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::soil::{SoilCategory, SoilLayer, Stratigraphy};
//!
//! let profile = Stratigraphy::new(vec![
//!     SoilLayer::new(0.0, 3.0, "Argila Arenosa", 6.0),
//!     SoilLayer::new(3.0, 8.0, "Areia Siltosa", 22.0),
//! ]).unwrap();
//!
//! let layer = profile.layer_at(4.5).unwrap();
//! assert_eq!(layer.soil_type.category(), SoilCategory::Sand);
//! ```

pub mod category;
pub mod layer;
pub mod stratigraphy;

pub use category::{SoilCategory, SoilType};
pub use layer::SoilLayer;
pub use stratigraphy::{Stratigraphy, DEPTH_TOLERANCE_M};
