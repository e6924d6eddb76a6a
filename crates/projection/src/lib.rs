//! Coordinate reference system transformations.
//!
//! Implements the map projections used by the grid crates from scratch:
//! plain longitude/latitude, Mercator, polar stereographic and Lambert
//! Conformal Conic. Projections are looked up by EPSG code or parsed from
//! proj strings, and chained through geographic coordinates by [`Transformer`].

pub mod ellipsoid;
pub mod epsg;
pub mod error;
pub mod lambert;
pub mod mercator;
pub mod polar;
pub mod proj_string;
pub mod transform;

pub use ellipsoid::Ellipsoid;
pub use epsg::{lookup_epsg, EpsgDefinition, SUPPORTED_EPSG_CODES};
pub use error::ProjectionError;
pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use polar::PolarStereographic;
pub use proj_string::{is_proj_string, parse_proj_string};
pub use transform::{Projection, Transformer};
