//! Geospatial collaborator for OWF stress maps.
//!
//! Loads read-only basin features from a GeoJSON-style file and resolves
//! the basin identifiers used in scenario tables to the identifiers used
//! by the feature set, so stress values can be joined to map polygons.

pub mod features;
pub mod resolver;
