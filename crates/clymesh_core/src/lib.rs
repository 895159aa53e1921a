//! Public library API for recovering mesh geometry from FreeForm `.cly` files.

/// Format detection, structural analysis, mesh extraction, and STL export.
pub mod cly;
