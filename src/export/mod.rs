//! Export of deformed meshes and surface displacement maps.
//!
//! Supports Wavefront OBJ for mesh viewers and 16-bit equirectangular PNG
//! maps of the displaced radius.

mod displacement_map;
mod obj;

pub use displacement_map::{
    export_displacement_png, lat_lon_to_dir, DisplacementMapError, DisplacementMapOptions,
};
pub use obj::{export_mesh_obj, write_obj, ObjExportError};
