//! Core value types and the geometry codec for the map bridge.
//!
//! The scripting layer talks to the map SDK in JSON text. This crate parses
//! that text into typed geometry and styling values (coordinates, bounds,
//! camera states, colors, paths, holes) and renders them back. Entity
//! handling lives in `mapbridge-entity`.

pub mod codec;
pub mod error;
pub mod geometry;
pub mod spherical;
pub mod value;

pub use codec::{
    render_bounds, render_camera_state, render_color, render_coordinate, render_holes,
    render_location, render_number_sequence, render_path, to_bounds, to_camera_state, to_color,
    to_color_sequence, to_coordinate, to_hole_sequence, to_location, to_number_sequence, to_path,
};
pub use error::CodecError;
pub use geometry::{Bounds, CameraState, Color, Coordinate, Location, Path};
pub use value::{
    Mapping, MappingExt, StructuredValue, parse_mapping, parse_sequence, render_mapping,
    render_sequence,
};
