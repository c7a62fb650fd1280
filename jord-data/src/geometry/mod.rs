//! Raw anchor geometry and extraction into world-space surfaces

mod errors;
mod extract;
mod source;

pub use errors::GeometryError;
pub use extract::extract_surface;
pub use source::{
    FaceElement, INDEX_SIZE, INDICES_PER_TRIANGLE, POSITION_SIZE, RawGeometry, VertexSource,
};
