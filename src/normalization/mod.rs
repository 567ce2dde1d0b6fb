//! Pure payload-to-row transformations. Nothing in this module performs I/O.

pub mod champions;
pub mod matches;
