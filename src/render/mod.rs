//! View models for the filtered centers: what the map and table show,
//! independent of egui.

pub mod map;
pub mod table;
