// Pipeline processing: cleaning, joining and rule validation over extracted
// tables

pub mod join;
pub mod transform;
pub mod validate;
