pub mod lead;
pub mod location;
