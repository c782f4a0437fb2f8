pub mod leads;
pub mod locations;
