pub mod lead_service;
pub mod location_registry;
pub mod normalize;
