pub mod cluster;
pub mod geo;
pub mod lifecycle;
pub mod locations;
pub mod scene;
