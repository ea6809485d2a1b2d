pub mod locations;
pub mod map;
pub mod plans;
pub mod routes;
pub mod stations;
pub mod vehicles;
