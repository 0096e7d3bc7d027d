//! Backend module - static registry of upstream services

pub mod registry;
