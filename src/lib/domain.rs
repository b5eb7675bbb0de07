//! Domain types and services

pub mod clock;
pub mod communication;
pub mod registrations;
