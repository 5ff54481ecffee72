//! Domain types shared by every backend

pub mod entities;
pub mod value_objects;
