//! Application services built on the infrastructure layer

pub mod services;
