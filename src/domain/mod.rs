// Domain layer: pricing types and the ports the estimator talks through.

pub mod model;
pub mod ports;
