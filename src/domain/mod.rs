// Domain layer: document records, heuristic policy and the ports the pipeline runs through.

pub mod model;
pub mod policy;
pub mod ports;
