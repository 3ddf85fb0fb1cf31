// Domain layer: the payload model and the ports the orchestrator is written against.

pub mod model;
pub mod ports;
