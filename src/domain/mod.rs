// Domain layer: trend models and ports (adapter + candidate traits).

pub mod model;
pub mod ports;
