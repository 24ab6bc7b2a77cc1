// Domain layer: models, ports and the rules that hold on every write.

pub mod model;
pub mod patch;
pub mod ports;
pub mod validation;
