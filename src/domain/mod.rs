// Domain layer: run context, stages and the ports the launcher drives.

pub mod model;
pub mod ports;
