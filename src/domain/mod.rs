// Domain layer: listing model, ports and the pure pipeline stages.
// Nothing here touches the network or the filesystem.

pub mod model;
pub mod ports;

pub mod services;
