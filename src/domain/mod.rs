// Domain layer: core models and ports (interfaces) for every external service.

pub mod model;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;
