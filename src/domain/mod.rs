// Domain layer: core models and ports (interfaces) shared by the analyzer and the crawler.

pub mod model;
pub mod ports;
