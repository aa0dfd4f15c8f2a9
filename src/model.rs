pub mod departure;
pub mod golemio_api_model;
pub mod named_stop;
pub mod shape;
