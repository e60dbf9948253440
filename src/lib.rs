pub mod light_field;
pub mod logger;
