pub mod logger;
pub mod ser_pipeline;
