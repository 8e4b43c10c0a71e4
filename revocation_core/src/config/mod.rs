pub mod settings;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
