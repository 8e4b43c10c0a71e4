#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("Failed to initialize logging: {0}")]
    InitError(String),
}
