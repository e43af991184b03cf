use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockPulseError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::parser::ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] crate::network::ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
