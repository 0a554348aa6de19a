use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("failed to read local address: {0}")]
    LocalAddr(std::io::Error),
    #[error("server error: {0}")]
    Server(String),
}
