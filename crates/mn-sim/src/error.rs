use thiserror::Error;

use mn_core::ConfigError;
use mn_measure::MeasureError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid experiment configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("measurement output failed: {0}")]
    Measure(#[from] MeasureError),

    #[error("routing engine runs {engine} but the experiment is configured for {configured}")]
    ProtocolMismatch {
        engine:     mn_core::RoutingProtocol,
        configured: mn_core::RoutingProtocol,
    },
}

pub type SimResult<T> = Result<T, SimError>;
