use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or driving a simulation.
///
/// Construction failures never touch an existing [`crate::Ensemble`]; stepping
/// an ensemble has no error path at all.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected ensemble, run or sweep parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// YAML configuration could not be parsed or serialised.
    #[error("configuration format error: {0}")]
    Config(#[from] serde_yml::Error),

    /// Config file or result log I/O.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_message_names_the_problem() {
        let e = Error::invalid("particle count 10 is not a perfect square");
        let msg = format!("{e}");
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("perfect square"));
    }
}
