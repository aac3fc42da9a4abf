pub type BoatResult<T> = Result<T, BoatError>;

#[derive(thiserror::Error, Debug)]
pub enum BoatError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoatError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<std::io::Error> for BoatError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            BoatError::config("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(BoatError::command("x").to_string().contains("command error:"));
        assert!(
            BoatError::transport("x")
                .to_string()
                .contains("transport error:")
        );
        assert!(
            BoatError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn io_errors_become_transport_errors() {
        let err: BoatError = std::io::Error::other("refused").into();
        assert!(matches!(err, BoatError::Transport(ref m) if m.contains("refused")));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = BoatError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
