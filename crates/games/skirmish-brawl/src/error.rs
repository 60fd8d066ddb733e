/// Failure to load a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse { path: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::Parse { path, message } => write!(f, "failed to parse {path}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}
