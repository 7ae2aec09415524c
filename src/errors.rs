use thiserror::Error;

/// Status returned to the motion driver when an operation succeeded
pub const STATUS_OK: i32 = 0;

/// Status returned to the motion driver for any bus or clock failure
pub const STATUS_FAILURE: i32 = -1;

/// Coarse classification of a failed bus transaction
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusErrorKind {
    #[error("device did not acknowledge")]
    NoAcknowledge,

    #[error("arbitration lost")]
    ArbitrationLoss,

    #[error("bus error")]
    Bus,

    #[error("receive overrun")]
    Overrun,

    #[error("unspecified bus failure")]
    Other,
}

impl From<embedded_hal::i2c::ErrorKind> for BusErrorKind {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match kind {
            ErrorKind::NoAcknowledge(_) => BusErrorKind::NoAcknowledge,
            ErrorKind::ArbitrationLoss => BusErrorKind::ArbitrationLoss,
            ErrorKind::Bus => BusErrorKind::Bus,
            ErrorKind::Overrun => BusErrorKind::Overrun,
            _ => BusErrorKind::Other,
        }
    }
}

/// A bus transaction addressed to `address` did not complete
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("I2C transaction to {address:#04x} failed: {kind}")]
pub struct BusError {
    pub address: u8,
    pub kind: BusErrorKind,
}

impl BusError {
    /// Build from any embedded-hal bus error
    pub fn from_hal<E: embedded_hal::i2c::Error>(address: u8, error: &E) -> Self {
        Self {
            address,
            kind: error.kind().into(),
        }
    }
}

/// Errors surfaced by the hardware access port
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("buffer holds {capacity} byte(s) but {length} were requested")]
    BufferTooShort { length: usize, capacity: usize },

    #[error("write frame of {length} byte(s) exceeds {max}")]
    FrameTooLong { length: usize, max: usize },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Connectivity check errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Device '{device}' access failed: {source}")]
    Access {
        device: String,
        #[source]
        source: PortError,
    },

    #[error("Device '{device}' wrong chip ID: expected one of {expected:02x?}, got {actual:#04x}")]
    WrongChipId {
        device: String,
        expected: Vec<u8>,
        actual: u8,
    },

    #[cfg(feature = "linux-hal")]
    #[error("Bus '{bus}' could not be opened at '{path}': {source}")]
    BusOpen {
        bus: String,
        path: String,
        #[source]
        source: crate::bus::linux::I2CError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Collapse a port result to the single success/failure status the motion
/// driver understands
pub fn status_code<T>(result: &PortResult<T>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(_) => STATUS_FAILURE,
    }
}

/// Result type aliases for convenience
pub type PortResult<T> = Result<T, PortError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ProbeResult<T> = Result<T, ProbeError>;
