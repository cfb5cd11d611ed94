use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NoPlayers,
    PaletteTooShort { colors: usize, players: usize },
    EmptySampleBuffer,
    InvalidValue { field: &'static str, value: f32 },
    InvalidDwell { min: f32, max: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlayers => write!(f, "player count must be at least 1"),
            Self::PaletteTooShort { colors, players } => write!(
                f,
                "palette has {colors} colors but {players} players need one each"
            ),
            Self::EmptySampleBuffer => write!(f, "audio sample count must be non-zero"),
            Self::InvalidValue { field, value } => {
                write!(f, "{field} must be finite and non-negative, got {value}")
            }
            Self::InvalidDwell { min, max } => {
                write!(f, "simulated dwell range [{min}, {max}) is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
