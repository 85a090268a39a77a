use core::{error, fmt};

// -----------------------------------------------------------------------------
// ResolveError

/// No strategy in the chain produced a formatter for a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveError {
    pub type_name: &'static str,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no formatter resolved for type `{}`", self.type_name)
    }
}

impl error::Error for ResolveError {}

// -----------------------------------------------------------------------------
// ConfigError

/// The builder rejected a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub type_name: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "an override for type `{}` is already registered",
            self.type_name
        )
    }
}

impl error::Error for ConfigError {}
