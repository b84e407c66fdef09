use std::fmt;

/// Whether a wallet provider can be used in the current host environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub enum ReadyState {
    /// The host cannot run this wallet at all (no `window`, not inside the
    /// wallet's iframe...). This state is terminal.
    Unsupported,
    /// The provider has not been found yet. The user may still install it.
    NotDetected,
    /// The provider can be loaded on demand.
    Loadable,
    /// The provider was found in the host environment.
    Installed,
}

impl ReadyState {
    /// `true` if a connection may be attempted in this state.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Loadable | Self::Installed)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "Unsupported"),
            Self::NotDetected => write!(f, "NotDetected"),
            Self::Loadable => write!(f, "Loadable"),
            Self::Installed => write!(f, "Installed"),
        }
    }
}
