//! Error types for network construction and search configuration.
//!
//! Search dynamics never fail: a constructor that runs out of edges simply
//! returns what it built. Only malformed input graphs and invalid
//! configurations are reported as errors, before any search starts.

use std::fmt::{Debug, Display};

/// Rejected input while building a [`Network`](crate::network::Network).
#[derive(Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A station with this name was already added.
    DuplicateStation(String),
    /// A connection refers to a station that does not exist.
    UnknownStation(String),
    /// Both endpoints of a connection are the same station.
    SelfLoop(String),
    /// A connection between these two stations already exists.
    DuplicateConnection(String, String),
    /// Connections must take at least one minute.
    ZeroWeight(String, String),
}

impl std::error::Error for NetworkError {}

impl Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

impl Debug for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::DuplicateStation(name) => {
                write!(f, "Station {} is defined more than once", name)
            }
            NetworkError::UnknownStation(name) => {
                write!(f, "Station {} is not part of the network", name)
            }
            NetworkError::SelfLoop(name) => {
                write!(f, "Connection from {} to itself is not allowed", name)
            }
            NetworkError::DuplicateConnection(a, b) => {
                write!(f, "Connection between {} and {} is defined more than once", a, b)
            }
            NetworkError::ZeroWeight(a, b) => {
                write!(
                    f,
                    "Connection between {} and {} must take a positive number of minutes",
                    a, b
                )
            }
        }
    }
}

/// Rejected search configuration. No valid solution can be produced from it.
#[derive(Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTimeLimit,
    ZeroMaxRoutes,
    ZeroBeamWidth,
    /// The network has no station or no connection to cover.
    EmptyNetwork,
}

impl std::error::Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroTimeLimit => write!(f, "Bad configuration, time_limit must be positive"),
            ConfigError::ZeroMaxRoutes => write!(f, "Bad configuration, max_routes must be positive"),
            ConfigError::ZeroBeamWidth => write!(f, "Bad configuration, beam_width must be positive"),
            ConfigError::EmptyNetwork => {
                write!(f, "Bad configuration, the network has no connection to cover")
            }
        }
    }
}
