//! Server configuration from the environment

use crate::types::ValidationMode;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub validation_mode: ValidationMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            validation_mode: ValidationMode::Permissive,
        }
    }
}

impl ServerConfig {
    /// Load config from PORT, BIND_ADDR and VALIDATION_MODE.
    /// Unparseable values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ip = match std::env::var("BIND_ADDR") {
            Ok(value) if !value.trim().is_empty() => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid BIND_ADDR '{}', using {}", value, defaults.bind_addr.ip());
                defaults.bind_addr.ip()
            }),
            _ => defaults.bind_addr.ip(),
        };

        let port = match std::env::var("PORT") {
            Ok(value) if !value.trim().is_empty() => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT '{}', using {}", value, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            _ => DEFAULT_PORT,
        };

        let validation_mode = match std::env::var("VALIDATION_MODE") {
            Ok(value) if !value.trim().is_empty() => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using permissive validation", e);
                ValidationMode::Permissive
            }),
            _ => ValidationMode::Permissive,
        };

        Self {
            bind_addr: SocketAddr::new(ip, port),
            validation_mode,
        }
    }
}
