//! Server configuration.

use tankforge_battle::BattleConfig;
use tankforge_cards::PackConfig;
use tankforge_transport::DEFAULT_MAX_FRAME_LEN;

use crate::TankforgeError;

/// Everything needed to start a server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the TCP listener binds to.
    pub bind_addr: String,

    /// Longest inbound line accepted, in bytes.
    pub max_frame_len: usize,

    pub packs: PackConfig,

    pub battle: BattleConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            packs: PackConfig::default(),
            battle: BattleConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Checks the settings that belong to the server itself. Pack and
    /// battle settings are checked by their own components.
    pub fn validate(&self) -> Result<(), TankforgeError> {
        if self.max_frame_len == 0 {
            return Err(TankforgeError::InvalidConfig(
                "max frame length must be positive".into(),
            ));
        }
        if self.bind_addr.is_empty() {
            return Err(TankforgeError::InvalidConfig(
                "bind address must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.packs.inventory, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_frame_len_is_rejected() {
        let config = ServerConfig {
            max_frame_len: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TankforgeError::InvalidConfig(_))
        ));
    }
}
