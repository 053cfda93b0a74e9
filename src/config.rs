use clap::{Parser, ValueEnum};

/// Shared store used for multiplayer games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SyncBackend {
    /// No store: create/join report that multiplayer is unavailable.
    #[default]
    Offline,
    /// In-process store; host and guest seats share this terminal.
    Memory,
}

/// Two-player chess on a terminal grid.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Config {
    /// Shared-state backend for multiplayer games
    #[arg(long, value_enum, default_value_t = SyncBackend::Offline)]
    pub sync: SyncBackend,

    /// Starting position as a FEN piece-placement field
    #[arg(long)]
    pub placement: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_offline() {
        let config = Config::try_parse_from(["duo-chess"]).unwrap();
        assert_eq!(config.sync, SyncBackend::Offline);
        assert_eq!(config.placement, None);
    }

    #[test]
    fn test_parse_memory_backend() {
        let config = Config::try_parse_from(["duo-chess", "--sync", "memory"]).unwrap();
        assert_eq!(config.sync, SyncBackend::Memory);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Config::try_parse_from(["duo-chess", "--sync", "firebase"]).is_err());
    }
}
