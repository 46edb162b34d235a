use std::path::PathBuf;

use crate::data::aggregate::RankLimits;
use crate::data::loader::LoadOptions;

pub const DATA_PATH_ENV: &str = "SALES_DASHBOARD_DATA";
pub const REQUIRE_DATE_ENV: &str = "SALES_DASHBOARD_REQUIRE_DATE";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Dataset loaded at start-up and by "Reload". `None` = upload only.
    pub data_path: Option<PathBuf>,
    pub require_order_date: bool,
    pub limits: RankLimits,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            require_order_date: true,
            limits: RankLimits::default(),
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
        }
    }
}

impl DashboardConfig {
    /// Build from the process arguments and environment.
    pub fn from_env() -> Self {
        let arg = std::env::args_os().nth(1);
        let path = std::env::var_os(DATA_PATH_ENV);
        let require = std::env::var(REQUIRE_DATE_ENV).ok();
        Self::resolve(arg.map(PathBuf::from), path.map(PathBuf::from), require.as_deref())
    }

    /// The CLI argument wins over the environment variable.
    fn resolve(arg: Option<PathBuf>, env_path: Option<PathBuf>, require_date: Option<&str>) -> Self {
        let mut config = Self {
            data_path: arg.or(env_path),
            ..Self::default()
        };
        if let Some(flag) = require_date {
            config.require_order_date = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        config
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_order_date: self.require_order_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::resolve(None, None, None);
        assert_eq!(config, DashboardConfig::default());
        assert!(config.load_options().require_order_date);
        assert_eq!(config.limits.products, 10);
        assert_eq!(config.limits.states, Some(15));
    }

    #[test]
    fn test_argument_beats_environment() {
        let config = DashboardConfig::resolve(
            Some(PathBuf::from("arg.csv")),
            Some(PathBuf::from("env.csv")),
            None,
        );
        assert_eq!(config.data_path, Some(PathBuf::from("arg.csv")));

        let config = DashboardConfig::resolve(None, Some(PathBuf::from("env.csv")), None);
        assert_eq!(config.data_path, Some(PathBuf::from("env.csv")));
    }

    #[test]
    fn test_require_date_flag() {
        for off in ["0", "false", "OFF", " no "] {
            assert!(!DashboardConfig::resolve(None, None, Some(off)).require_order_date);
        }
        assert!(DashboardConfig::resolve(None, None, Some("1")).require_order_date);
    }
}
