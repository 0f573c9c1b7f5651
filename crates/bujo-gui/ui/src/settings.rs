use bujo_core::config::Config;
use bujo_core::icons::IconRegistry;
use chrono_tz::Tz;

const EMBEDDED: &str =
  include_str!("../assets/bujo.toml");

/// Config plus what is derived from it once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub config: Config,
  pub icons:  IconRegistry,
  pub tz:     Tz
}

impl Settings {
  pub fn embedded() -> Self {
    let config = Config::from_toml_str(
      EMBEDDED
    )
    .unwrap_or_else(|error| {
      tracing::warn!(
        %error,
        "embedded config rejected; using \
         defaults"
      );
      Config::default()
    });
    Self::from_config(config)
  }

  pub fn from_config(config: Config) -> Self {
    Self {
      icons: config.icon_registry(),
      tz: config.default_tz(),
      config
    }
  }
}
