use std::collections::BTreeMap;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{
  Path,
  PathBuf
};

#[cfg(feature = "cli")]
use anyhow::Context;
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
#[cfg(feature = "cli")]
use tracing::info;
use tracing::warn;

use crate::datetime::parse_timezone;
use crate::icons::IconRegistry;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct Config {
  pub time:    TimeConfig,
  pub menu:    MenuConfig,
  pub gateway: GatewayConfig,
  pub refresh: RefreshConfig,
  pub icons:   IconsConfig
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct TimeConfig {
  /// Zone for due dates that carry none.
  pub default_timezone: String
}

impl Default for TimeConfig {
  fn default() -> Self {
    Self {
      default_timezone: "UTC".to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MenuPlacement {
  #[default]
  BottomRight,
  BottomLeft,
  TopRight,
  TopLeft
}

impl MenuPlacement {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::BottomRight => "bottom-right",
      | Self::BottomLeft => "bottom-left",
      | Self::TopRight => "top-right",
      | Self::TopLeft => "top-left"
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct MenuConfig {
  pub placement: MenuPlacement,
  pub width_px:  u32
}

impl Default for MenuConfig {
  fn default() -> Self {
    Self {
      placement: MenuPlacement::BottomRight,
      width_px:  120
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct GatewayConfig {
  /// Drop a mutation while the same (task, kind) is still in flight.
  pub dedupe_in_flight: bool
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      dedupe_in_flight: true
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct RefreshConfig {
  pub reconcile_after_mutation: bool
}

impl Default for RefreshConfig {
  fn default() -> Self {
    Self {
      reconcile_after_mutation: true
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct IconsConfig {
  pub extra: BTreeMap<String, String>
}

impl Config {
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg: Config = toml::from_str(text)?;
    parse_timezone(
      &cfg.time.default_timezone
    )?;
    Ok(cfg)
  }

  /// Reads `override_path`, else the per-user config file, else falls
  /// back to defaults.
  #[cfg(feature = "cli")]
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let path = match override_path {
      | Some(path) => Some(path.to_path_buf()),
      | None => default_config_path()
        .filter(|path| path.exists())
    };

    let Some(path) = path else {
      warn!(
        "no config found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "invalid config {}",
          path.display()
        )
      })
  }

  pub fn default_tz(&self) -> Tz {
    parse_timezone(
      &self.time.default_timezone
    )
    .unwrap_or_else(|error| {
      warn!(%error, "falling back to UTC");
      Tz::UTC
    })
  }

  pub fn icon_registry(&self) -> IconRegistry {
    IconRegistry::with_extra(
      self.icons.extra.clone()
    )
  }
}

#[cfg(feature = "cli")]
pub fn default_config_path()
-> Option<PathBuf> {
  dirs::config_dir().map(|dir| {
    dir.join("bujo").join("bujo.toml")
  })
}
