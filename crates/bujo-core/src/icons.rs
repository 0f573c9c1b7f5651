use std::borrow::Cow;
use std::collections::HashMap;

use tracing::debug;

#[derive(
  Debug, Clone, PartialEq, Eq, Hash,
)]
pub struct Glyph {
  pub name:   Cow<'static, str>,
  pub symbol: Cow<'static, str>
}

impl Glyph {
  pub const AVATAR_PLACEHOLDER: Self =
    Self::fixed("user", "👤");
  pub const FILE_DONE: Self =
    Self::fixed("file_done", "🗹");
  pub const TAG: Self =
    Self::fixed("tag", "🏷");

  pub const fn fixed(
    name: &'static str,
    symbol: &'static str
  ) -> Self {
    Self {
      name:   Cow::Borrowed(name),
      symbol: Cow::Borrowed(symbol)
    }
  }
}

const BUILTIN_ICONS: &[(&str, &str)] = &[
  ("fire", "🔥"),
  ("star", "⭐"),
  ("heart", "❤"),
  ("bulb", "💡"),
  ("bug", "🐞"),
  ("book", "📖"),
  ("read", "📚"),
  ("home", "🏠"),
  ("bank", "🏦"),
  ("shop", "🛍"),
  ("car", "🚗"),
  ("rocket", "🚀"),
  ("coffee", "☕"),
  ("gift", "🎁"),
  ("trophy", "🏆"),
  ("flag", "🚩"),
  ("calendar", "📅"),
  ("clock", "🕒"),
  ("alarm", "⏰"),
  ("dollar", "💲"),
  ("credit_card", "💳"),
  ("medicine_box", "💊"),
  ("smile", "🙂"),
  ("team", "👥"),
  ("phone", "📞"),
  ("mail", "✉"),
  ("global", "🌐"),
  ("camera", "📷"),
  ("music", "🎵"),
  ("code", "⌨"),
  ("tool", "🔧"),
  ("experiment", "🧪"),
  ("environment", "🌳"),
  ("crown", "👑"),
  ("thunderbolt", "⚡")
];

/// Name to glyph lookup over a fixed registry. The first entry with a
/// given name wins; unknown names resolve to [`Glyph::TAG`].
#[derive(Debug, Clone, PartialEq)]
pub struct IconRegistry {
  entries: Vec<(String, Glyph)>,
  index:   HashMap<String, usize>
}

impl Default for IconRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl IconRegistry {
  pub fn builtin() -> Self {
    Self::with_extra(std::iter::empty())
  }

  /// Builtin entries followed by `extra` (name, symbol) pairs.
  pub fn with_extra<I>(extra: I) -> Self
  where
    I: IntoIterator<Item = (String, String)>
  {
    let mut entries: Vec<(String, Glyph)> =
      BUILTIN_ICONS
        .iter()
        .map(|(name, symbol)| {
          (
            (*name).to_string(),
            Glyph::fixed(*name, *symbol)
          )
        })
        .collect();

    for (name, symbol) in extra {
      let name = name.trim().to_string();
      if name.is_empty() {
        continue;
      }
      entries.push((
        name.clone(),
        Glyph {
          name:   Cow::Owned(name),
          symbol: Cow::Owned(symbol)
        }
      ));
    }

    let mut index = HashMap::with_capacity(
      entries.len()
    );
    for (position, (name, _)) in
      entries.iter().enumerate()
    {
      if index.contains_key(name) {
        debug!(
          icon = %name,
          "icon name shadowed by an \
           earlier registry entry"
        );
        continue;
      }
      index.insert(name.clone(), position);
    }

    Self { entries, index }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Linear first-match scan over the registry.
  pub fn scan(
    &self,
    name: &str
  ) -> Option<&Glyph> {
    self
      .entries
      .iter()
      .find(|(entry, _)| entry == name)
      .map(|(_, glyph)| glyph)
  }

  pub fn resolve(
    &self,
    name: &str
  ) -> Glyph {
    self
      .index
      .get(name)
      .and_then(|position| {
        self.entries.get(*position)
      })
      .map(|(_, glyph)| glyph.clone())
      .unwrap_or(Glyph::TAG)
  }

  pub fn names(
    &self
  ) -> impl Iterator<Item = &str> {
    self
      .entries
      .iter()
      .map(|(name, _)| name.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_names_fall_back_to_tag() {
    let registry = IconRegistry::builtin();
    assert_eq!(
      registry.resolve("tag_outline"),
      Glyph::TAG
    );
    assert_eq!(
      registry.resolve(""),
      Glyph::TAG
    );
  }

  #[test]
  fn known_names_resolve_to_their_glyph() {
    let registry = IconRegistry::builtin();
    let fire = registry.resolve("fire");
    assert_eq!(fire.name, "fire");
    assert_eq!(fire.symbol, "🔥");
  }

  #[test]
  fn index_agrees_with_first_match_scan() {
    let registry =
      IconRegistry::with_extra(vec![
        (
          "fire".to_string(),
          "F".to_string()
        ),
        (
          "plant".to_string(),
          "🌱".to_string()
        ),
      ]);
    for name in registry
      .names()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
    {
      assert_eq!(
        Some(&registry.resolve(&name)),
        registry.scan(&name)
      );
    }
    assert_eq!(
      registry.resolve("fire").symbol,
      "🔥"
    );
    assert_eq!(
      registry.resolve("plant").symbol,
      "🌱"
    );
  }

  #[test]
  fn blank_extra_names_are_skipped() {
    let registry =
      IconRegistry::with_extra(vec![(
        "   ".to_string(),
        "?".to_string()
      )]);
    assert_eq!(
      registry.len(),
      IconRegistry::builtin().len()
    );
  }
}
