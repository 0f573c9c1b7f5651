use std::fs;
use std::io::Write;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tempfile::NamedTempFile;
use tracing::{
  debug,
  info,
  warn
};

use crate::store::AccountSnapshot;

/// JSON file holding the account state the local authority serves.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
  pub path: PathBuf
}

impl SnapshotFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// `--snapshot` if given, else `<data_dir>/bujo/snapshot.json`.
  pub fn resolve(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    if let Some(path) = override_path {
      return Ok(Self::new(path));
    }
    let dir = dirs::data_dir().ok_or_else(|| {
      anyhow!(
        "cannot determine data \
         directory"
      )
    })?;
    Ok(Self::new(
      dir.join("bujo").join("snapshot.json")
    ))
  }

  #[tracing::instrument(skip(self), fields(file = %self.path.display()))]
  pub fn load(
    &self
  ) -> anyhow::Result<AccountSnapshot> {
    if !self.path.exists() {
      warn!(
        "snapshot file missing; starting \
         from an empty account"
      );
      return Ok(AccountSnapshot::default());
    }

    let text = fs::read_to_string(&self.path)
      .with_context(|| {
        format!(
          "failed reading {}",
          self.path.display()
        )
      })?;
    let snapshot: AccountSnapshot =
      serde_json::from_str(&text)
        .with_context(|| {
          format!(
            "failed parsing {}",
            self.path.display()
          )
        })?;
    debug!(
      projects = snapshot.project_ids().len(),
      "loaded snapshot"
    );
    Ok(snapshot)
  }

  #[tracing::instrument(skip(self, snapshot), fields(file = %self.path.display()))]
  pub fn save(
    &self,
    snapshot: &AccountSnapshot
  ) -> anyhow::Result<()> {
    let dir = self
      .path
      .parent()
      .filter(|dir| !dir.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(
      || {
        format!(
          "failed to create {}",
          dir.display()
        )
      }
    )?;

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(
      &mut temp, snapshot
    )?;
    writeln!(temp)?;
    temp.flush()?;
    temp.persist(&self.path).map_err(|err| {
      anyhow!(
        "failed to persist {}: {}",
        self.path.display(),
        err
      )
    })?;

    info!("saved snapshot");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_loads_as_empty_account() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let file = SnapshotFile::new(
      dir.path().join("snapshot.json")
    );
    assert_eq!(
      file.load().expect("load"),
      AccountSnapshot::default()
    );
  }

  #[test]
  fn save_creates_parent_directories() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let file = SnapshotFile::new(
      dir
        .path()
        .join("nested")
        .join("snapshot.json")
    );
    let mut snapshot =
      AccountSnapshot::default();
    snapshot.myself.username =
      "mia".to_string();

    file.save(&snapshot).expect("save");
    assert_eq!(
      file.load().expect("reload"),
      snapshot
    );
  }
}
