pub mod authority;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
pub mod config;
#[cfg(feature = "cli")]
pub mod datastore;
pub mod datetime;
pub mod gateway;
pub mod icons;
pub mod label_color;
pub mod menu;
pub mod model;
pub mod refresh;
#[cfg(feature = "cli")]
pub mod render;
pub mod store;
pub mod summary;

#[cfg(feature = "cli")]
use std::ffi::OsString;

#[cfg(feature = "cli")]
use anyhow::Context;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use tracing::info;

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting bujo CLI"
  );

  let cfg = config::Config::load(
    cli.config.as_deref()
  )?;

  let file = datastore::SnapshotFile::resolve(
    cli.snapshot.as_deref()
  )
  .context(
    "failed to resolve snapshot \
     file"
  )?;

  let renderer = render::Renderer::new();
  commands::dispatch(
    cfg,
    file,
    &renderer,
    cli.command
  )?;

  info!("done");
  Ok(())
}
