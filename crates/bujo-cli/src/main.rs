use std::process::ExitCode;

fn main() -> ExitCode {
  match bujo_core::run(
    std::env::args_os().collect()
  ) {
    | Ok(()) => ExitCode::SUCCESS,
    | Err(err) => {
      eprintln!("bujo: {err:#}");
      ExitCode::FAILURE
    }
  }
}
