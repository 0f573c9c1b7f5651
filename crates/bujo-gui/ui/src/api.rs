use serde::{
  Serialize,
  de::DeserializeOwned
};
use tauri_wasm::{
  args,
  invoke
};

/// Calls a command on the host. Every failure is flattened to a
/// message for the notification feed.
pub async fn invoke_tauri<R, A>(
  cmd: &str,
  args_payload: &A
) -> Result<R, String>
where
  R: DeserializeOwned,
  A: Serialize + ?Sized
{
  let payload = args(args_payload)
    .map_err(|e| {
      format!("failed to encode args: {e}")
    })?;
  let value = invoke(cmd)
    .with_args(payload)
    .await
    .map_err(|e| {
      format!("{cmd} failed: {e:?}")
    })?;

  serde_wasm_bindgen::from_value(value)
    .map_err(|e| {
      format!("{cmd} returned bad data: {e}")
    })
}
