/// Deterministic `#RRGGBB` colour for a label value.
///
/// The hash walks UTF-16 code units with 32-bit wrapping arithmetic so
/// a label keeps the same colour as on every other client of the
/// journal service.
pub fn string_to_rgb(value: &str) -> String {
  let hash = value
    .encode_utf16()
    .fold(0_i32, |hash, unit| {
      i32::from(unit).wrapping_add(
        hash
          .wrapping_shl(5)
          .wrapping_sub(hash)
      )
    });
  format!("#{:06X}", hash & 0x00ff_ffff)
}
