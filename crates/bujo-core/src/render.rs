use std::io::{
  self,
  IsTerminal,
  Write
};

use unicode_width::UnicodeWidthStr;

use crate::gateway::MutationTracker;
use crate::menu::{
  ActionMenu,
  MenuState
};
use crate::summary::{
  AvatarBadge,
  AvatarSource,
  TaskSummary
};

#[derive(Debug, Clone)]
pub struct Renderer {
  color: bool
}

impl Renderer {
  pub fn new() -> Self {
    Self {
      color: io::stdout().is_terminal()
    }
  }

  pub fn plain() -> Self {
    Self { color: false }
  }

  #[tracing::instrument(skip(self, summaries))]
  pub fn print_summaries(
    &self,
    summaries: &[TaskSummary]
  ) -> anyhow::Result<()> {
    self.write_summaries(
      io::stdout().lock(),
      summaries
    )
  }

  pub fn write_summaries<W: Write>(
    &self,
    out: W,
    summaries: &[TaskSummary]
  ) -> anyhow::Result<()> {
    let headers = vec![
      "ID".to_string(),
      "Phase".to_string(),
      "Name".to_string(),
      "Labels".to_string(),
      "Due".to_string(),
      "Owner".to_string(),
      "Assignee".to_string(),
    ];

    let rows = summaries
      .iter()
      .map(|summary| {
        let labels = summary
          .labels
          .iter()
          .map(|label| {
            self.paint_hex(
              &format!(
                "{}{}",
                label.glyph.symbol, label.value
              ),
              &label.color
            )
          })
          .collect::<Vec<_>>()
          .join(" ");

        vec![
          self.paint(
            &summary.task_id.to_string(),
            "33"
          ),
          summary.phase.as_str().to_string(),
          format!(
            "{} {}",
            summary.name_glyph.symbol,
            summary.name
          ),
          labels,
          summary
            .due_phrase
            .clone()
            .unwrap_or_default(),
          badge_text(&summary.owner),
          badge_text(&summary.assignee),
        ]
      })
      .collect();

    write_table(out, headers, rows)
  }

  #[tracing::instrument(skip(self, menu, tracker))]
  pub fn print_menu(
    &self,
    menu: &ActionMenu,
    tracker: &MutationTracker
  ) -> anyhow::Result<()> {
    self.write_menu(
      io::stdout().lock(),
      menu,
      tracker
    )
  }

  /// One line per entry; entries whose mutation is in flight are
  /// marked busy.
  pub fn write_menu<W: Write>(
    &self,
    mut out: W,
    menu: &ActionMenu,
    tracker: &MutationTracker
  ) -> anyhow::Result<()> {
    writeln!(
      out,
      "task {} ({})",
      menu.task_id(),
      menu.phase().as_str()
    )?;
    for entry in menu.entries() {
      let busy = menu
        .mutation_for(entry.action)
        .is_some_and(|mutation| {
          tracker.contains(mutation)
        });
      let label = if entry.destructive {
        self.paint(entry.label(), "31")
      } else {
        entry.label().to_string()
      };
      if busy {
        writeln!(out, "  {label} (busy)")?;
      } else {
        writeln!(out, "  {label}")?;
      }
    }
    if let MenuState::Confirming(action) =
      menu.state()
    {
      writeln!(
        out,
        "confirming {}",
        action.label()
      )?;
    }
    Ok(())
  }

  fn paint(
    &self,
    text: &str,
    code: &str
  ) -> String {
    if !self.color {
      return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
  }

  fn paint_hex(
    &self,
    text: &str,
    hex: &str
  ) -> String {
    match parse_hex(hex) {
      | Some((r, g, b)) => self.paint(
        text,
        &format!("38;2;{r};{g};{b}")
      ),
      | None => text.to_string()
    }
  }
}

impl Default for Renderer {
  fn default() -> Self {
    Self::new()
  }
}

fn badge_text(badge: &AvatarBadge) -> String {
  match &badge.source {
    | AvatarSource::Url(_) => {
      badge.tooltip.clone()
    }
    | AvatarSource::Placeholder(glyph) => {
      format!(
        "{} {}",
        glyph.symbol, badge.tooltip
      )
    }
  }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
  let digits = hex.strip_prefix('#')?;
  if digits.len() != 6 {
    return None;
  }
  let channel = |range: std::ops::Range<usize>| {
    u8::from_str_radix(digits.get(range)?, 16)
      .ok()
  };
  Some((
    channel(0..2)?,
    channel(2..4)?,
    channel(4..6)?
  ))
}

fn write_table<W: Write>(
  mut writer: W,
  headers: Vec<String>,
  rows: Vec<Vec<String>>
) -> anyhow::Result<()> {
  let column_count = headers.len();
  let mut widths = vec![0usize; column_count];

  for (idx, header) in
    headers.iter().enumerate()
  {
    widths[idx] = widths[idx].max(
      UnicodeWidthStr::width(header.as_str())
    );
  }

  for row in &rows {
    for (idx, cell) in row.iter().enumerate()
    {
      widths[idx] = widths[idx].max(
        UnicodeWidthStr::width(
          strip_ansi(cell).as_str()
        )
      );
    }
  }

  for (header, width) in
    headers.iter().zip(&widths)
  {
    write!(
      writer,
      "{:width$} ",
      header,
      width = *width
    )?;
  }
  writeln!(writer)?;

  for width in &widths {
    write!(
      writer,
      "{:-<width$} ",
      "",
      width = *width
    )?;
  }
  writeln!(writer)?;

  for row in rows {
    for (cell, width) in row.iter().zip(&widths)
    {
      let visible = UnicodeWidthStr::width(
        strip_ansi(cell).as_str()
      );
      let padding =
        width.saturating_sub(visible);
      write!(
        writer,
        "{}{} ",
        cell,
        " ".repeat(padding)
      )?;
    }
    writeln!(writer)?;
  }

  Ok(())
}

fn strip_ansi(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut escaped = false;

  for ch in s.chars() {
    if escaped {
      if ch == 'm' {
        escaped = false;
      }
      continue;
    }

    if ch == '\x1b' {
      escaped = true;
      continue;
    }

    out.push(ch);
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gateway::{
    Dispatch,
    RemoteCall,
    TaskGateway
  };
  use crate::model::{
    Person,
    Task,
    TaskView
  };

  #[test]
  fn table_columns_align_on_display_width() {
    let mut out = Vec::new();
    write_table(
      &mut out,
      vec!["A".to_string(), "B".to_string()],
      vec![
        vec!["🔥x".to_string(), "1".to_string()],
        vec!["y".to_string(), "2".to_string()],
      ]
    )
    .expect("write table");
    let text =
      String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "A   B ");
    assert_eq!(lines[2], "🔥x 1 ");
    assert_eq!(lines[3], "y   2 ");
  }

  struct Sink;

  impl Dispatch for Sink {
    fn dispatch(&self, _call: RemoteCall) {}
  }

  #[test]
  fn menu_marks_in_flight_entries_busy() {
    let view = TaskView::Completed(Task::new(
      4,
      1,
      "Paint fence",
      Person {
        name:   "mia".to_string(),
        avatar: None
      }
    ));
    let menu = ActionMenu::for_view(&view);
    let tracker = MutationTracker::new();
    TaskGateway::new(Sink, tracker.clone())
      .uncomplete(4);

    let mut out = Vec::new();
    Renderer::plain()
      .write_menu(&mut out, &menu, &tracker)
      .expect("write menu");
    assert_eq!(
      String::from_utf8(out).expect("utf8"),
      "task 4 (completed)\n  Uncomplete \
       (busy)\n  Delete\n"
    );
  }

  #[test]
  fn hex_colors_parse_into_channels() {
    assert_eq!(
      parse_hex("#1DD341"),
      Some((0x1d, 0xd3, 0x41))
    );
    assert_eq!(parse_hex("1DD341"), None);
    assert_eq!(parse_hex("#12"), None);
  }
}
