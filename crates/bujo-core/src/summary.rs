use bujo_gui_shared::TaskId;
use chrono::{
  DateTime,
  Utc
};

use crate::datetime::from_now;
use crate::icons::{
  Glyph,
  IconRegistry
};
use crate::label_color::string_to_rgb;
use crate::model::{
  Person,
  Phase,
  TaskView
};

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct LabelTag {
  pub id:    u64,
  pub value: String,
  pub glyph: Glyph,
  pub color: String
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum AvatarSource {
  Url(String),
  Placeholder(Glyph)
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct AvatarBadge {
  pub tooltip: String,
  pub source:  AvatarSource
}

impl AvatarBadge {
  fn for_person(
    role: &str,
    person: Option<&Person>
  ) -> Self {
    match person {
      | Some(person) => Self {
        tooltip: format!(
          "{role} {}",
          person.name
        ),
        source:  person
          .avatar
          .clone()
          .map(AvatarSource::Url)
          .unwrap_or(
            AvatarSource::Placeholder(
              Glyph::AVATAR_PLACEHOLDER
            )
          )
      },
      | None => Self {
        tooltip: format!("{role} none"),
        source:  AvatarSource::Placeholder(
          Glyph::AVATAR_PLACEHOLDER
        )
      }
    }
  }
}

/// Everything the task row shows, derived from one [`TaskView`].
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct TaskSummary {
  pub task_id:     TaskId,
  pub phase:       Phase,
  pub name:        String,
  pub name_glyph:  Glyph,
  pub detail_path: String,
  pub labels:      Vec<LabelTag>,
  pub due_phrase:  Option<String>,
  pub owner:       AvatarBadge,
  pub assignee:    AvatarBadge
}

impl TaskSummary {
  pub fn build(
    view: &TaskView,
    icons: &IconRegistry,
    now: DateTime<Utc>
  ) -> Self {
    let task = view.task();

    let name_glyph = task
      .labels
      .first()
      .map(|label| icons.resolve(&label.icon))
      .unwrap_or(Glyph::FILE_DONE);

    let labels = task
      .labels
      .iter()
      .map(|label| {
        LabelTag {
          id:    label.id,
          value: label.value.clone(),
          glyph: icons.resolve(&label.icon),
          color: string_to_rgb(
            &label.value
          )
        }
      })
      .collect();

    Self {
      task_id: task.id(),
      phase: view.phase(),
      name: task.name.clone(),
      name_glyph,
      detail_path: detail_path(task.id()),
      labels,
      due_phrase: task
        .due
        .map(|due| from_now(due, now)),
      owner: AvatarBadge::for_person(
        "Owner",
        Some(&task.owner)
      ),
      assignee: AvatarBadge::for_person(
        "Assignee",
        task.assignee.as_ref()
      )
    }
  }
}

pub fn detail_path(id: TaskId) -> String {
  format!("/task/{id}")
}
