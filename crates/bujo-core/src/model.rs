use bujo_gui_shared::{
  LabelDto,
  ProjectId,
  TaskDto,
  TaskId
};
use chrono::{
  DateTime,
  Utc
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::warn;

use crate::datetime::parse_due;

#[derive(
  Debug, Clone, PartialEq, Eq, thiserror::Error,
)]
pub enum ModelError {
  #[error(
    "invalid due date '{0}': expected \
     YYYY-MM-DD"
  )]
  InvalidDueDate(String),
  #[error(
    "invalid due time '{0}': expected \
     HH:MM"
  )]
  InvalidDueTime(String),
  #[error("unknown timezone '{0}'")]
  UnknownTimezone(String),
  #[error(
    "local time {local} does not exist \
     in {timezone}"
  )]
  NonexistentLocalTime {
    local:    String,
    timezone: String
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Label {
  pub id:    u64,
  pub value: String,
  pub icon:  String
}

impl From<&LabelDto> for Label {
  fn from(dto: &LabelDto) -> Self {
    Self {
      id:    dto.id,
      value: dto.value.clone(),
      icon:  dto.icon.clone()
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Person {
  pub name:   String,
  pub avatar: Option<String>
}

impl Person {
  fn new(
    name: &str,
    avatar: Option<&String>
  ) -> Self {
    Self {
      name:   name.to_string(),
      avatar: avatar
        .map(|src| src.trim())
        .filter(|src| !src.is_empty())
        .map(ToString::to_string)
    }
  }
}

/// A project item owned by exactly one user. The identifier is fixed at
/// construction; everything else is plain data.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Task {
  id:             TaskId,
  pub project_id: ProjectId,
  pub parent_id:  Option<TaskId>,
  pub name:       String,
  pub due:        Option<DateTime<Utc>>,
  pub labels:     Vec<Label>,
  pub owner:      Person,
  pub assignee:   Option<Person>
}

impl Task {
  pub fn new(
    id: TaskId,
    project_id: ProjectId,
    name: impl Into<String>,
    owner: Person
  ) -> Self {
    Self {
      id,
      project_id,
      parent_id: None,
      name: name.into(),
      due: None,
      labels: Vec::new(),
      owner,
      assignee: None
    }
  }

  pub fn id(&self) -> TaskId {
    self.id
  }

  /// Builds the view model of a wire task. A due date that cannot be
  /// resolved is logged and dropped so the item still renders.
  pub fn from_dto(
    dto: &TaskDto,
    default_tz: Tz
  ) -> Self {
    let due = dto.due_date.as_deref().and_then(
      |date| {
        match parse_due(
          date,
          dto.due_time.as_deref(),
          dto.timezone.as_deref(),
          default_tz
        ) {
          | Ok(due) => Some(due),
          | Err(error) => {
            warn!(
              task_id = dto.id,
              %error,
              "ignoring unreadable due date"
            );
            None
          }
        }
      }
    );

    let assignee = dto
      .assigned_to
      .as_deref()
      .map(str::trim)
      .filter(|name| !name.is_empty())
      .map(|name| {
        Person::new(
          name,
          dto.assigned_to_avatar.as_ref()
        )
      });

    Self {
      id: dto.id,
      project_id: dto.project_id,
      parent_id: dto.parent_id,
      name: dto.name.clone(),
      due,
      labels: dto
        .labels
        .iter()
        .map(Label::from)
        .collect(),
      owner: Person::new(
        &dto.owner,
        dto.owner_avatar.as_ref()
      ),
      assignee
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub enum Phase {
  Active,
  Completed
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Active => "active",
      | Self::Completed => "completed"
    }
  }
}

/// A task tagged with the list that supplied it.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum TaskView {
  Active(Task),
  Completed(Task)
}

impl TaskView {
  pub fn task(&self) -> &Task {
    match self {
      | Self::Active(task)
      | Self::Completed(task) => task
    }
  }

  pub fn id(&self) -> TaskId {
    self.task().id()
  }

  pub fn phase(&self) -> Phase {
    match self {
      | Self::Active(_) => Phase::Active,
      | Self::Completed(_) => {
        Phase::Completed
      }
    }
  }

  /// Identity of one rendered row. Between the two re-fetches after a
  /// completion both lists can hold the same task, so the id alone is
  /// not unique.
  pub fn render_key(&self) -> String {
    format!(
      "{}-{}",
      self.phase().as_str(),
      self.id()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dto() -> TaskDto {
    TaskDto {
      id:                 11,
      project_id:         3,
      parent_id:          None,
      name:               "Water plants"
        .to_string(),
      due_date:           Some(
        "2026-04-01".to_string()
      ),
      due_time:           None,
      timezone:           None,
      labels:             vec![LabelDto {
        id:    1,
        value: "home".to_string(),
        icon:  "home".to_string()
      }],
      owner:              "mia".to_string(),
      owner_avatar:       Some(
        "  ".to_string()
      ),
      assigned_to:        Some(
        "leo".to_string()
      ),
      assigned_to_avatar: Some(
        "https://avatars.example/leo.png"
          .to_string()
      )
    }
  }

  #[test]
  fn from_dto_keeps_identity_and_people() {
    let task =
      Task::from_dto(&dto(), Tz::UTC);
    assert_eq!(task.id(), 11);
    assert_eq!(task.labels.len(), 1);
    assert!(task.due.is_some());
    assert_eq!(task.owner.name, "mia");
    assert_eq!(task.owner.avatar, None);
    let assignee =
      task.assignee.expect("assignee");
    assert_eq!(
      assignee.avatar.as_deref(),
      Some(
        "https://avatars.example/leo.png"
      )
    );
  }

  #[test]
  fn unreadable_due_date_renders_as_absent() {
    let mut dto = dto();
    dto.due_date =
      Some("next tuesday".to_string());
    let task =
      Task::from_dto(&dto, Tz::UTC);
    assert!(task.due.is_none());
  }

  #[test]
  fn view_variant_decides_phase() {
    let task =
      Task::from_dto(&dto(), Tz::UTC);
    assert_eq!(
      TaskView::Active(task.clone())
        .phase(),
      Phase::Active
    );
    assert_eq!(
      TaskView::Completed(task).phase(),
      Phase::Completed
    );
  }
}
