use serde::{
  Deserialize,
  Serialize
};

pub type TaskId = u64;
pub type ProjectId = u64;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectItemType {
  Todo,
  Note,
  Ledger
}

impl ProjectItemType {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Todo => "TODO",
      | Self::Note => "NOTE",
      | Self::Ledger => "LEDGER"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct LabelDto {
  pub id:    u64,
  pub value: String,
  #[serde(default)]
  pub icon:  String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskDto {
  pub id:                 TaskId,
  pub project_id:         ProjectId,
  #[serde(default)]
  pub parent_id:          Option<TaskId>,
  #[serde(default)]
  pub name:               String,
  #[serde(default)]
  pub due_date:           Option<String>,
  #[serde(default)]
  pub due_time:           Option<String>,
  #[serde(default)]
  pub timezone:           Option<String>,
  #[serde(default)]
  pub labels:             Vec<LabelDto>,
  pub owner:              String,
  #[serde(default)]
  pub owner_avatar:       Option<String>,
  #[serde(default)]
  pub assigned_to:        Option<String>,
  #[serde(default)]
  pub assigned_to_avatar: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ProjectDto {
  pub id:           ProjectId,
  pub name:         String,
  pub project_type: ProjectItemType,
  pub owner:        String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ProjectsWithOwner {
  pub owner:        String,
  #[serde(default)]
  pub owner_avatar: Option<String>,
  #[serde(default)]
  pub projects:     Vec<ProjectDto>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct MyselfDto {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub avatar:   Option<String>,
  #[serde(default)]
  pub timezone: Option<String>,
  #[serde(default)]
  pub settings: Option<MyselfSettings>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct MyselfSettings {
  #[serde(default)]
  pub date_format:  Option<String>,
  #[serde(default)]
  pub before_alert: Option<u32>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NotificationDto {
  pub id:         u64,
  pub title:      String,
  #[serde(default)]
  pub content:    Option<String>,
  #[serde(default)]
  pub originator: Option<String>,
  #[serde(default)]
  pub timestamp:  Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct SystemStatusDto {
  #[serde(default)]
  pub owned_projects_etag:  Option<String>,
  #[serde(default)]
  pub shared_projects_etag: Option<String>,
  #[serde(default)]
  pub notifications_etag:   Option<String>,
  #[serde(default)]
  pub groups_etag:          Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskIdArg {
  pub task_id: TaskId
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ProjectIdArg {
  pub project_id: ProjectId
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct MyselfArgs {
  pub expand: bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct ProjectsDto {
  #[serde(default)]
  pub owned:  Vec<ProjectDto>,
  #[serde(default)]
  pub shared: Vec<ProjectsWithOwner>
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn task_dto_tolerates_missing_optional_fields()
  {
    let task: TaskDto =
      serde_json::from_str(
        r#"{"id":7,"project_id":2,"owner":"mia"}"#
      )
      .expect("decode task");
    assert_eq!(task.id, 7);
    assert!(task.labels.is_empty());
    assert!(task.due_date.is_none());
    assert!(task.assigned_to.is_none());
    assert_eq!(task.name, "");
  }

  #[test]
  fn project_item_type_uses_upper_case_wire_names()
  {
    let encoded = serde_json::to_string(
      &ProjectItemType::Todo
    )
    .expect("encode item type");
    assert_eq!(encoded, "\"TODO\"");
    assert_eq!(
      ProjectItemType::Todo.as_str(),
      "TODO"
    );
  }
}
