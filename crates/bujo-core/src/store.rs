use std::collections::BTreeMap;

use bujo_gui_shared::{
  MyselfDto,
  NotificationDto,
  ProjectDto,
  ProjectId,
  ProjectsWithOwner,
  SystemStatusDto,
  TaskDto,
  TaskId
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::model::{
  Phase,
  Task,
  TaskView
};

/// What the remote authority answers with.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub enum RemoteResponse {
  Ack,
  Myself(MyselfDto),
  Notifications(Vec<NotificationDto>),
  SystemStatus(SystemStatusDto),
  Projects {
    owned:  Vec<ProjectDto>,
    shared: Vec<ProjectsWithOwner>
  },
  Tasks {
    project_id: ProjectId,
    tasks:      Vec<TaskDto>
  },
  CompletedTasks {
    project_id: ProjectId,
    tasks:      Vec<TaskDto>
  }
}

/// Canonical account state on the client. Views read it; only
/// [`AccountSnapshot::apply`] writes it.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
pub struct AccountSnapshot {
  #[serde(default)]
  pub myself:          MyselfDto,
  #[serde(default)]
  pub owned_projects:  Vec<ProjectDto>,
  #[serde(default)]
  pub shared_projects: Vec<ProjectsWithOwner>,
  #[serde(default)]
  pub notifications:   Vec<NotificationDto>,
  #[serde(default)]
  pub system:          Option<SystemStatusDto>,
  #[serde(default)]
  pub tasks:
    BTreeMap<ProjectId, Vec<TaskDto>>,
  #[serde(default)]
  pub completed_tasks:
    BTreeMap<ProjectId, Vec<TaskDto>>
}

impl AccountSnapshot {
  pub fn apply(
    &mut self,
    response: RemoteResponse
  ) {
    match response {
      | RemoteResponse::Ack => {}
      | RemoteResponse::Myself(myself) => {
        debug!(
          username = %myself.username,
          expanded = myself.settings.is_some(),
          "profile updated"
        );
        self.myself = myself;
      }
      | RemoteResponse::Notifications(
        notifications
      ) => {
        debug!(
          count = notifications.len(),
          "notifications updated"
        );
        self.notifications = notifications;
      }
      | RemoteResponse::SystemStatus(
        status
      ) => {
        self.system = Some(status);
      }
      | RemoteResponse::Projects {
        owned,
        shared
      } => {
        debug!(
          owned = owned.len(),
          shared = shared.len(),
          "projects updated"
        );
        self.owned_projects = owned;
        self.shared_projects = shared;
      }
      | RemoteResponse::Tasks {
        project_id,
        tasks
      } => {
        debug!(
          project_id,
          count = tasks.len(),
          "active tasks updated"
        );
        self.tasks.insert(project_id, tasks);
      }
      | RemoteResponse::CompletedTasks {
        project_id,
        tasks
      } => {
        debug!(
          project_id,
          count = tasks.len(),
          "completed tasks updated"
        );
        self
          .completed_tasks
          .insert(project_id, tasks);
      }
    }
  }

  pub fn project_ids(
    &self
  ) -> Vec<ProjectId> {
    let mut ids: Vec<ProjectId> = self
      .owned_projects
      .iter()
      .chain(
        self
          .shared_projects
          .iter()
          .flat_map(|group| group.projects.iter())
      )
      .map(|project| project.id)
      .chain(self.tasks.keys().copied())
      .chain(
        self.completed_tasks.keys().copied()
      )
      .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
  }

  /// Where a task currently lives, if any list holds it.
  pub fn locate(
    &self,
    task_id: TaskId
  ) -> Option<(ProjectId, Phase)> {
    let find = |lists: &BTreeMap<
      ProjectId,
      Vec<TaskDto>
    >| {
      lists.iter().find_map(
        |(project_id, tasks)| {
          tasks
            .iter()
            .any(|task| task.id == task_id)
            .then_some(*project_id)
        }
      )
    };

    find(&self.tasks)
      .map(|project| (project, Phase::Active))
      .or_else(|| {
        find(&self.completed_tasks).map(
          |project| {
            (project, Phase::Completed)
          }
        )
      })
  }

  /// Active items first, then completed ones, each tagged with the
  /// list it came from.
  pub fn task_views(
    &self,
    project_id: ProjectId,
    default_tz: Tz
  ) -> Vec<TaskView> {
    let active = self
      .tasks
      .get(&project_id)
      .into_iter()
      .flatten()
      .map(|dto| {
        TaskView::Active(Task::from_dto(
          dto, default_tz
        ))
      });
    let completed = self
      .completed_tasks
      .get(&project_id)
      .into_iter()
      .flatten()
      .map(|dto| {
        TaskView::Completed(Task::from_dto(
          dto, default_tz
        ))
      });
    active.chain(completed).collect()
  }

  pub fn view_of(
    &self,
    task_id: TaskId,
    default_tz: Tz
  ) -> Option<TaskView> {
    let (project_id, _) =
      self.locate(task_id)?;
    self
      .task_views(project_id, default_tz)
      .into_iter()
      .find(|view| view.id() == task_id)
  }
}
