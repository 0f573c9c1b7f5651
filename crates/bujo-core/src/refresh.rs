use bujo_gui_shared::{
  NotificationDto,
  ProjectDto,
  ProjectsWithOwner
};
use tracing::{
  debug,
  info,
  warn
};

use crate::gateway::{
  Dispatch,
  MutationEvent,
  RemoteCall,
  RemoteRequest,
  Settlement
};
use crate::store::AccountSnapshot;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum RefreshTrigger {
  Mount,
  Manual
}

impl RefreshTrigger {
  pub fn requests(
    self
  ) -> Vec<RemoteRequest> {
    match self {
      | Self::Mount => vec![
        RemoteRequest::FetchMyself {
          expand: false
        },
        RemoteRequest::FetchNotifications,
      ],
      | Self::Manual => vec![
        RemoteRequest::FetchMyself {
          expand: true
        },
        RemoteRequest::FetchSystemStatus,
        RemoteRequest::FetchNotifications,
      ]
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CreateAffordance {
  CreateProject,
  CreateItem
}

impl CreateAffordance {
  pub fn label(self) -> &'static str {
    match self {
      | Self::CreateProject => {
        "Create Project"
      }
      | Self::CreateItem => "Create Item"
    }
  }
}

/// No projects at all means the only useful thing to create is a
/// project. Shared projects count per owner group.
pub fn create_affordance(
  owned: &[ProjectDto],
  shared: &[ProjectsWithOwner]
) -> CreateAffordance {
  if owned.len() + shared.len() == 0 {
    CreateAffordance::CreateProject
  } else {
    CreateAffordance::CreateItem
  }
}

/// Name shown in the account bar; a profile without one reads "User".
pub fn display_username(
  username: &str
) -> &str {
  if username.trim().is_empty() {
    "User"
  } else {
    username
  }
}

/// Issues the account-level fetches. Every request is independent and
/// handed to the dispatcher in one pass.
#[derive(Debug, Clone)]
pub struct AccountRefresh<D> {
  dispatcher: D
}

impl<D: Dispatch> AccountRefresh<D> {
  pub fn new(dispatcher: D) -> Self {
    Self { dispatcher }
  }

  pub fn on_mount(&self) {
    self.run(RefreshTrigger::Mount);
  }

  pub fn on_manual_refresh(&self) {
    self.run(RefreshTrigger::Manual);
  }

  #[tracing::instrument(skip(self))]
  pub fn run(&self, trigger: RefreshTrigger) {
    let requests = trigger.requests();
    info!(
      count = requests.len(),
      "refreshing account data"
    );
    for request in requests {
      self
        .dispatcher
        .dispatch(RemoteCall::new(request));
    }
  }
}

/// Turns settled mutations into re-fetches of the canonical lists.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Reconciler {
  enabled: bool
}

impl Default for Reconciler {
  fn default() -> Self {
    Self { enabled: true }
  }
}

impl Reconciler {
  pub fn new(enabled: bool) -> Self {
    Self { enabled }
  }

  pub fn plan(
    &self,
    settlement: &Settlement,
    snapshot: &AccountSnapshot
  ) -> Vec<RemoteRequest> {
    if !self.enabled
      || !settlement.succeeded()
    {
      return Vec::new();
    }

    let projects = match snapshot
      .locate(settlement.mutation.task_id)
    {
      | Some((project_id, _)) => {
        vec![project_id]
      }
      | None => {
        debug!(
          task_id = settlement.mutation.task_id,
          "settled task not in any list; \
           re-fetching every project"
        );
        snapshot.project_ids()
      }
    };

    projects
      .into_iter()
      .flat_map(|project_id| {
        [
          RemoteRequest::FetchTasks {
            project_id
          },
          RemoteRequest::FetchCompletedTasks {
            project_id
          }
        ]
      })
      .collect()
  }

  /// Runs over drained tracker events. Failed mutations come back as
  /// notifications for the feed; successful ones as re-fetches.
  pub fn reconcile<D: Dispatch>(
    &self,
    events: Vec<MutationEvent>,
    snapshot: &AccountSnapshot,
    dispatcher: &D
  ) -> Vec<NotificationDto> {
    let mut failures = Vec::new();
    for event in events {
      let MutationEvent::Settled(settlement) =
        event
      else {
        continue;
      };

      if let Err(error) = &settlement.outcome {
        warn!(
          request_id = %settlement.request_id,
          task_id = settlement.mutation.task_id,
          kind = settlement.mutation.kind.as_str(),
          %error,
          "task mutation rejected"
        );
        failures.push(failure_notice(
          &settlement,
          error
        ));
        continue;
      }

      for request in
        self.plan(&settlement, snapshot)
      {
        dispatcher
          .dispatch(RemoteCall::new(request));
      }
    }
    failures
  }
}

fn failure_notice(
  settlement: &Settlement,
  error: &str
) -> NotificationDto {
  NotificationDto {
    id:         settlement
      .request_id
      .as_u64_pair()
      .0,
    title:      format!(
      "Could not {} task {}",
      settlement
        .mutation
        .kind
        .as_str()
        .replace('_', " "),
      settlement.mutation.task_id
    ),
    content:    Some(error.to_string()),
    originator: None,
    timestamp:  None
  }
}
