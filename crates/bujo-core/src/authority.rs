use std::cell::RefCell;
use std::collections::{
  BTreeMap,
  BTreeSet,
  VecDeque
};

use bujo_gui_shared::{
  MyselfDto,
  ProjectId,
  TaskDto,
  TaskId
};
use tracing::{
  debug,
  info,
  instrument,
  warn
};

use crate::gateway::{
  Dispatch,
  MutationTracker,
  RemoteCall,
  RemoteRequest
};
use crate::store::{
  AccountSnapshot,
  RemoteResponse
};

#[derive(
  Debug, Clone, PartialEq, Eq, thiserror::Error,
)]
pub enum RemoteError {
  #[error("task {0} not found")]
  TaskNotFound(TaskId),
  #[error("task {task_id} is not {expected}")]
  WrongList {
    task_id:  TaskId,
    expected: &'static str
  }
}

type TaskLists = BTreeMap<ProjectId, Vec<TaskDto>>;

/// Local stand-in for the journal service. Calls queue up on dispatch
/// and run in arrival order on [`InMemoryAuthority::pump`].
#[derive(Debug)]
pub struct InMemoryAuthority {
  state:   RefCell<AccountSnapshot>,
  queue:   RefCell<VecDeque<RemoteCall>>,
  tracker: MutationTracker
}

impl Dispatch for InMemoryAuthority {
  fn dispatch(&self, call: RemoteCall) {
    debug!(
      request_id = %call.request_id,
      command = call.request.command(),
      "authority queued call"
    );
    self.queue.borrow_mut().push_back(call);
  }
}

impl InMemoryAuthority {
  pub fn new(
    seed: AccountSnapshot,
    tracker: MutationTracker
  ) -> Self {
    Self {
      state: RefCell::new(seed),
      queue: RefCell::new(VecDeque::new()),
      tracker
    }
  }

  pub fn pending(&self) -> usize {
    self.queue.borrow().len()
  }

  pub fn state(&self) -> AccountSnapshot {
    self.state.borrow().clone()
  }

  /// Runs every queued call and settles tracked mutations.
  pub fn pump(
    &self
  ) -> Vec<(
    RemoteCall,
    Result<RemoteResponse, RemoteError>
  )> {
    let mut handled = Vec::new();
    loop {
      let next =
        self.queue.borrow_mut().pop_front();
      let Some(call) = next else {
        break;
      };

      let result = self.handle(&call.request);
      if call.request.mutation().is_some() {
        self.tracker.settle(
          call.request_id,
          result
            .as_ref()
            .map(|_| ())
            .map_err(ToString::to_string)
        );
      }
      handled.push((call, result));
    }
    handled
  }

  #[instrument(skip(self))]
  fn handle(
    &self,
    request: &RemoteRequest
  ) -> Result<RemoteResponse, RemoteError> {
    let mut state = self.state.borrow_mut();
    let state = &mut *state;
    match request {
      | RemoteRequest::CompleteTask {
        task_id
      } => {
        let (project_id, moved) = take_subtree(
          &mut state.tasks,
          &state.completed_tasks,
          *task_id,
          "active"
        )?;
        info!(
          task_id,
          moved = moved.len(),
          "completed task subtree"
        );
        state
          .completed_tasks
          .entry(project_id)
          .or_default()
          .extend(moved);
        Ok(RemoteResponse::Ack)
      }
      | RemoteRequest::UncompleteTask {
        task_id
      } => {
        let (project_id, mut restored) =
          take_task(
            &mut state.completed_tasks,
            &state.tasks,
            *task_id
          )?;
        let active = state
          .tasks
          .entry(project_id)
          .or_default();
        if restored.parent_id.is_some_and(
          |parent| {
            !active
              .iter()
              .any(|entry| entry.id == parent)
          }
        ) {
          debug!(
            task_id,
            "parent not active; restoring as \
             a root task"
          );
          restored.parent_id = None;
        }
        active.push(restored);
        Ok(RemoteResponse::Ack)
      }
      | RemoteRequest::DeleteTask { task_id } => {
        let (_, removed) = take_subtree(
          &mut state.tasks,
          &state.completed_tasks,
          *task_id,
          "active"
        )?;
        info!(
          task_id,
          removed = removed.len(),
          "deleted task subtree"
        );
        Ok(RemoteResponse::Ack)
      }
      | RemoteRequest::DeleteCompletedTask {
        task_id
      } => {
        let (_, removed) = take_subtree(
          &mut state.completed_tasks,
          &state.tasks,
          *task_id,
          "completed"
        )?;
        info!(
          task_id,
          removed = removed.len(),
          "deleted completed task subtree"
        );
        Ok(RemoteResponse::Ack)
      }
      | RemoteRequest::FetchMyself {
        expand
      } => {
        let myself = if *expand {
          state.myself.clone()
        } else {
          MyselfDto {
            settings: None,
            ..state.myself.clone()
          }
        };
        Ok(RemoteResponse::Myself(myself))
      }
      | RemoteRequest::FetchSystemStatus => {
        Ok(RemoteResponse::SystemStatus(
          state.system.clone().unwrap_or_default()
        ))
      }
      | RemoteRequest::FetchNotifications => {
        Ok(RemoteResponse::Notifications(
          state.notifications.clone()
        ))
      }
      | RemoteRequest::FetchProjects => {
        Ok(RemoteResponse::Projects {
          owned:  state.owned_projects.clone(),
          shared: state
            .shared_projects
            .clone()
        })
      }
      | RemoteRequest::FetchTasks {
        project_id
      } => {
        Ok(RemoteResponse::Tasks {
          project_id: *project_id,
          tasks:      state
            .tasks
            .get(project_id)
            .cloned()
            .unwrap_or_default()
        })
      }
      | RemoteRequest::FetchCompletedTasks {
        project_id
      } => {
        Ok(RemoteResponse::CompletedTasks {
          project_id: *project_id,
          tasks:      state
            .completed_tasks
            .get(project_id)
            .cloned()
            .unwrap_or_default()
        })
      }
    }
  }
}

/// Finds the list holding `root`. A root found only in `other` is
/// reported as sitting in the wrong list.
fn holding_list<'a>(
  from: &'a mut TaskLists,
  other: &TaskLists,
  root: TaskId,
  expected: &'static str
) -> Result<(ProjectId, &'a mut Vec<TaskDto>), RemoteError>
{
  let found = from.iter_mut().find(|(_, tasks)| {
    tasks.iter().any(|task| task.id == root)
  });
  if let Some((project_id, tasks)) = found {
    return Ok((*project_id, tasks));
  }

  let elsewhere = other.values().any(|tasks| {
    tasks.iter().any(|task| task.id == root)
  });
  if elsewhere {
    warn!(
      task_id = root,
      expected,
      "task sits in the other list"
    );
    return Err(RemoteError::WrongList {
      task_id: root,
      expected
    });
  }
  Err(RemoteError::TaskNotFound(root))
}

/// Removes `root` and its descendants from `from`.
fn take_subtree(
  from: &mut TaskLists,
  other: &TaskLists,
  root: TaskId,
  expected: &'static str
) -> Result<(ProjectId, Vec<TaskDto>), RemoteError> {
  let (project_id, tasks) =
    holding_list(from, other, root, expected)?;
  let members = descendants(tasks, root);
  let (taken, kept): (Vec<_>, Vec<_>) =
    std::mem::take(tasks)
      .into_iter()
      .partition(|task| {
        members.contains(&task.id)
      });
  *tasks = kept;
  Ok((project_id, taken))
}

/// Removes only `root` from the completed lists; its children stay.
fn take_task(
  completed: &mut TaskLists,
  active: &TaskLists,
  root: TaskId
) -> Result<(ProjectId, TaskDto), RemoteError> {
  let (project_id, tasks) = holding_list(
    completed,
    active,
    root,
    "completed"
  )?;
  let position = tasks
    .iter()
    .position(|task| task.id == root)
    .ok_or(RemoteError::TaskNotFound(root))?;
  Ok((project_id, tasks.remove(position)))
}

fn descendants(
  tasks: &[TaskDto],
  root: TaskId
) -> BTreeSet<TaskId> {
  let mut members = BTreeSet::from([root]);
  let mut frontier = vec![root];
  while let Some(parent) = frontier.pop() {
    for task in tasks {
      if task.parent_id == Some(parent)
        && members.insert(task.id)
      {
        frontier.push(task.id);
      }
    }
  }
  members
}
