use std::cell::RefCell;
use std::collections::{
  BTreeMap,
  VecDeque
};
use std::rc::Rc;

use bujo_gui_shared::{
  ProjectId,
  TaskId
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};
use uuid::Uuid;

use crate::menu::{
  MutationKind,
  TaskMutation
};

pub type RequestId = Uuid;

/// Every operation the remote authority accepts.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub enum RemoteRequest {
  CompleteTask { task_id: TaskId },
  UncompleteTask { task_id: TaskId },
  DeleteTask { task_id: TaskId },
  DeleteCompletedTask { task_id: TaskId },
  FetchMyself { expand: bool },
  FetchSystemStatus,
  FetchNotifications,
  FetchProjects,
  FetchTasks { project_id: ProjectId },
  FetchCompletedTasks { project_id: ProjectId }
}

impl RemoteRequest {
  pub fn command(&self) -> &'static str {
    match self {
      | Self::CompleteTask { .. } => {
        "task_complete"
      }
      | Self::UncompleteTask { .. } => {
        "task_uncomplete"
      }
      | Self::DeleteTask { .. } => {
        "task_delete"
      }
      | Self::DeleteCompletedTask {
        ..
      } => "task_delete_completed",
      | Self::FetchMyself { .. } => {
        "myself_get"
      }
      | Self::FetchSystemStatus => {
        "system_status"
      }
      | Self::FetchNotifications => {
        "notifications_list"
      }
      | Self::FetchProjects => {
        "projects_list"
      }
      | Self::FetchTasks { .. } => {
        "tasks_list"
      }
      | Self::FetchCompletedTasks {
        ..
      } => "tasks_completed_list"
    }
  }

  pub fn mutation(
    &self
  ) -> Option<TaskMutation> {
    let (task_id, kind) = match self {
      | Self::CompleteTask { task_id } => {
        (*task_id, MutationKind::Complete)
      }
      | Self::UncompleteTask { task_id } => {
        (*task_id, MutationKind::Uncomplete)
      }
      | Self::DeleteTask { task_id } => {
        (*task_id, MutationKind::Delete)
      }
      | Self::DeleteCompletedTask {
        task_id
      } => (
        *task_id,
        MutationKind::DeleteCompleted
      ),
      | _ => return None
    };
    Some(TaskMutation { task_id, kind })
  }
}

impl From<TaskMutation> for RemoteRequest {
  fn from(mutation: TaskMutation) -> Self {
    let task_id = mutation.task_id;
    match mutation.kind {
      | MutationKind::Complete => {
        Self::CompleteTask { task_id }
      }
      | MutationKind::Uncomplete => {
        Self::UncompleteTask { task_id }
      }
      | MutationKind::Delete => {
        Self::DeleteTask { task_id }
      }
      | MutationKind::DeleteCompleted => {
        Self::DeleteCompletedTask { task_id }
      }
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct RemoteCall {
  pub request_id: RequestId,
  pub request:    RemoteRequest
}

impl RemoteCall {
  pub fn new(request: RemoteRequest) -> Self {
    Self {
      request_id: Uuid::new_v4(),
      request
    }
  }
}

/// Fire-and-forget seam to the remote authority. Completion is
/// reported back through a [`MutationTracker`], never returned.
pub trait Dispatch {
  fn dispatch(&self, call: RemoteCall);
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
  fn dispatch(&self, call: RemoteCall) {
    (**self).dispatch(call);
  }
}

impl<D: Dispatch + ?Sized> Dispatch for Rc<D> {
  fn dispatch(&self, call: RemoteCall) {
    (**self).dispatch(call);
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Settlement {
  pub request_id: RequestId,
  pub mutation:   TaskMutation,
  pub outcome:    Result<(), String>
}

impl Settlement {
  pub fn succeeded(&self) -> bool {
    self.outcome.is_ok()
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum MutationEvent {
  Requested {
    request_id: RequestId,
    mutation:   TaskMutation
  },
  Settled(Settlement)
}

#[derive(Debug, Default)]
struct TrackerState {
  in_flight: BTreeMap<RequestId, TaskMutation>,
  events:    VecDeque<MutationEvent>
}

/// Shared record of dispatched mutations. Cloning yields another handle
/// to the same record, so the dispatcher side can settle what the
/// gateway claimed.
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
  state: Rc<RefCell<TrackerState>>
}

impl PartialEq for MutationTracker {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.state, &other.state)
  }
}

impl MutationTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(
    &self,
    mutation: TaskMutation
  ) -> bool {
    self
      .state
      .borrow()
      .in_flight
      .values()
      .any(|entry| *entry == mutation)
  }

  pub fn is_busy(
    &self,
    task_id: TaskId
  ) -> bool {
    self
      .state
      .borrow()
      .in_flight
      .values()
      .any(|entry| entry.task_id == task_id)
  }

  pub fn in_flight_len(&self) -> usize {
    self.state.borrow().in_flight.len()
  }

  fn claim(
    &self,
    request_id: RequestId,
    mutation: TaskMutation,
    dedupe: bool
  ) -> bool {
    let mut state = self.state.borrow_mut();
    if dedupe
      && state
        .in_flight
        .values()
        .any(|entry| *entry == mutation)
    {
      return false;
    }
    state
      .in_flight
      .insert(request_id, mutation);
    state.events.push_back(
      MutationEvent::Requested {
        request_id,
        mutation
      }
    );
    true
  }

  /// Releases a claimed request. Calls the tracker never claimed (plain
  /// fetches) settle to `None`.
  pub fn settle(
    &self,
    request_id: RequestId,
    outcome: Result<(), String>
  ) -> Option<Settlement> {
    let mut state = self.state.borrow_mut();
    let mutation =
      state.in_flight.remove(&request_id)?;
    let settlement = Settlement {
      request_id,
      mutation,
      outcome
    };
    state.events.push_back(
      MutationEvent::Settled(
        settlement.clone()
      )
    );
    Some(settlement)
  }

  pub fn drain(&self) -> Vec<MutationEvent> {
    self
      .state
      .borrow_mut()
      .events
      .drain(..)
      .collect()
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum GatewayOutcome {
  Dispatched(RequestId),
  AlreadyInFlight
}

/// The four task mutations. Each one is handed to the dispatcher and
/// forgotten; the reconciler re-fetches once the call settles.
#[derive(Debug, Clone)]
pub struct TaskGateway<D> {
  dispatcher: D,
  tracker:    MutationTracker,
  dedupe:     bool
}

impl<D: Dispatch> TaskGateway<D> {
  pub fn new(
    dispatcher: D,
    tracker: MutationTracker
  ) -> Self {
    Self {
      dispatcher,
      tracker,
      dedupe: true
    }
  }

  pub fn with_dedupe(
    mut self,
    dedupe: bool
  ) -> Self {
    self.dedupe = dedupe;
    self
  }

  pub fn tracker(&self) -> &MutationTracker {
    &self.tracker
  }

  pub fn dispatcher(&self) -> &D {
    &self.dispatcher
  }

  pub fn complete(
    &self,
    task_id: TaskId
  ) -> GatewayOutcome {
    self.submit(TaskMutation {
      task_id,
      kind: MutationKind::Complete
    })
  }

  pub fn uncomplete(
    &self,
    task_id: TaskId
  ) -> GatewayOutcome {
    self.submit(TaskMutation {
      task_id,
      kind: MutationKind::Uncomplete
    })
  }

  pub fn delete(
    &self,
    task_id: TaskId
  ) -> GatewayOutcome {
    self.submit(TaskMutation {
      task_id,
      kind: MutationKind::Delete
    })
  }

  pub fn delete_completed(
    &self,
    task_id: TaskId
  ) -> GatewayOutcome {
    self.submit(TaskMutation {
      task_id,
      kind: MutationKind::DeleteCompleted
    })
  }

  #[tracing::instrument(skip(self), fields(task_id = mutation.task_id, kind = mutation.kind.as_str()))]
  pub fn submit(
    &self,
    mutation: TaskMutation
  ) -> GatewayOutcome {
    let call = RemoteCall::new(
      RemoteRequest::from(mutation)
    );
    if !self.tracker.claim(
      call.request_id,
      mutation,
      self.dedupe
    ) {
      warn!(
        "mutation already in flight; \
         dropping duplicate request"
      );
      return GatewayOutcome::AlreadyInFlight;
    }

    info!(
      request_id = %call.request_id,
      command = call.request.command(),
      "dispatching task mutation"
    );
    let request_id = call.request_id;
    self.dispatcher.dispatch(call);
    debug!(
      in_flight = self.tracker.in_flight_len(),
      "mutation handed to dispatcher"
    );
    GatewayOutcome::Dispatched(request_id)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[derive(Default)]
  struct Recorder {
    calls: RefCell<Vec<RemoteCall>>
  }

  impl Dispatch for Recorder {
    fn dispatch(&self, call: RemoteCall) {
      self.calls.borrow_mut().push(call);
    }
  }

  fn gateway() -> TaskGateway<Rc<Recorder>> {
    TaskGateway::new(
      Rc::new(Recorder::default()),
      MutationTracker::new()
    )
  }

  fn requests(
    gateway: &TaskGateway<Rc<Recorder>>
  ) -> Vec<RemoteRequest> {
    gateway
      .dispatcher()
      .calls
      .borrow()
      .iter()
      .map(|call| call.request.clone())
      .collect()
  }

  #[test]
  fn each_operation_maps_to_its_request() {
    let gateway = gateway();
    gateway.complete(1);
    gateway.uncomplete(2);
    gateway.delete(3);
    gateway.delete_completed(4);
    assert_eq!(requests(&gateway), vec![
      RemoteRequest::CompleteTask {
        task_id: 1
      },
      RemoteRequest::UncompleteTask {
        task_id: 2
      },
      RemoteRequest::DeleteTask { task_id: 3 },
      RemoteRequest::DeleteCompletedTask {
        task_id: 4
      },
    ]);
  }

  #[test]
  fn duplicate_in_flight_requests_are_dropped() {
    let gateway = gateway();
    let first = gateway.complete(7);
    assert!(matches!(
      first,
      GatewayOutcome::Dispatched(_)
    ));
    assert_eq!(
      gateway.complete(7),
      GatewayOutcome::AlreadyInFlight
    );
    assert!(matches!(
      gateway.delete(7),
      GatewayOutcome::Dispatched(_)
    ));
    assert_eq!(requests(&gateway).len(), 2);
    assert!(gateway.tracker().is_busy(7));
  }

  #[test]
  fn settling_releases_and_records_the_event() {
    let gateway = gateway();
    let GatewayOutcome::Dispatched(request_id) =
      gateway.complete(7)
    else {
      panic!("expected dispatch");
    };

    let settlement = gateway
      .tracker()
      .settle(request_id, Ok(()))
      .expect("claimed request settles");
    assert!(settlement.succeeded());
    assert!(!gateway.tracker().is_busy(7));
    assert!(matches!(
      gateway.complete(7),
      GatewayOutcome::Dispatched(_)
    ));

    let events = gateway.tracker().drain();
    assert_eq!(events.len(), 3);
    assert!(matches!(
      events[1],
      MutationEvent::Settled(_)
    ));
  }

  #[test]
  fn dedupe_can_be_disabled() {
    let gateway = gateway().with_dedupe(false);
    gateway.complete(5);
    gateway.complete(5);
    assert_eq!(requests(&gateway).len(), 2);
    assert_eq!(
      gateway.tracker().in_flight_len(),
      2
    );
  }

  #[test]
  fn unclaimed_requests_do_not_settle() {
    let tracker = MutationTracker::new();
    assert_eq!(
      tracker.settle(Uuid::new_v4(), Ok(())),
      None
    );
  }

  #[test]
  fn commands_and_mutations_agree() {
    let request = RemoteRequest::from(
      TaskMutation {
        task_id: 3,
        kind:    MutationKind::DeleteCompleted
      }
    );
    assert_eq!(
      request.command(),
      "task_delete_completed"
    );
    assert_eq!(
      request.mutation(),
      Some(TaskMutation {
        task_id: 3,
        kind:    MutationKind::DeleteCompleted
      })
    );
    assert_eq!(
      RemoteRequest::FetchNotifications
        .mutation(),
      None
    );
  }
}
