use std::rc::Rc;

use bujo_core::store::{
  AccountSnapshot,
  RemoteResponse
};
use bujo_gui_shared::NotificationDto;
use yew::Reducible;

/// Client-side account state. Responses land here through
/// [`StoreAction::Apply`]; components only read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountStore {
  pub snapshot:     AccountSnapshot,
  /// Local failures shown next to the remote notifications.
  pub alerts:       Vec<NotificationDto>,
  /// Bumped when a mutation is handed to the host, so rows re-read the
  /// in-flight tracker.
  pub request_tick: u64,
  /// Bumped whenever a mutation settles.
  pub settle_tick:  u64
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
  Apply(RemoteResponse),
  Alert(Vec<NotificationDto>),
  DismissAlert(u64),
  Requested,
  Settled
}

impl Reducible for AccountStore {
  type Action = StoreAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    match action {
      | StoreAction::Apply(response) => {
        next.snapshot.apply(response);
      }
      | StoreAction::Alert(alerts) => {
        next.alerts.extend(alerts);
      }
      | StoreAction::DismissAlert(id) => {
        next
          .alerts
          .retain(|alert| alert.id != id);
      }
      | StoreAction::Requested => {
        next.request_tick =
          next.request_tick.wrapping_add(1);
      }
      | StoreAction::Settled => {
        next.settle_tick =
          next.settle_tick.wrapping_add(1);
      }
    }
    Rc::new(next)
  }
}

impl AccountStore {
  pub fn notification_count(&self) -> usize {
    self.snapshot.notifications.len()
      + self.alerts.len()
  }
}

#[cfg(test)]
mod tests {
  use bujo_gui_shared::TaskDto;

  use super::*;

  fn alert(id: u64) -> NotificationDto {
    NotificationDto {
      id,
      title: format!("alert {id}"),
      content: None,
      originator: None,
      timestamp: None
    }
  }

  #[test]
  fn responses_flow_into_the_snapshot() {
    let store = Rc::new(AccountStore::default());
    let store = store.reduce(StoreAction::Apply(
      RemoteResponse::Tasks {
        project_id: 2,
        tasks:      vec![TaskDto {
          id:                 9,
          project_id:         2,
          parent_id:          None,
          name:               "Sweep".to_string(),
          due_date:           None,
          due_time:           None,
          timezone:           None,
          labels:             vec![],
          owner:              "mia".to_string(),
          owner_avatar:       None,
          assigned_to:        None,
          assigned_to_avatar: None
        }]
      }
    ));
    assert!(store.snapshot.locate(9).is_some());
    assert_eq!(store.settle_tick, 0);
  }

  #[test]
  fn alerts_count_and_dismiss() {
    let store = Rc::new(AccountStore::default())
      .reduce(StoreAction::Alert(vec![
        alert(1),
        alert(2),
      ]))
      .reduce(StoreAction::DismissAlert(1))
      .reduce(StoreAction::Settled);
    assert_eq!(store.notification_count(), 1);
    assert_eq!(store.alerts[0].id, 2);
    assert_eq!(store.settle_tick, 1);
  }

  #[test]
  fn requests_change_the_store_without_settling() {
    let before = Rc::new(AccountStore::default());
    let after = Rc::clone(&before)
      .reduce(StoreAction::Requested);
    assert_ne!(*before, *after);
    assert_eq!(after.request_tick, 1);
    assert_eq!(after.settle_tick, 0);
  }
}
