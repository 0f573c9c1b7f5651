use bujo_gui_shared::{
  ProjectItemType,
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

use crate::model::{
  Phase,
  TaskView
};

pub const DELETE_WARNING: &str =
  "Deleting Task also deletes its child \
   tasks. Are you sure?";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
)]
pub enum MenuAction {
  Edit,
  Move,
  Share,
  Complete,
  Uncomplete,
  Delete
}

impl MenuAction {
  pub fn label(self) -> &'static str {
    match self {
      | Self::Edit => "Edit",
      | Self::Move => "Move",
      | Self::Share => "Share",
      | Self::Complete => "Complete",
      | Self::Uncomplete => "Uncomplete",
      | Self::Delete => "Delete"
    }
  }

  pub fn is_destructive(self) -> bool {
    matches!(self, Self::Delete)
  }

  pub fn from_label(
    label: &str
  ) -> Option<Self> {
    match label
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "edit" => Some(Self::Edit),
      | "move" => Some(Self::Move),
      | "share" => Some(Self::Share),
      | "complete" => Some(Self::Complete),
      | "uncomplete" => {
        Some(Self::Uncomplete)
      }
      | "delete" => Some(Self::Delete),
      | _ => None
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
pub enum MutationKind {
  Complete,
  Uncomplete,
  Delete,
  DeleteCompleted
}

impl MutationKind {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Complete => "complete",
      | Self::Uncomplete => "uncomplete",
      | Self::Delete => "delete",
      | Self::DeleteCompleted => {
        "delete_completed"
      }
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
pub struct TaskMutation {
  pub task_id: TaskId,
  pub kind:    MutationKind
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Collaborator {
  Editor,
  Mover,
  Sharer
}

/// Hand-off to an external dialog that renders its own UI.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Delegation {
  pub collaborator: Collaborator,
  pub item_type:    ProjectItemType,
  pub item_id:      TaskId
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct MenuEntry {
  pub action:      MenuAction,
  pub destructive: bool
}

impl MenuEntry {
  const fn new(action: MenuAction) -> Self {
    Self {
      action,
      destructive: matches!(
        action,
        MenuAction::Delete
      )
    }
  }

  pub fn label(&self) -> &'static str {
    self.action.label()
  }
}

const ACTIVE_ENTRIES: [MenuEntry; 5] = [
  MenuEntry::new(MenuAction::Edit),
  MenuEntry::new(MenuAction::Move),
  MenuEntry::new(MenuAction::Share),
  MenuEntry::new(MenuAction::Complete),
  MenuEntry::new(MenuAction::Delete)
];

const COMPLETED_ENTRIES: [MenuEntry; 2] = [
  MenuEntry::new(MenuAction::Uncomplete),
  MenuEntry::new(MenuAction::Delete)
];

pub fn entries_for(
  phase: Phase
) -> &'static [MenuEntry] {
  match phase {
    | Phase::Active => &ACTIVE_ENTRIES,
    | Phase::Completed => &COMPLETED_ENTRIES
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ConfirmPrompt {
  pub title:       &'static str,
  pub ok_text:     &'static str,
  pub cancel_text: &'static str
}

impl ConfirmPrompt {
  pub const DELETE: Self = Self {
    title:       DELETE_WARNING,
    ok_text:     "Yes",
    cancel_text: "No"
  };
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MenuState {
  Closed,
  Open,
  Confirming(MenuAction)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MenuOutcome {
  Dispatch(TaskMutation),
  Delegate(Delegation),
  Confirm(ConfirmPrompt),
  Ignored
}

/// Per-task popover menu. The offered actions follow the view's phase;
/// delete waits in [`MenuState::Confirming`] until answered.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ActionMenu {
  task_id: TaskId,
  phase:   Phase,
  state:   MenuState
}

impl ActionMenu {
  pub fn for_view(view: &TaskView) -> Self {
    Self {
      task_id: view.id(),
      phase:   view.phase(),
      state:   MenuState::Closed
    }
  }

  pub fn task_id(&self) -> TaskId {
    self.task_id
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn state(&self) -> MenuState {
    self.state
  }

  pub fn is_open(&self) -> bool {
    !matches!(self.state, MenuState::Closed)
  }

  pub fn entries(
    &self
  ) -> &'static [MenuEntry] {
    entries_for(self.phase)
  }

  pub fn offers(
    &self,
    action: MenuAction
  ) -> bool {
    self
      .entries()
      .iter()
      .any(|entry| entry.action == action)
  }

  /// Follows a re-fetched view of the same slot. A change of task or
  /// phase closes the menu.
  pub fn sync(&mut self, view: &TaskView) {
    if self.task_id == view.id()
      && self.phase == view.phase()
    {
      return;
    }
    debug!(
      task_id = view.id(),
      from = self.phase.as_str(),
      to = view.phase().as_str(),
      "action menu rebound to new view"
    );
    *self = Self::for_view(view);
  }

  pub fn open(&mut self) {
    if self.state == MenuState::Closed {
      self.state = MenuState::Open;
    }
  }

  /// Trigger click.
  pub fn toggle(&mut self) {
    self.state = match self.state {
      | MenuState::Closed => MenuState::Open,
      | MenuState::Open
      | MenuState::Confirming(_) => {
        MenuState::Closed
      }
    };
  }

  /// Outside interaction. Any pending confirmation is dropped.
  pub fn dismiss(&mut self) {
    self.state = MenuState::Closed;
  }

  pub fn select(
    &mut self,
    action: MenuAction
  ) -> MenuOutcome {
    if self.state == MenuState::Closed {
      debug!(
        task_id = self.task_id,
        action = action.label(),
        "selection on a closed menu"
      );
      return MenuOutcome::Ignored;
    }

    if !self.offers(action) {
      warn!(
        task_id = self.task_id,
        phase = self.phase.as_str(),
        action = action.label(),
        "action not offered in this phase"
      );
      return MenuOutcome::Ignored;
    }

    if action.is_destructive() {
      self.state =
        MenuState::Confirming(action);
      return MenuOutcome::Confirm(
        ConfirmPrompt::DELETE
      );
    }

    self.state = MenuState::Closed;
    let item_id = self.task_id;
    let delegate =
      |collaborator| {
        MenuOutcome::Delegate(Delegation {
          collaborator,
          item_type: ProjectItemType::Todo,
          item_id
        })
      };

    match action {
      | MenuAction::Edit => {
        delegate(Collaborator::Editor)
      }
      | MenuAction::Move => {
        delegate(Collaborator::Mover)
      }
      | MenuAction::Share => {
        delegate(Collaborator::Sharer)
      }
      | MenuAction::Complete => {
        self.mutation(MutationKind::Complete)
      }
      | MenuAction::Uncomplete => {
        self.mutation(
          MutationKind::Uncomplete
        )
      }
      | MenuAction::Delete => {
        MenuOutcome::Ignored
      }
    }
  }

  pub fn confirm(&mut self) -> MenuOutcome {
    let MenuState::Confirming(action) =
      self.state
    else {
      return MenuOutcome::Ignored;
    };
    self.state = MenuState::Closed;

    match action {
      | MenuAction::Delete => {
        let Some(mutation) =
          self.mutation_for(action)
        else {
          return MenuOutcome::Ignored;
        };
        info!(
          task_id = self.task_id,
          kind = mutation.kind.as_str(),
          "delete confirmed"
        );
        MenuOutcome::Dispatch(mutation)
      }
      | _ => MenuOutcome::Ignored
    }
  }

  pub fn decline(&mut self) -> MenuOutcome {
    if let MenuState::Confirming(action) =
      self.state
    {
      info!(
        task_id = self.task_id,
        action = action.label(),
        "confirmation declined"
      );
      self.state = MenuState::Open;
    }
    MenuOutcome::Ignored
  }

  /// The mutation an entry ends in, if it ends in one at all.
  pub fn mutation_for(
    &self,
    action: MenuAction
  ) -> Option<TaskMutation> {
    let kind = match (action, self.phase) {
      | (MenuAction::Complete, _) => {
        MutationKind::Complete
      }
      | (MenuAction::Uncomplete, _) => {
        MutationKind::Uncomplete
      }
      | (MenuAction::Delete, Phase::Active) => {
        MutationKind::Delete
      }
      | (
        MenuAction::Delete,
        Phase::Completed
      ) => MutationKind::DeleteCompleted,
      | (
        MenuAction::Edit
        | MenuAction::Move
        | MenuAction::Share,
        _
      ) => return None
    };
    Some(TaskMutation {
      task_id: self.task_id,
      kind
    })
  }

  fn mutation(
    &self,
    kind: MutationKind
  ) -> MenuOutcome {
    MenuOutcome::Dispatch(TaskMutation {
      task_id: self.task_id,
      kind
    })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::model::{
    Person,
    Task
  };

  fn task(id: TaskId) -> Task {
    Task::new(id, 1, "Plan", Person {
      name:   "mia".to_string(),
      avatar: None
    })
  }

  fn actions(menu: &ActionMenu) -> Vec<MenuAction> {
    menu
      .entries()
      .iter()
      .map(|entry| entry.action)
      .collect()
  }

  #[test]
  fn active_menu_offers_the_full_set() {
    let menu = ActionMenu::for_view(
      &TaskView::Active(task(1))
    );
    assert_eq!(actions(&menu), vec![
      MenuAction::Edit,
      MenuAction::Move,
      MenuAction::Share,
      MenuAction::Complete,
      MenuAction::Delete
    ]);
  }

  #[test]
  fn completed_menu_offers_uncomplete_and_delete()
  {
    let menu = ActionMenu::for_view(
      &TaskView::Completed(task(1))
    );
    assert_eq!(actions(&menu), vec![
      MenuAction::Uncomplete,
      MenuAction::Delete
    ]);
    assert!(!menu.offers(MenuAction::Edit));
    assert!(!menu.offers(MenuAction::Complete));
  }

  #[test]
  fn only_delete_is_destructive() {
    for phase in [Phase::Active, Phase::Completed]
    {
      for entry in entries_for(phase) {
        assert_eq!(
          entry.destructive,
          entry.action == MenuAction::Delete
        );
      }
    }
  }

  #[test]
  fn complete_fires_immediately_and_closes() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Active(task(4))
    );
    menu.open();
    assert_eq!(
      menu.select(MenuAction::Complete),
      MenuOutcome::Dispatch(TaskMutation {
        task_id: 4,
        kind:    MutationKind::Complete
      })
    );
    assert_eq!(menu.state(), MenuState::Closed);
  }

  #[test]
  fn delete_waits_for_confirmation() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Active(task(4))
    );
    menu.open();
    assert_eq!(
      menu.select(MenuAction::Delete),
      MenuOutcome::Confirm(ConfirmPrompt::DELETE)
    );
    assert_eq!(
      menu.state(),
      MenuState::Confirming(MenuAction::Delete)
    );
    assert_eq!(
      menu.decline(),
      MenuOutcome::Ignored
    );
    assert_eq!(menu.state(), MenuState::Open);
    assert_eq!(
      menu.confirm(),
      MenuOutcome::Ignored
    );
  }

  #[test]
  fn confirmed_delete_depends_on_phase() {
    let mut active = ActionMenu::for_view(
      &TaskView::Active(task(8))
    );
    active.open();
    active.select(MenuAction::Delete);
    assert_eq!(
      active.confirm(),
      MenuOutcome::Dispatch(TaskMutation {
        task_id: 8,
        kind:    MutationKind::Delete
      })
    );

    let mut completed = ActionMenu::for_view(
      &TaskView::Completed(task(8))
    );
    completed.open();
    completed.select(MenuAction::Delete);
    assert_eq!(
      completed.confirm(),
      MenuOutcome::Dispatch(TaskMutation {
        task_id: 8,
        kind:    MutationKind::DeleteCompleted
      })
    );
  }

  #[test]
  fn edit_move_share_delegate_as_task_items() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Active(task(9))
    );
    for (action, collaborator) in [
      (MenuAction::Edit, Collaborator::Editor),
      (MenuAction::Move, Collaborator::Mover),
      (MenuAction::Share, Collaborator::Sharer)
    ] {
      menu.open();
      assert_eq!(
        menu.select(action),
        MenuOutcome::Delegate(Delegation {
          collaborator,
          item_type: ProjectItemType::Todo,
          item_id: 9
        })
      );
    }
  }

  #[test]
  fn closed_or_foreign_selections_are_ignored() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Completed(task(2))
    );
    assert_eq!(
      menu.select(MenuAction::Uncomplete),
      MenuOutcome::Ignored
    );
    menu.open();
    assert_eq!(
      menu.select(MenuAction::Complete),
      MenuOutcome::Ignored
    );
    assert!(menu.is_open());
  }

  #[test]
  fn dismiss_drops_pending_confirmation() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Active(task(3))
    );
    menu.toggle();
    menu.select(MenuAction::Delete);
    menu.dismiss();
    assert_eq!(menu.state(), MenuState::Closed);
    assert_eq!(
      menu.confirm(),
      MenuOutcome::Ignored
    );
  }

  #[test]
  fn sync_switches_phase_after_refresh() {
    let mut menu = ActionMenu::for_view(
      &TaskView::Active(task(5))
    );
    menu.open();
    menu.sync(&TaskView::Completed(task(5)));
    assert_eq!(menu.phase(), Phase::Completed);
    assert_eq!(menu.state(), MenuState::Closed);
    assert_eq!(actions(&menu), vec![
      MenuAction::Uncomplete,
      MenuAction::Delete
    ]);
  }

  #[test]
  fn labels_round_trip_through_from_label() {
    for action in [
      MenuAction::Edit,
      MenuAction::Move,
      MenuAction::Share,
      MenuAction::Complete,
      MenuAction::Uncomplete,
      MenuAction::Delete
    ] {
      assert_eq!(
        MenuAction::from_label(action.label()),
        Some(action)
      );
    }
    assert_eq!(MenuAction::from_label("archive"), None);
  }
}
