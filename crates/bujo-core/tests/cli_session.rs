#![cfg(feature = "cli")]

use bujo_core::commands::{
  MutationReport,
  Session
};
use bujo_core::config::Config;
use bujo_core::datastore::SnapshotFile;
use bujo_core::menu::MenuAction;
use bujo_core::model::Phase;
use bujo_core::refresh::{
  CreateAffordance,
  RefreshTrigger
};
use bujo_core::store::AccountSnapshot;
use bujo_gui_shared::{
  NotificationDto,
  ProjectDto,
  ProjectItemType,
  TaskDto
};
use tempfile::tempdir;

fn seeded_file(
  dir: &std::path::Path
) -> SnapshotFile {
  let mut seed = AccountSnapshot::default();
  seed.myself.username = "mia".to_string();
  seed.notifications = vec![NotificationDto {
    id:         1,
    title:      "leo shared Garden".to_string(),
    content:    None,
    originator: Some("leo".to_string()),
    timestamp:  None
  }];
  seed.owned_projects = vec![ProjectDto {
    id:           1,
    name:         "Home".to_string(),
    project_type: ProjectItemType::Todo,
    owner:        "mia".to_string()
  }];
  seed.tasks.insert(1, vec![TaskDto {
    id:                 1,
    project_id:         1,
    parent_id:          None,
    name:               "Pay rent".to_string(),
    due_date:           None,
    due_time:           None,
    timezone:           None,
    labels:             vec![],
    owner:              "mia".to_string(),
    owner_avatar:       None,
    assigned_to:        None,
    assigned_to_avatar: None
  }]);

  let file =
    SnapshotFile::new(dir.join("snapshot.json"));
  file.save(&seed).expect("seed snapshot");
  file
}

#[test]
fn completion_is_persisted_and_reflected_in_the_next_session()
{
  let dir = tempdir().expect("tempdir");
  let file = seeded_file(dir.path());

  let mut session =
    Session::open(Config::default(), file.clone())
      .expect("open session");
  session.sync();
  let report = session
    .run_action(1, MenuAction::Complete, |_| {
      panic!("complete never asks")
    })
    .expect("complete");
  let MutationReport::Dispatched {
    failures,
    view,
    ..
  } = report
  else {
    panic!("complete must dispatch");
  };
  assert!(failures.is_empty());
  assert_eq!(
    view.map(|view| view.phase()),
    Some(Phase::Completed)
  );

  let mut next =
    Session::open(Config::default(), file)
      .expect("reopen session");
  next.sync();
  assert_eq!(
    next.view(1).expect("listed").phase(),
    Phase::Completed
  );
  assert!(
    next
      .run_action(1, MenuAction::Complete, |_| {
        Ok(true)
      })
      .is_err(),
    "complete is not offered on a completed task"
  );
}

#[test]
fn declined_delete_leaves_the_snapshot_alone() {
  let dir = tempdir().expect("tempdir");
  let file = seeded_file(dir.path());
  let before = std::fs::read_to_string(&file.path)
    .expect("read snapshot");

  let mut session =
    Session::open(Config::default(), file.clone())
      .expect("open session");
  session.sync();
  let report = session
    .run_action(1, MenuAction::Delete, |prompt| {
      assert_eq!(prompt.ok_text, "Yes");
      Ok(false)
    })
    .expect("delete");
  assert_eq!(report, MutationReport::Cancelled);
  assert_eq!(session.tracker().in_flight_len(), 0);
  assert_eq!(
    std::fs::read_to_string(&file.path)
      .expect("reread snapshot"),
    before
  );

  let report = session
    .run_action(1, MenuAction::Delete, |_| Ok(true))
    .expect("delete");
  assert!(matches!(
    report,
    MutationReport::Dispatched { view: None, .. }
  ));
  assert!(session.summaries(None).is_empty());
}

#[test]
fn refresh_reports_profile_notifications_and_affordance()
{
  let dir = tempdir().expect("tempdir");
  let mut session = Session::open(
    Config::default(),
    seeded_file(dir.path())
  )
  .expect("open session");
  session.sync();

  let report = session.refresh(RefreshTrigger::Manual);
  assert_eq!(report.commands, vec![
    "myself_get",
    "system_status",
    "notifications_list"
  ]);
  assert_eq!(report.username, "mia");
  assert_eq!(report.notifications, 1);
  assert_eq!(
    report.affordance,
    CreateAffordance::CreateItem
  );

  let empty_dir = tempdir().expect("tempdir");
  let mut empty = Session::open(
    Config::default(),
    SnapshotFile::new(
      empty_dir.path().join("none.json")
    )
  )
  .expect("open empty session");
  empty.sync();
  assert_eq!(
    empty
      .refresh(RefreshTrigger::Mount)
      .affordance,
    CreateAffordance::CreateProject
  );
}
