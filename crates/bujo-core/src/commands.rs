use std::io::{
  self,
  BufRead,
  Write
};
use std::rc::Rc;

use anyhow::{
  anyhow,
  bail
};
use bujo_gui_shared::{
  NotificationDto,
  ProjectId,
  TaskId
};
use chrono::Utc;
use tracing::{
  debug,
  info,
  warn
};

use crate::authority::InMemoryAuthority;
use crate::cli::Command;
use crate::config::Config;
use crate::datastore::SnapshotFile;
use crate::gateway::{
  Dispatch,
  GatewayOutcome,
  MutationTracker,
  RemoteCall,
  RemoteRequest,
  RequestId,
  TaskGateway
};
use crate::menu::{
  ActionMenu,
  ConfirmPrompt,
  MenuAction,
  MenuOutcome
};
use crate::model::TaskView;
use crate::refresh::{
  AccountRefresh,
  CreateAffordance,
  Reconciler,
  RefreshTrigger,
  create_affordance,
  display_username
};
use crate::render::Renderer;
use crate::store::AccountSnapshot;
use crate::summary::TaskSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationReport {
  Dispatched {
    request_id: RequestId,
    failures:   Vec<NotificationDto>,
    view:       Option<TaskView>
  },
  AlreadyInFlight,
  Cancelled
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
  pub commands:      Vec<&'static str>,
  pub username:      String,
  pub notifications: usize,
  pub affordance:    CreateAffordance
}

/// One CLI invocation: the local authority loaded from the snapshot
/// file, and the client-side view of it built through fetches.
#[derive(Debug)]
pub struct Session {
  cfg:        Config,
  file:       SnapshotFile,
  tracker:    MutationTracker,
  authority:  Rc<InMemoryAuthority>,
  gateway:    TaskGateway<Rc<InMemoryAuthority>>,
  reconciler: Reconciler,
  client:     AccountSnapshot
}

impl Session {
  #[tracing::instrument(skip(cfg, file), fields(file = %file.path.display()))]
  pub fn open(
    cfg: Config,
    file: SnapshotFile
  ) -> anyhow::Result<Self> {
    let seed = file.load()?;
    let tracker = MutationTracker::new();
    let authority = Rc::new(
      InMemoryAuthority::new(
        seed,
        tracker.clone()
      )
    );
    let gateway = TaskGateway::new(
      Rc::clone(&authority),
      tracker.clone()
    )
    .with_dedupe(cfg.gateway.dedupe_in_flight);
    let reconciler = Reconciler::new(
      cfg.refresh.reconcile_after_mutation
    );

    Ok(Self {
      cfg,
      file,
      tracker,
      authority,
      gateway,
      reconciler,
      client: AccountSnapshot::default()
    })
  }

  pub fn client(&self) -> &AccountSnapshot {
    &self.client
  }

  pub fn tracker(&self) -> &MutationTracker {
    &self.tracker
  }

  /// Pulls projects, then both task lists of every project.
  #[tracing::instrument(skip(self))]
  pub fn sync(&mut self) {
    self.authority.dispatch(RemoteCall::new(
      RemoteRequest::FetchProjects
    ));
    self.pump();

    for project_id in self.client.project_ids() {
      self.authority.dispatch(RemoteCall::new(
        RemoteRequest::FetchTasks {
          project_id
        }
      ));
      self.authority.dispatch(RemoteCall::new(
        RemoteRequest::FetchCompletedTasks {
          project_id
        }
      ));
    }
    self.pump();
  }

  /// Applies every answered call to the client snapshot and returns
  /// the commands that were served.
  fn pump(&mut self) -> Vec<&'static str> {
    let mut served = Vec::new();
    for (call, result) in self.authority.pump() {
      let command = call.request.command();
      match result {
        | Ok(response) => {
          self.client.apply(response);
          served.push(command);
        }
        | Err(error) => {
          warn!(
            request_id = %call.request_id,
            command,
            %error,
            "remote call rejected"
          );
        }
      }
    }
    served
  }

  pub fn view(
    &self,
    task_id: TaskId
  ) -> anyhow::Result<TaskView> {
    self
      .client
      .view_of(task_id, self.cfg.default_tz())
      .ok_or_else(|| {
        anyhow!("task {task_id} not found")
      })
  }

  pub fn summaries(
    &self,
    project: Option<ProjectId>
  ) -> Vec<TaskSummary> {
    let icons = self.cfg.icon_registry();
    let tz = self.cfg.default_tz();
    let now = Utc::now();
    let projects = match project {
      | Some(project_id) => vec![project_id],
      | None => self.client.project_ids()
    };

    projects
      .into_iter()
      .flat_map(|project_id| {
        self.client.task_views(project_id, tz)
      })
      .map(|view| {
        TaskSummary::build(&view, &icons, now)
      })
      .collect()
  }

  pub fn menu(
    &self,
    task_id: TaskId
  ) -> anyhow::Result<ActionMenu> {
    let mut menu =
      ActionMenu::for_view(&self.view(task_id)?);
    menu.open();
    Ok(menu)
  }

  /// Drives one menu entry end to end. `confirm` answers the delete
  /// prompt; a `false` answer dispatches nothing.
  #[tracing::instrument(skip(self, confirm))]
  pub fn run_action<F>(
    &mut self,
    task_id: TaskId,
    action: MenuAction,
    confirm: F
  ) -> anyhow::Result<MutationReport>
  where
    F: FnOnce(&ConfirmPrompt) -> anyhow::Result<bool>
  {
    let mut menu = self.menu(task_id)?;
    let mut outcome = menu.select(action);

    if let MenuOutcome::Confirm(prompt) = outcome {
      if !confirm(&prompt)? {
        menu.decline();
        info!(task_id, "cancelled");
        return Ok(MutationReport::Cancelled);
      }
      outcome = menu.confirm();
    }

    match outcome {
      | MenuOutcome::Dispatch(mutation) => {
        let GatewayOutcome::Dispatched(
          request_id
        ) = self.gateway.submit(mutation)
        else {
          return Ok(
            MutationReport::AlreadyInFlight
          );
        };
        let failures = self.settle();
        self.file.save(&self.authority.state())?;
        Ok(MutationReport::Dispatched {
          request_id,
          failures,
          view: self.view(task_id).ok()
        })
      }
      | MenuOutcome::Delegate(delegation) => {
        bail!(
          "{} is handled by the {:?} \
           collaborator",
          action.label(),
          delegation.collaborator
        )
      }
      | MenuOutcome::Confirm(_)
      | MenuOutcome::Ignored => {
        bail!(
          "{} is not offered for task {} \
           ({})",
          action.label(),
          task_id,
          menu.phase().as_str()
        )
      }
    }
  }

  /// Lets the authority answer, then re-fetches what the settled
  /// mutations touched.
  fn settle(&mut self) -> Vec<NotificationDto> {
    self.pump();
    let events = self.tracker.drain();
    debug!(
      events = events.len(),
      "reconciling mutation events"
    );
    let failures = self.reconciler.reconcile(
      events,
      &self.client,
      &self.authority
    );
    self.pump();
    failures
  }

  /// Runs the account refresh. Project lists come from [`Session::sync`].
  #[tracing::instrument(skip(self))]
  pub fn refresh(
    &mut self,
    trigger: RefreshTrigger
  ) -> RefreshReport {
    AccountRefresh::new(Rc::clone(
      &self.authority
    ))
    .run(trigger);
    let commands = self.pump();

    RefreshReport {
      commands,
      username: self.client.myself.username.clone(),
      notifications: self
        .client
        .notifications
        .len(),
      affordance: create_affordance(
        &self.client.owned_projects,
        &self.client.shared_projects
      )
    }
  }
}

/// Reads one answer from `input`. `y` or the prompt's ok text affirms;
/// anything else, including end of input, declines.
pub fn ask<R: BufRead, W: Write>(
  prompt: &ConfirmPrompt,
  mut input: R,
  mut output: W
) -> anyhow::Result<bool> {
  write!(output, "{} [y/n] ", prompt.title)?;
  output.flush()?;
  let mut answer = String::new();
  input.read_line(&mut answer)?;
  let answer = answer.trim();
  Ok(
    answer.eq_ignore_ascii_case("y")
      || answer
        .eq_ignore_ascii_case(prompt.ok_text)
  )
}

#[tracing::instrument(skip(cfg, file, renderer))]
pub fn dispatch(
  cfg: Config,
  file: SnapshotFile,
  renderer: &Renderer,
  command: Command
) -> anyhow::Result<()> {
  if let Command::Icon { name } = &command {
    let registry = cfg.icon_registry();
    match registry.scan(name) {
      | Some(glyph) => {
        println!("{} {}", glyph.name, glyph.symbol);
      }
      | None => {
        let fallback = registry.resolve(name);
        println!(
          "{name} unknown; falls back to {} {}",
          fallback.name, fallback.symbol
        );
      }
    }
    return Ok(());
  }

  let mut session = Session::open(cfg, file)?;
  session.sync();

  match command {
    | Command::List { project } => {
      renderer.print_summaries(
        &session.summaries(project)
      )?;
    }
    | Command::Menu { id } => {
      renderer.print_menu(
        &session.menu(id)?,
        session.tracker()
      )?;
    }
    | Command::Complete { id } => {
      let report = session.run_action(
        id,
        MenuAction::Complete,
        |_| Ok(true)
      )?;
      print_report(renderer, &session, &report)?;
    }
    | Command::Uncomplete { id } => {
      let report = session.run_action(
        id,
        MenuAction::Uncomplete,
        |_| Ok(true)
      )?;
      print_report(renderer, &session, &report)?;
    }
    | Command::Delete { id, yes } => {
      let report = session.run_action(
        id,
        MenuAction::Delete,
        |prompt| {
          if yes {
            return Ok(true);
          }
          ask(
            prompt,
            io::stdin().lock(),
            io::stderr()
          )
        }
      )?;
      print_report(renderer, &session, &report)?;
    }
    | Command::Refresh { mount } => {
      let trigger = if mount {
        RefreshTrigger::Mount
      } else {
        RefreshTrigger::Manual
      };
      let report = session.refresh(trigger);
      for command in &report.commands {
        println!("fetched {command}");
      }
      println!(
        "user {}",
        display_username(&report.username)
      );
      println!(
        "notifications {}",
        report.notifications
      );
      println!("+ {}", report.affordance.label());
    }
    | Command::Icon { .. } => {}
  }

  Ok(())
}

fn print_report(
  renderer: &Renderer,
  session: &Session,
  report: &MutationReport
) -> anyhow::Result<()> {
  match report {
    | MutationReport::Cancelled => {
      println!("cancelled");
    }
    | MutationReport::AlreadyInFlight => {
      println!("already in flight");
    }
    | MutationReport::Dispatched {
      request_id,
      failures,
      view
    } => {
      println!("request {request_id}");
      for failure in failures {
        eprintln!(
          "{}: {}",
          failure.title,
          failure.content.as_deref().unwrap_or("")
        );
      }
      match view {
        | Some(view) => {
          let mut menu = ActionMenu::for_view(view);
          menu.open();
          renderer.print_menu(
            &menu,
            session.tracker()
          )?;
        }
        | None => println!("task removed"),
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn y_or_ok_text_affirms() {
    let mut sink = Vec::new();
    assert!(
      ask(
        &ConfirmPrompt::DELETE,
        "Y\n".as_bytes(),
        &mut sink
      )
      .expect("ask")
    );
    assert!(
      ask(
        &ConfirmPrompt::DELETE,
        "yes\n".as_bytes(),
        &mut sink
      )
      .expect("ask")
    );
    assert!(
      !ask(
        &ConfirmPrompt::DELETE,
        "n\n".as_bytes(),
        &mut sink
      )
      .expect("ask")
    );
    assert!(
      !ask(
        &ConfirmPrompt::DELETE,
        "".as_bytes(),
        &mut sink
      )
      .expect("ask")
    );
    let shown =
      String::from_utf8(sink).expect("utf8");
    assert!(shown.starts_with(
      "Deleting Task also deletes its child \
       tasks. Are you sure? [y/n] "
    ));
  }
}
