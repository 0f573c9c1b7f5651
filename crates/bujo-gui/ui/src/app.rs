use std::rc::Rc;

use bujo_core::gateway::{
  Dispatch,
  MutationTracker,
  RemoteCall,
  RemoteRequest,
  TaskGateway
};
use bujo_core::menu::Delegation;
use bujo_core::refresh::{
  AccountRefresh,
  Reconciler
};
use bujo_gui_shared::TaskId;
use gloo::console::log;
use yew::{
  Callback,
  ContextProvider,
  Html,
  UseReducerHandle,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_reducer
};
use yew_router::prelude::*;

use crate::account::{
  AccountStore,
  StoreAction
};
use crate::components::{
  AppFooter,
  MyselfBar,
  ProjectTaskList,
  TaskDetail
};
use crate::remote::TauriDispatch;
use crate::settings::Settings;

#[derive(
  Clone, Routable, PartialEq, Debug,
)]
pub enum Route {
  #[at("/")]
  Home,
  #[at("/task/:id")]
  Task { id: TaskId },
  #[not_found]
  #[at("/404")]
  NotFound
}

/// Read-only account handle shared with every view. Mutations leave
/// through `gateway()`, never through the store.
#[derive(Clone, PartialEq)]
pub struct AccountContext {
  pub store:      UseReducerHandle<AccountStore>,
  pub settings:   Rc<Settings>,
  pub dispatcher: TauriDispatch
}

impl AccountContext {
  pub fn gateway(
    &self
  ) -> TaskGateway<TauriDispatch> {
    TaskGateway::new(
      self.dispatcher.clone(),
      self.dispatcher.tracker().clone()
    )
    .with_dedupe(
      self.settings.config.gateway.dedupe_in_flight
    )
  }

  pub fn tracker(&self) -> &MutationTracker {
    self.dispatcher.tracker()
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let settings =
    use_memo((), |_| Settings::embedded());
  let tracker =
    use_memo((), |_| MutationTracker::new());
  let store =
    use_reducer(AccountStore::default);
  let dispatcher = TauriDispatch::new(
    (*tracker).clone(),
    store.dispatcher()
  );

  {
    let dispatcher = dispatcher.clone();
    use_effect_with((), move |_| {
      ui_debug(
        "app.mounted",
        "fetching profile, notifications \
         and projects"
      );
      AccountRefresh::new(dispatcher.clone())
        .on_mount();
      dispatcher.dispatch(RemoteCall::new(
        RemoteRequest::FetchProjects
      ));
      || ()
    });
  }

  {
    let dispatcher = dispatcher.clone();
    use_effect_with(
      store.snapshot.project_ids(),
      move |project_ids| {
        tracing::info!(
          projects = project_ids.len(),
          "fetching task lists"
        );
        for project_id in project_ids {
          dispatcher.dispatch(RemoteCall::new(
            RemoteRequest::FetchTasks {
              project_id: *project_id
            }
          ));
          dispatcher.dispatch(RemoteCall::new(
            RemoteRequest::FetchCompletedTasks {
              project_id: *project_id
            }
          ));
        }
        || ()
      }
    );
  }

  {
    let dispatcher = dispatcher.clone();
    let store = store.clone();
    let reconciler = Reconciler::new(
      settings
        .config
        .refresh
        .reconcile_after_mutation
    );
    use_effect_with(
      store.settle_tick,
      move |tick| {
        let events =
          dispatcher.tracker().drain();
        if !events.is_empty() {
          tracing::debug!(
            tick,
            events = events.len(),
            "reconciling settled mutations"
          );
          let failures = reconciler.reconcile(
            events,
            &store.snapshot,
            &dispatcher
          );
          if !failures.is_empty() {
            store.dispatch(StoreAction::Alert(
              failures
            ));
          }
        }
        || ()
      }
    );
  }

  let context = AccountContext {
    store,
    settings,
    dispatcher
  };

  html! {
      <ContextProvider<AccountContext> context={context}>
          <BrowserRouter>
              <div class="layout">
                  <MyselfBar />
                  <main class="content">
                      <Switch<Route> render={switch} />
                  </main>
                  <AppFooter />
              </div>
          </BrowserRouter>
      </ContextProvider<AccountContext>>
  }
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Home => {
      html! { <ProjectTaskList on_delegate={Callback::from(on_delegate)} /> }
    }
    | Route::Task { id } => {
      html! { <TaskDetail task_id={id} /> }
    }
    | Route::NotFound => {
      html! { <div class="empty">{ "Nothing here." }</div> }
    }
  }
}

/// Editing, moving and sharing belong to other screens; the request is
/// only recorded here.
fn on_delegate(delegation: Delegation) {
  ui_debug(
    "menu.delegate",
    &format!(
      "{:?} {} {}",
      delegation.collaborator,
      delegation.item_type.as_str(),
      delegation.item_id
    )
  );
}

pub(crate) fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn task_route_matches_summary_links() {
    assert_eq!(
      Route::Task { id: 42 }.to_path(),
      bujo_core::summary::detail_path(42)
    );
    assert_eq!(
      Route::recognize("/task/7"),
      Some(Route::Task { id: 7 })
    );
  }
}
