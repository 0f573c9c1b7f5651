use bujo_core::gateway::{
  Dispatch,
  MutationTracker,
  RemoteCall,
  RemoteRequest
};
use bujo_core::store::RemoteResponse;
use bujo_gui_shared::{
  MyselfArgs,
  MyselfDto,
  NotificationDto,
  ProjectIdArg,
  ProjectsDto,
  SystemStatusDto,
  TaskDto,
  TaskIdArg
};
use yew::UseReducerDispatcher;

use crate::account::{
  AccountStore,
  StoreAction
};
use crate::api::invoke_tauri;

/// Sends calls to the host without waiting on them. Answers go to the
/// account store; mutations are settled on the shared tracker.
#[derive(Clone, PartialEq)]
pub struct TauriDispatch {
  tracker: MutationTracker,
  store:   UseReducerDispatcher<AccountStore>
}

impl TauriDispatch {
  pub fn new(
    tracker: MutationTracker,
    store: UseReducerDispatcher<AccountStore>
  ) -> Self {
    Self { tracker, store }
  }

  pub fn tracker(&self) -> &MutationTracker {
    &self.tracker
  }
}

impl Dispatch for TauriDispatch {
  fn dispatch(&self, call: RemoteCall) {
    if call.request.mutation().is_some() {
      self.store.dispatch(StoreAction::Requested);
    }
    let tracker = self.tracker.clone();
    let store = self.store.clone();

    wasm_bindgen_futures::spawn_local(
      async move {
        let command = call.request.command();
        tracing::debug!(
          request_id = %call.request_id,
          command,
          "invoking host command"
        );
        let result = send(&call.request).await;

        if call.request.mutation().is_some() {
          tracker.settle(
            call.request_id,
            result
              .as_ref()
              .map(|_| ())
              .map_err(Clone::clone)
          );
          store.dispatch(StoreAction::Settled);
        }

        match result {
          | Ok(response) => {
            store.dispatch(StoreAction::Apply(
              response
            ));
          }
          | Err(err) => {
            tracing::error!(
              request_id = %call.request_id,
              command,
              error = %err,
              "host command failed"
            );
            if call.request.mutation().is_none()
            {
              store.dispatch(StoreAction::Alert(
                vec![NotificationDto {
                  id:         call
                    .request_id
                    .as_u64_pair()
                    .0,
                  title:      format!(
                    "Could not load {command}"
                  ),
                  content:    Some(err),
                  originator: None,
                  timestamp:  None
                }]
              ));
            }
          }
        }
      }
    );
  }
}

async fn send(
  request: &RemoteRequest
) -> Result<RemoteResponse, String> {
  let command = request.command();
  match request {
    | RemoteRequest::CompleteTask {
      task_id
    }
    | RemoteRequest::UncompleteTask {
      task_id
    }
    | RemoteRequest::DeleteTask { task_id }
    | RemoteRequest::DeleteCompletedTask {
      task_id
    } => {
      invoke_tauri::<(), _>(command, &TaskIdArg {
        task_id: *task_id
      })
      .await?;
      Ok(RemoteResponse::Ack)
    }
    | RemoteRequest::FetchMyself { expand } => {
      let myself = invoke_tauri::<MyselfDto, _>(
        command,
        &MyselfArgs { expand: *expand }
      )
      .await?;
      Ok(RemoteResponse::Myself(myself))
    }
    | RemoteRequest::FetchSystemStatus => {
      let status =
        invoke_tauri::<SystemStatusDto, _>(
          command,
          &()
        )
        .await?;
      Ok(RemoteResponse::SystemStatus(status))
    }
    | RemoteRequest::FetchNotifications => {
      let notifications = invoke_tauri::<
        Vec<NotificationDto>,
        _
      >(command, &())
      .await?;
      Ok(RemoteResponse::Notifications(
        notifications
      ))
    }
    | RemoteRequest::FetchProjects => {
      let projects =
        invoke_tauri::<ProjectsDto, _>(
          command,
          &()
        )
        .await?;
      Ok(RemoteResponse::Projects {
        owned:  projects.owned,
        shared: projects.shared
      })
    }
    | RemoteRequest::FetchTasks {
      project_id
    } => {
      let tasks = invoke_tauri::<Vec<TaskDto>, _>(
        command,
        &ProjectIdArg {
          project_id: *project_id
        }
      )
      .await?;
      Ok(RemoteResponse::Tasks {
        project_id: *project_id,
        tasks
      })
    }
    | RemoteRequest::FetchCompletedTasks {
      project_id
    } => {
      let tasks = invoke_tauri::<Vec<TaskDto>, _>(
        command,
        &ProjectIdArg {
          project_id: *project_id
        }
      )
      .await?;
      Ok(RemoteResponse::CompletedTasks {
        project_id: *project_id,
        tasks
      })
    }
  }
}
