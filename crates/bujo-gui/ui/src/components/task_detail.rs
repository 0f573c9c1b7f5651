use bujo_gui_shared::TaskId;
use yew::{
  Html,
  Properties,
  function_component,
  html,
  use_context
};
use yew_router::prelude::Link;

use crate::app::{
  AccountContext,
  Route
};

#[derive(Properties, PartialEq)]
pub struct TaskDetailProps {
  pub task_id: TaskId
}

/// Landing page for a task's detail link. Only the header is shown.
#[function_component(TaskDetail)]
pub fn task_detail(
  props: &TaskDetailProps
) -> Html {
  let Some(ctx) =
    use_context::<AccountContext>()
  else {
    return html! {};
  };
  let view = ctx
    .store
    .snapshot
    .view_of(props.task_id, ctx.settings.tz);

  html! {
      <div class="panel">
          <div class="header">{ "Task" }</div>
          <div class="details">
              {
                  match view {
                      | Some(view) => html! {
                          <>
                              <div style="font-size:1.15rem;font-weight:700;">{ view.task().name.clone() }</div>
                              <div style="color:var(--muted);">{ view.phase().as_str() }</div>
                          </>
                      },
                      | None => html! {
                          <div style="color:var(--muted);">{ format!("Task {} is not loaded.", props.task_id) }</div>
                      }
                  }
              }
              <Link<Route> to={Route::Home}>{ "Back" }</Link<Route>>
          </div>
      </div>
  }
}
