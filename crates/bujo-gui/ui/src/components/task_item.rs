use bujo_core::menu::Delegation;
use bujo_core::model::{
  Phase,
  TaskView
};
use bujo_core::summary::TaskSummary;
use chrono::Utc;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_context
};
use yew_router::prelude::Link;

use super::{
  AvatarBadgeView,
  LabelTagView,
  TaskActionMenu
};
use crate::app::{
  AccountContext,
  Route
};

#[derive(Properties, PartialEq)]
pub struct TaskItemProps {
  pub view:        TaskView,
  pub on_delegate: Callback<Delegation>
}

#[function_component(TaskItem)]
pub fn task_item(
  props: &TaskItemProps
) -> Html {
  let Some(ctx) =
    use_context::<AccountContext>()
  else {
    return html! {};
  };

  let summary = TaskSummary::build(
    &props.view,
    &ctx.settings.icons,
    Utc::now()
  );
  let busy =
    ctx.tracker().is_busy(summary.task_id);

  html! {
      <div class={classes!(
          "task-item",
          (summary.phase == Phase::Completed).then_some("completed"),
          busy.then_some("busy")
      )}>
          <div class="task-main">
              <span class="glyph" title={summary.name_glyph.name.to_string()}>
                  { summary.name_glyph.symbol.to_string() }
              </span>
              <Link<Route> to={Route::Task { id: summary.task_id }} classes="task-name">
                  { summary.name.clone() }
              </Link<Route>>
              <span class="labels">
                  {
                      for summary.labels.iter().map(|tag| html! {
                          <LabelTagView key={tag.id} tag={tag.clone()} />
                      })
                  }
              </span>
          </div>
          <div class="task-meta">
              {
                  match &summary.due_phrase {
                      | Some(phrase) => html! { <span class="due">{ phrase.clone() }</span> },
                      | None => html! {}
                  }
              }
              <AvatarBadgeView badge={summary.owner.clone()} />
              <AvatarBadgeView badge={summary.assignee.clone()} />
              <TaskActionMenu view={props.view.clone()} on_delegate={props.on_delegate.clone()} />
          </div>
      </div>
  }
}
