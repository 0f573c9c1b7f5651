use bujo_core::menu::Delegation;
use bujo_gui_shared::ProjectDto;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_context
};

use super::TaskItem;
use crate::app::AccountContext;

#[derive(Properties, PartialEq)]
pub struct ProjectTaskListProps {
  pub on_delegate: Callback<Delegation>
}

#[function_component(ProjectTaskList)]
pub fn project_task_list(
  props: &ProjectTaskListProps
) -> Html {
  let Some(ctx) =
    use_context::<AccountContext>()
  else {
    return html! {};
  };
  let snapshot = &ctx.store.snapshot;

  if snapshot.owned_projects.is_empty()
    && snapshot.shared_projects.is_empty()
  {
    return html! {
        <div class="panel">
            <div class="empty">{ "No projects yet." }</div>
        </div>
    };
  }

  let render_project = |project: &ProjectDto,
                        owner: Option<&str>| {
    let views = snapshot
      .task_views(project.id, ctx.settings.tz);
    html! {
        <section class="panel project" key={project.id}>
            <div class="header">
                { project.name.clone() }
                {
                    match owner {
                        | Some(owner) => html! { <span class="owner">{ format!(" · {owner}") }</span> },
                        | None => html! {}
                    }
                }
            </div>
            {
                if views.is_empty() {
                    html! { <div class="empty">{ "No tasks." }</div> }
                } else {
                    html! {
                        <>
                            {
                                for views.into_iter().map(|view| {
                                    let key = view.render_key();
                                    html! {
                                        <TaskItem
                                            key={key}
                                            view={view}
                                            on_delegate={props.on_delegate.clone()}
                                        />
                                    }
                                })
                            }
                        </>
                    }
                }
            }
        </section>
    }
  };

  html! {
      <div class="project-task-list">
          {
              for snapshot
                  .owned_projects
                  .iter()
                  .map(|owned| render_project(owned, None))
          }
          {
              for snapshot.shared_projects.iter().flat_map(|group| {
                  group
                      .projects
                      .iter()
                      .map(move |shared| render_project(shared, Some(group.owner.as_str())))
              })
          }
      </div>
  }
}
