use bujo_core::menu::{
  ActionMenu,
  ConfirmPrompt,
  Delegation,
  MenuAction,
  MenuOutcome,
  MenuState
};
use bujo_core::model::TaskView;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};

use crate::app::{
  AccountContext,
  ui_debug
};

#[derive(Properties, PartialEq)]
pub struct TaskActionMenuProps {
  pub view:        TaskView,
  pub on_delegate: Callback<Delegation>
}

/// Popover anchored to the row's trigger. Delete asks first; entries
/// whose mutation is still in flight are disabled.
#[function_component(TaskActionMenu)]
pub fn task_action_menu(
  props: &TaskActionMenuProps
) -> Html {
  let ctx = use_context::<AccountContext>();
  let menu = {
    let view = props.view.clone();
    use_state(move || {
      ActionMenu::for_view(&view)
    })
  };

  {
    let menu = menu.clone();
    use_effect_with(
      props.view.clone(),
      move |view| {
        let mut next = *menu;
        next.sync(view);
        if next != *menu {
          menu.set(next);
        }
        || ()
      }
    );
  }

  let Some(ctx) = ctx else {
    return html! {};
  };

  let settle = {
    let menu = menu.clone();
    let ctx = ctx.clone();
    let on_delegate =
      props.on_delegate.clone();
    move |next: ActionMenu,
          outcome: MenuOutcome| {
      menu.set(next);
      match outcome {
        | MenuOutcome::Dispatch(mutation) => {
          let result =
            ctx.gateway().submit(mutation);
          ui_debug(
            "menu.dispatch",
            &format!(
              "{} {} -> {result:?}",
              mutation.kind.as_str(),
              mutation.task_id
            )
          );
        }
        | MenuOutcome::Delegate(delegation) => {
          on_delegate.emit(delegation);
        }
        | MenuOutcome::Confirm(prompt) => {
          ui_debug(
            "menu.confirm",
            prompt.title
          );
        }
        | MenuOutcome::Ignored => {}
      }
    }
  };

  let on_trigger = {
    let menu = menu.clone();
    Callback::from(move |e: MouseEvent| {
      e.stop_propagation();
      let mut next = *menu;
      next.toggle();
      menu.set(next);
    })
  };

  let on_dismiss = {
    let menu = menu.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = *menu;
      next.dismiss();
      menu.set(next);
    })
  };

  let on_decline = {
    let menu = menu.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = *menu;
      next.decline();
      menu.set(next);
    })
  };

  let on_confirm = {
    let menu = menu.clone();
    let settle = settle.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = *menu;
      let outcome = next.confirm();
      settle(next, outcome);
    })
  };

  let select = |action: MenuAction| {
    let menu = menu.clone();
    let settle = settle.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = *menu;
      let outcome = next.select(action);
      settle(next, outcome);
    })
  };

  let placement =
    ctx.settings.config.menu.placement.as_str();
  let width = ctx.settings.config.menu.width_px;
  let current = *menu;

  html! {
      <div class="task-action-menu" style={format!("--menu-width:{width}px;")}>
          <button class="btn menu-trigger" title="Manage task" onclick={on_trigger}>{ "⋯" }</button>
          {
              if current.is_open() {
                  html! {
                      <>
                          <div class="menu-backdrop" onclick={on_dismiss}></div>
                          <ul class={classes!("menu-popover", placement)}>
                              {
                                  for current.entries().iter().map(|entry| {
                                      let busy = current
                                          .mutation_for(entry.action)
                                          .is_some_and(|mutation| ctx.tracker().contains(mutation));
                                      html! {
                                          <li key={entry.label()}>
                                              <button
                                                  class={classes!("menu-entry", entry.destructive.then_some("danger"))}
                                                  disabled={busy}
                                                  onclick={select(entry.action)}
                                              >
                                                  { entry.label() }
                                              </button>
                                          </li>
                                      }
                                  })
                              }
                          </ul>
                      </>
                  }
              } else {
                  html! {}
              }
          }
          {
              if let MenuState::Confirming(_) = current.state() {
                  let prompt = ConfirmPrompt::DELETE;
                  html! {
                      <div class="popconfirm">
                          <p>{ prompt.title }</p>
                          <button class="btn" onclick={on_decline}>{ prompt.cancel_text }</button>
                          <button class="btn danger" onclick={on_confirm}>{ prompt.ok_text }</button>
                      </div>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
