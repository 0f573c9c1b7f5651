use bujo_core::refresh::{
  AccountRefresh,
  create_affordance,
  display_username
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_context,
  use_state
};

use crate::account::StoreAction;
use crate::app::{
  AccountContext,
  ui_debug
};

/// Account header: create button, refresh, notification drawer and the
/// user's avatar.
#[function_component(MyselfBar)]
pub fn myself_bar() -> Html {
  let drawer_open = use_state(|| false);
  let Some(ctx) =
    use_context::<AccountContext>()
  else {
    return html! {};
  };

  let store = ctx.store.clone();
  let snapshot = &store.snapshot;
  let affordance = create_affordance(
    &snapshot.owned_projects,
    &snapshot.shared_projects
  );
  let count = store.notification_count();

  let on_refresh = {
    let dispatcher = ctx.dispatcher.clone();
    Callback::from(move |_: MouseEvent| {
      AccountRefresh::new(dispatcher.clone())
        .on_manual_refresh();
    })
  };

  let on_create = Callback::from(
    move |_: MouseEvent| {
      ui_debug(
        "myself.create",
        affordance.label()
      );
    }
  );

  let on_toggle_drawer = {
    let drawer_open = drawer_open.clone();
    Callback::from(move |_: MouseEvent| {
      drawer_open.set(!*drawer_open);
    })
  };

  let dismiss = |id: u64| {
    let store = store.clone();
    Callback::from(move |_: MouseEvent| {
      store.dispatch(
        StoreAction::DismissAlert(id)
      );
    })
  };

  let username =
    display_username(&snapshot.myself.username)
      .to_string();

  html! {
      <header class="myself-bar">
          <button class="btn primary" onclick={on_create}>{ affordance.label() }</button>
          <button class="btn" title="Refresh" onclick={on_refresh}>{ "⟳" }</button>
          <button class="btn notifications" title="Notifications" onclick={on_toggle_drawer}>
              { format!("🔔 {count}") }
          </button>
          {
              match &snapshot.myself.avatar {
                  | Some(src) => html! {
                      <img class="avatar" src={src.clone()} title={username.clone()} alt={username.clone()} />
                  },
                  | None => html! { <span class="username">{ username.clone() }</span> }
              }
          }
          {
              if *drawer_open {
                  html! {
                      <ul class="notification-drawer">
                          {
                              for snapshot.notifications.iter().map(|notification| html! {
                                  <li key={notification.id}>
                                      <div class="title">{ notification.title.clone() }</div>
                                      {
                                          match &notification.content {
                                              | Some(content) => html! { <div class="content">{ content.clone() }</div> },
                                              | None => html! {}
                                          }
                                      }
                                  </li>
                              })
                          }
                          {
                              for store.alerts.iter().map(|alert| html! {
                                  <li key={format!("alert-{}", alert.id)} class="alert">
                                      <div class="title">{ alert.title.clone() }</div>
                                      {
                                          match &alert.content {
                                              | Some(content) => html! { <div class="content">{ content.clone() }</div> },
                                              | None => html! {}
                                          }
                                      }
                                      <button class="btn" onclick={dismiss(alert.id)}>{ "Dismiss" }</button>
                                  </li>
                              })
                          }
                      </ul>
                  }
              } else {
                  html! {}
              }
          }
      </header>
  }
}
