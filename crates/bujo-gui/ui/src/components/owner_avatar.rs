use bujo_core::summary::{
  AvatarBadge,
  AvatarSource
};
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct AvatarBadgeViewProps {
  pub badge: AvatarBadge
}

#[function_component(AvatarBadgeView)]
pub fn avatar_badge_view(
  props: &AvatarBadgeViewProps
) -> Html {
  let tooltip = props.badge.tooltip.clone();
  match &props.badge.source {
    | AvatarSource::Url(src) => html! {
        <img class="avatar" src={src.clone()} title={tooltip.clone()} alt={tooltip} />
    },
    | AvatarSource::Placeholder(glyph) => html! {
        <span class="avatar placeholder" title={tooltip}>{ glyph.symbol.to_string() }</span>
    }
  }
}
