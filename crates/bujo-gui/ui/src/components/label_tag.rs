use bujo_core::summary::LabelTag;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct LabelTagViewProps {
  pub tag: LabelTag
}

#[function_component(LabelTagView)]
pub fn label_tag_view(
  props: &LabelTagViewProps
) -> Html {
  let tag = &props.tag;
  html! {
      <span class="badge label-tag" style={format!("background-color:{};", tag.color)}>
          <span class="glyph" title={tag.glyph.name.to_string()}>{ tag.glyph.symbol.to_string() }</span>
          { &tag.value }
      </span>
  }
}
