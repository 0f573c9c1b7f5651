use yew::{
  Html,
  function_component,
  html
};

const COMMUNITY_URL: &str =
  "https://1o24bbs.com/c/bulletjournal/108";
const PRIVACY_URL: &str =
  "https://bulletjournal.us/public/privacy";
const TERMS_URL: &str =
  "https://bulletjournal.us/public/tos";

#[function_component(AppFooter)]
pub fn app_footer() -> Html {
  html! {
      <footer class="app-footer">
          <span>
              { "Bullet Journal ©2020 Powered by " }
              <a href={COMMUNITY_URL} target="_blank" rel="noopener noreferrer">{ "1024 BBS" }</a>
          </span>
          <span class="footer-links">
              <a href={PRIVACY_URL} target="_blank" rel="noopener noreferrer">{ "Privacy Policy" }</a>
              <a href={TERMS_URL} target="_blank" rel="noopener noreferrer">{ "Terms of Service" }</a>
          </span>
      </footer>
  }
}
