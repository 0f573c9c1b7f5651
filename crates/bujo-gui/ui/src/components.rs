mod app_footer;
mod label_tag;
mod myself_bar;
mod owner_avatar;
mod project_task_list;
mod task_action_menu;
mod task_detail;
mod task_item;

pub use app_footer::AppFooter;
pub use label_tag::LabelTagView;
pub use myself_bar::MyselfBar;
pub use owner_avatar::AvatarBadgeView;
pub use project_task_list::ProjectTaskList;
pub use task_action_menu::TaskActionMenu;
pub use task_detail::TaskDetail;
pub use task_item::TaskItem;
