mod assistant;
mod dashboard;
mod onboarding;

pub use assistant::{draw_chat_panel, ChatAction, ChatPanel};
pub use dashboard::draw_dashboard_view;
pub use onboarding::{draw_onboarding_view, FormOutcome, OnboardingForm};
