//! Shared data shapes: the user profile, the generated weekly plan, and chat messages.
//!
//! Field names on the wire follow the camelCase names the generator is asked to produce.

mod chat;
mod plan;
mod profile;

pub use chat::{ChatMessage, Role, Turn};
pub use plan::{DailyPlan, DayStatus, Intensity, Macros, Meal, Meals, WeeklyPlan, Workout};
pub use profile::{ActivityLevel, Gender, Goal, UserProfile};
