//! Declarative output contract sent with every plan request.
//!
//! Kept independent of the `model` types: bump `PLAN_SCHEMA_VERSION` whenever the
//! shape requested from the generator changes.

use crate::provider::Schema;

pub const PLAN_SCHEMA_VERSION: u32 = 1;

pub fn weekly_plan_schema() -> Schema {
    Schema::object()
        .required_property(
            "summary",
            Schema::string().describe("One-paragraph overview of the week"),
        )
        .required_property(
            "days",
            Schema::array(daily_plan_schema()).describe("Exactly 7 days, Monday first"),
        )
        .property("createdAt", Schema::string())
}

fn daily_plan_schema() -> Schema {
    Schema::object()
        .required_property("day", Schema::string())
        .required_property("focus", Schema::string())
        .required_property("workouts", Schema::array(workout_schema()))
        .required_property(
            "meals",
            Schema::object()
                .required_property("breakfast", meal_schema())
                .required_property("lunch", meal_schema())
                .required_property("dinner", meal_schema())
                .property("snack", meal_schema()),
        )
        .property("status", Schema::enumeration(&["pending", "completed"]))
}

fn workout_schema() -> Schema {
    Schema::object()
        .required_property("name", Schema::string())
        .required_property("duration", Schema::string())
        .required_property("intensity", Schema::enumeration(&["Low", "Medium", "High"]))
        .required_property("exercises", Schema::array(Schema::string()))
}

fn meal_schema() -> Schema {
    Schema::object()
        .required_property("name", Schema::string())
        .required_property("calories", Schema::number())
        .required_property(
            "macros",
            Schema::object()
                .required_property("protein", Schema::string())
                .required_property("carbs", Schema::string())
                .required_property("fats", Schema::string()),
        )
        .required_property("description", Schema::string())
}
