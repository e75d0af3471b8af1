use crate::model::UserProfile;

pub const PLAN_SYSTEM_INSTRUCTION: &str = "You are FitToon, a world-class, high-energy animated fitness coach. You love emojis and bright descriptions.";

/// Build the plan request for a profile. Every profile field is embedded verbatim.
pub fn build_plan_prompt(profile: &UserProfile) -> String {
    let restrictions = if profile.dietary_restrictions.trim().is_empty() {
        "None"
    } else {
        profile.dietary_restrictions.as_str()
    };

    format!(
        "Create a fun, energetic, and highly personalized 7-day fitness and diet plan for the following user:\n\
         Name: {name}\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Height: {height}cm\n\
         Weight: {weight}kg\n\
         Goal: {goal}\n\
         Activity Level: {activity}\n\
         Dietary Restrictions: {restrictions}\n\
         \n\
         The tone should be encouraging, like a cartoon superhero coach.\n\
         Return exactly 7 days in calendar order, Monday first. Every day needs breakfast, lunch and dinner; a snack is optional. Rest days have an empty workouts list.\n\
         Provide the response in strict JSON format matching the schema.\n\
         Translate all content to Chinese (Simplified).",
        name = profile.name,
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        goal = profile.goal,
        activity = profile.activity_level,
    )
}
