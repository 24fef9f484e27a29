//! MCP prompts offered alongside the tools.

use rmcp::{
    model::{GetPromptResult, Prompt, PromptArgument, PromptMessage, PromptMessageRole},
    ErrorData as McpError,
};
use serde_json::{Map, Value};

pub const WEEKLY_MEAL_PLAN: &str = "weekly_meal_plan";

const WEEKLY_MEAL_PLAN_CONTEXT: &str = r#"<context>
You have access to a Mealie recipe database. You can search for recipes and create meal plans that are saved directly to Mealie.

## Tool Usage Guidelines

### Recipe Tools
- get_recipes: Search and list recipes (always set per_page=50; omit empty values)
- get_recipe_concise: Get basic recipe details (use by default)
- get_recipe_detailed: Get full recipe information (only when the user asks for it)

### Meal Plan Tools
- get_all_mealplans: View existing meal plans
- create_mealplan_bulk: Add several entries at once (each needs a date in YYYY-MM-DD format, a recipe_id when available, and an entry_type)
- get_todays_mealplan: View today's planned meals
</context>

<instructions>
# Meal Planning Guidelines
- Include breakfast, lunch, and dinner for all 7 days
- Vary proteins, grains, and vegetables across the week
- Prefer seasonal ingredients and keep nutrition balanced over the week
- Use recipes from the Mealie database when available
- Plan for leftovers where it makes sense and say how they are reused

# User Interaction
- Present the meal plan as a table
- Ask for feedback about swaps, leftovers, and dietary needs
- Include the recipe ID or slug when suggesting a recipe
- Before saving to Mealie, show the complete plan as a concise summary and wait for confirmation
- After confirmation, save the plan without repeating the summary
</instructions>"#;

const WEEKLY_MEAL_PLAN_REQUEST: &str = "I need help creating a balanced meal plan for the next week that includes breakfast, lunch, and dinner.";

/// All prompts this server exposes.
pub fn catalogue() -> Vec<Prompt> {
    vec![Prompt::new(
        WEEKLY_MEAL_PLAN,
        Some("Generates a weekly meal plan template"),
        Some(vec![PromptArgument {
            name: "preferences".to_string(),
            description: Some("Additional dietary preferences or constraints".to_string()),
            required: Some(false),
        }]),
    )]
}

/// Renders the prompt `name` with the caller's arguments.
pub fn render(
    name: &str,
    arguments: Option<&Map<String, Value>>,
) -> Result<GetPromptResult, McpError> {
    match name {
        WEEKLY_MEAL_PLAN => {
            let preferences = arguments
                .and_then(|args| args.get("preferences"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|p| !p.is_empty());
            Ok(GetPromptResult {
                description: Some("Weekly meal plan".to_string()),
                messages: weekly_meal_plan(preferences),
            })
        }
        other => Err(McpError::invalid_params(
            format!("Unknown prompt: {other}"),
            None,
        )),
    }
}

fn weekly_meal_plan(preferences: Option<&str>) -> Vec<PromptMessage> {
    let request = match preferences {
        Some(preferences) => {
            format!("{WEEKLY_MEAL_PLAN_REQUEST} My preferences are: {preferences}")
        }
        None => WEEKLY_MEAL_PLAN_REQUEST.to_string(),
    };

    vec![
        PromptMessage::new_text(PromptMessageRole::Assistant, WEEKLY_MEAL_PLAN_CONTEXT),
        PromptMessage::new_text(PromptMessageRole::User, request),
    ]
}
