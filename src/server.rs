use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::{json, Value};

use crate::client::types::*;
use crate::client::MealieClient;
use crate::config::MealieConfig;
use crate::error::MealieError;
use crate::prompts;

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRecipesParams {
    /// Filters recipes by name or description.
    #[serde(default)]
    pub search: Option<String>,
    /// Page number, starting at 1.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Category slugs to filter by.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// Tag slugs to filter by.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RecipeSlugParams {
    /// The recipe's slug, as found in recipe URLs or get_recipes results.
    pub slug: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub name: String,
    /// Ingredient lines including quantities and units.
    pub ingredients: Vec<String>,
    /// Preparation steps in order.
    pub instructions: Vec<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub slug: String,
    /// Replaces the recipe's ingredient lines.
    pub ingredients: Vec<String>,
    /// Replaces the recipe's steps.
    pub instructions: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Tag slugs, e.g. ["family-favorite"].
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Category slugs, e.g. ["dinner", "italian"].
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_servings: Option<f64>,
    /// Yield as text, e.g. "6 servings".
    #[serde(default)]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
    /// Free-form metadata stored with the recipe.
    #[serde(default)]
    pub extras: Option<BTreeMap<String, Value>>,
    /// Nutrition values such as calories or proteinContent.
    #[serde(default)]
    pub nutrition: Option<BTreeMap<String, String>>,
    /// Tool slugs required by the recipe.
    #[serde(default)]
    pub tools: Option<Vec<String>>,
    /// Display settings such as public or showNutrition.
    #[serde(default)]
    pub settings: Option<BTreeMap<String, bool>>,
    /// Original source URL.
    #[serde(default)]
    pub org_url: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ImportRecipeParams {
    pub url: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetFoodsParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetMealPlansParams {
    /// YYYY-MM-DD
    #[serde(default)]
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateMealPlanParams {
    /// YYYY-MM-DD
    pub date: String,
    /// UUID of the recipe to plan.
    #[serde(default)]
    pub recipe_id: Option<String>,
    /// Title for entries without a recipe.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text note shown on the entry.
    #[serde(default)]
    pub text: Option<String>,
    /// breakfast, lunch, dinner, side, snack, drink or dessert. Defaults to breakfast.
    #[serde(default)]
    pub entry_type: Option<String>,
}

impl TryFrom<CreateMealPlanParams> for MealPlanEntry {
    type Error = MealieError;

    fn try_from(params: CreateMealPlanParams) -> Result<Self, Self::Error> {
        let entry_type = match params.entry_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => EntryType::default(),
        };
        Ok(MealPlanEntry {
            date: params.date,
            entry_type,
            title: params.title,
            text: params.text,
            recipe_id: params.recipe_id,
        })
    }
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateMealPlanBulkParams {
    pub entries: Vec<CreateMealPlanParams>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ShoppingListIdParams {
    /// From create_shopping_list or get_shopping_lists.
    pub list_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingListParams {
    pub name: String,
    /// e.g. "Weekly grocery trip".
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingListParams {
    pub list_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetShoppingItemsParams {
    /// Only items of this shopping list.
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    /// e.g. "position" or "display".
    #[serde(default)]
    pub order_by: Option<String>,
    /// "asc" or "desc".
    #[serde(default)]
    pub order_direction: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ShoppingItemIdParams {
    pub item_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingItemParams {
    pub list_id: String,
    pub item_name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    /// e.g. "cup", "tablespoon", "oz".
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Reference to a food in the Mealie database.
    #[serde(default)]
    pub food_id: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingItemParams {
    pub item_id: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BulkShoppingItem {
    /// Item name shown on the list.
    pub display: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, rename = "foodId")]
    pub food_id: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BulkCreateShoppingItemsParams {
    pub list_id: String,
    pub items: Vec<BulkShoppingItem>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BulkShoppingItemUpdate {
    pub id: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BulkUpdateShoppingItemsParams {
    pub items: Vec<BulkShoppingItemUpdate>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BulkDeleteShoppingItemsParams {
    pub item_ids: Vec<String>,
}

/// Turns a client result into the tool reply.
///
/// Remote and validation failures become tool-level errors (`isError: true`)
/// whose text is a JSON object with the summary, the error kind and, for API
/// errors, the HTTP status Mealie returned. They are never raised as
/// protocol errors.
pub fn tool_reply(
    summary: &str,
    result: Result<Value, MealieError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(e) => {
            tracing::error!("{}: {}", summary, e);
            Ok(CallToolResult::error(vec![Content::text(
                error_body(summary, &e).to_string(),
            )]))
        }
    }
}

fn error_body(summary: &str, error: &MealieError) -> Value {
    let mut body = json!({
        "success": false,
        "error": summary,
        "kind": error.kind(),
        "details": error.to_string(),
    });
    if let Some(status) = error.status() {
        body["status"] = json!(status);
    }
    body
}

const INSTRUCTIONS: &str = "This server exposes a Mealie recipe manager. \
    Tools cover recipe search, retrieval, creation, update and URL import; foods; \
    the current user and group; meal plans; and shopping lists with their items. \
    Recipes are addressed by slug, shopping lists and items by ID. \
    The weekly_meal_plan prompt walks through planning a week of meals.";

#[derive(Clone)]
pub struct MealieMcpServer {
    client: Arc<MealieClient>,
    tool_router: ToolRouter<MealieMcpServer>,
}

#[tool_router]
impl MealieMcpServer {
    pub fn new(client: Arc<MealieClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &MealieConfig) -> Result<Self, MealieError> {
        Ok(Self::new(Arc::new(MealieClient::from_config(config)?)))
    }

    pub fn client(&self) -> &MealieClient {
        &self.client
    }

    /// Probes the Mealie instance with the configured credentials.
    pub async fn check_connection(&self) -> Result<(), MealieError> {
        tracing::debug!(
            "Testing connection to {} with key {}",
            self.client.base_url(),
            self.client.api_key_preview()
        );
        let about = self.client.about().await?;
        let version = about
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!("Connected to Mealie {} (version {})", self.client.base_url(), version);
        Ok(())
    }

    // Recipe tools
    #[tool(description = "Provides a paginated list of recipes with optional filtering by search text, categories and tags. Returns recipe summaries with ID, slug, name, description and image information.")]
    pub async fn get_recipes(
        &self,
        Parameters(params): Parameters<GetRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = RecipeFilter {
            search: params.search,
            page: params.page,
            per_page: params.per_page,
            categories: params.categories,
            tags: params.tags,
        };
        tool_reply("Failed to fetch recipes", self.client.get_recipes(&filter).await)
    }

    #[tool(description = "Retrieve a recipe by its slug with full details: ingredients, instructions, nutrition, notes and metadata. Use when updating or displaying the whole recipe.")]
    pub async fn get_recipe_detailed(
        &self,
        Parameters(params): Parameters<RecipeSlugParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to fetch recipe '{}'", params.slug),
            self.client.get_recipe(&params.slug).await,
        )
    }

    #[tool(description = "Retrieve a concise summary of a recipe by its slug: name, servings, yield, total time, rating, ingredients and when it was last made. Use this when meal planning.")]
    pub async fn get_recipe_concise(
        &self,
        Parameters(params): Parameters<RecipeSlugParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .client
            .get_recipe_summary(&params.slug)
            .await
            .and_then(|summary| Ok(serde_json::to_value(summary)?));
        tool_reply(&format!("Failed to fetch recipe '{}'", params.slug), result)
    }

    #[tool(description = "Create a new recipe from a name, a list of ingredient lines and a list of instruction steps. Returns the stored recipe.")]
    pub async fn create_recipe(
        &self,
        Parameters(params): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to create recipe '{}'", params.name);
        let result = match self.client.create_recipe(&params.name).await {
            Ok(slug) => {
                let update = RecipeUpdate {
                    ingredients: params.ingredients,
                    instructions: params.instructions,
                    ..Default::default()
                };
                self.client.apply_recipe_update(&slug, update).await
            }
            Err(e) => Err(e),
        };
        tool_reply(&summary, result)
    }

    #[tool(description = "Update an existing recipe. Ingredients and instructions are replaced; name, tags, categories, description, servings, yield, times, extras, nutrition, tools, settings and source URL are changed only when given.")]
    pub async fn update_recipe(
        &self,
        Parameters(params): Parameters<UpdateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let slug = params.slug;
        let update = RecipeUpdate {
            ingredients: params.ingredients,
            instructions: params.instructions,
            name: params.name,
            description: params.description,
            tags: params.tags,
            categories: params.categories,
            tools: params.tools,
            recipe_servings: params.recipe_servings,
            recipe_yield: params.recipe_yield,
            prep_time: params.prep_time,
            cook_time: params.cook_time,
            total_time: params.total_time,
            extras: params.extras.map(|extras| extras.into_iter().collect()),
            nutrition: params.nutrition,
            settings: params.settings,
            org_url: params.org_url,
        };
        tool_reply(
            &format!("Failed to update recipe '{slug}'"),
            self.client.apply_recipe_update(&slug, update).await,
        )
    }

    #[tool(description = "Import a recipe from a web page URL using Mealie's built-in scraper. Returns the imported recipe.")]
    pub async fn import_recipe_from_url(
        &self,
        Parameters(params): Parameters<ImportRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to import recipe from '{}'", params.url),
            self.client.import_recipe_from_url(&params.url).await,
        )
    }

    // Food, user and group tools
    #[tool(description = "Provides a paginated list of foods that can be used in recipes, optionally filtered by name.")]
    pub async fn get_foods(
        &self,
        Parameters(params): Parameters<GetFoodsParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = FoodFilter {
            search: params.search,
            page: params.page,
            per_page: params.per_page,
        };
        tool_reply("Failed to fetch foods", self.client.get_foods(&filter).await)
    }

    #[tool(description = "Retrieve the profile of the user owning the API key: id, username, email, household and permissions.")]
    pub async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        tool_reply(
            "Failed to fetch current user",
            self.client.get_current_user().await,
        )
    }

    #[tool(description = "Retrieve the group of the current user: id, name, slug and preferences.")]
    pub async fn get_current_group(&self) -> Result<CallToolResult, McpError> {
        tool_reply(
            "Failed to fetch current group",
            self.client.get_current_group().await,
        )
    }

    // Meal plan tools
    #[tool(description = "Get meal plans for the current household, optionally between start_date and end_date (YYYY-MM-DD), with pagination.")]
    pub async fn get_all_mealplans(
        &self,
        Parameters(params): Parameters<GetMealPlansParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = MealPlanFilter {
            start_date: params.start_date,
            end_date: params.end_date,
            page: params.page,
            per_page: params.per_page,
        };
        tool_reply("Failed to fetch meal plans", self.client.get_mealplans(&filter).await)
    }

    #[tool(description = "Create a meal plan entry for a date (YYYY-MM-DD), optionally linked to a recipe_id, with an optional title and text. entry_type is breakfast, lunch, dinner, side, snack, drink or dessert.")]
    pub async fn create_mealplan(
        &self,
        Parameters(params): Parameters<CreateMealPlanParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to create meal plan entry for {}", params.date);
        let result = match MealPlanEntry::try_from(params) {
            Ok(entry) => self.client.create_mealplan(&entry).await,
            Err(e) => Err(e),
        };
        tool_reply(&summary, result)
    }

    #[tool(description = "Create several meal plan entries at once. Entries are created in order; the reply lists every created entry and every entry that failed.")]
    pub async fn create_mealplan_bulk(
        &self,
        Parameters(params): Parameters<CreateMealPlanBulkParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.entries.is_empty() {
            return tool_reply(
                "Failed to create meal plan entries",
                Err(MealieError::invalid_argument("entries must be a non-empty list")),
            );
        }

        let total = params.entries.len();
        let mut created = Vec::new();
        let mut failed = Vec::new();
        for (index, entry) in params.entries.into_iter().enumerate() {
            let date = entry.date.clone();
            let result = match MealPlanEntry::try_from(entry) {
                Ok(entry) => self.client.create_mealplan(&entry).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(value) => created.push(value),
                Err(e) => {
                    tracing::warn!("Meal plan entry {} for {} failed: {}", index, date, e);
                    let mut body = error_body("Failed to create meal plan entry", &e);
                    body["index"] = json!(index);
                    body["date"] = json!(date);
                    failed.push(body);
                }
            }
        }

        let result = json!({
            "success": failed.is_empty(),
            "created": created,
            "failed": failed,
            "message": format!("Created {} of {} meal plan entries", created.len(), total),
        });
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        if created.is_empty() {
            Ok(CallToolResult::error(vec![Content::text(text)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
    }

    #[tool(description = "Get today's meal plan entries.")]
    pub async fn get_todays_mealplan(&self) -> Result<CallToolResult, McpError> {
        tool_reply(
            "Failed to fetch today's meal plan",
            self.client.get_todays_mealplan().await,
        )
    }

    // Shopping list tools
    #[tool(description = "Get all shopping lists with pagination. Returns each list's ID, name and metadata.")]
    pub async fn get_shopping_lists(
        &self,
        Parameters(params): Parameters<PaginationParams>,
    ) -> Result<CallToolResult, McpError> {
        let pagination = Pagination {
            page: params.page,
            per_page: params.per_page,
        };
        tool_reply(
            "Failed to fetch shopping lists",
            self.client.get_shopping_lists(pagination).await,
        )
    }

    #[tool(description = "Get a shopping list with all of its items, quantities, checked status, recipe references and label settings.")]
    pub async fn get_shopping_list(
        &self,
        Parameters(params): Parameters<ShoppingListIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to fetch shopping list '{}'", params.list_id),
            self.client.get_shopping_list(&params.list_id).await,
        )
    }

    #[tool(description = "Create a new shopping list. Returns the list including the ID needed by the item tools.")]
    pub async fn create_shopping_list(
        &self,
        Parameters(params): Parameters<CreateShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to create shopping list '{}'", params.name);
        let list = NewShoppingList {
            name: params.name,
            description: params.description,
        };
        tool_reply(&summary, self.client.create_shopping_list(&list).await)
    }

    #[tool(description = "Rename a shopping list or change its description. At least one of name or description is required.")]
    pub async fn update_shopping_list(
        &self,
        Parameters(params): Parameters<UpdateShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to update shopping list '{}'", params.list_id);
        let update = ShoppingListUpdate {
            id: params.list_id,
            name: params.name,
            description: params.description,
        };
        tool_reply(&summary, self.client.update_shopping_list(&update).await)
    }

    #[tool(description = "List shopping list items, optionally only those of one list, with pagination and ordering.")]
    pub async fn get_all_shopping_list_items(
        &self,
        Parameters(params): Parameters<GetShoppingItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = ShoppingItemFilter {
            list_id: params.list_id,
            page: params.page,
            per_page: params.per_page,
            order_by: params.order_by,
            order_direction: params.order_direction,
        };
        tool_reply(
            "Failed to fetch shopping list items",
            self.client.get_shopping_list_items(&filter).await,
        )
    }

    #[tool(description = "Get one shopping list item: name, quantity, unit, note, checked status and position.")]
    pub async fn get_shopping_list_item(
        &self,
        Parameters(params): Parameters<ShoppingItemIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to fetch shopping list item '{}'", params.item_id),
            self.client.get_shopping_list_item(&params.item_id).await,
        )
    }

    #[tool(description = "Add an item to a shopping list, with optional quantity, unit, note and food reference.")]
    pub async fn create_shopping_list_item(
        &self,
        Parameters(params): Parameters<CreateShoppingItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to create shopping list item '{}'", params.item_name);
        let item = ShoppingListItemPayload {
            shopping_list_id: Some(params.list_id),
            display: Some(params.item_name),
            quantity: params.quantity,
            unit: params.unit,
            note: params.note,
            food_id: params.food_id,
            ..Default::default()
        };
        tool_reply(&summary, self.client.create_shopping_list_item(&item).await)
    }

    #[tool(description = "Update a shopping list item's name, quantity, unit, note, checked status or position. At least one field besides item_id is required.")]
    pub async fn update_shopping_list_item(
        &self,
        Parameters(params): Parameters<UpdateShoppingItemParams>,
    ) -> Result<CallToolResult, McpError> {
        let summary = format!("Failed to update shopping list item '{}'", params.item_id);
        let item = ShoppingListItemPayload {
            id: Some(params.item_id),
            display: params.item_name,
            quantity: params.quantity,
            unit: params.unit,
            note: params.note,
            checked: params.checked,
            position: params.position,
            ..Default::default()
        };
        tool_reply(&summary, self.client.update_shopping_list_item(&item).await)
    }

    #[tool(description = "Toggle the checked status of a shopping list item. Returns the updated item.")]
    pub async fn toggle_shopping_list_item(
        &self,
        Parameters(params): Parameters<ShoppingItemIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to toggle shopping list item '{}'", params.item_id),
            self.client.toggle_shopping_list_item(&params.item_id).await,
        )
    }

    #[tool(description = "Remove an item from its shopping list.")]
    pub async fn delete_shopping_list_item(
        &self,
        Parameters(params): Parameters<ShoppingItemIdParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            &format!("Failed to delete shopping list item '{}'", params.item_id),
            self.client.delete_shopping_list_item(&params.item_id).await,
        )
    }

    #[tool(description = "Add several items to a shopping list in one request. Each item needs a display name and may carry quantity, unit, note and foodId.")]
    pub async fn bulk_create_shopping_list_items(
        &self,
        Parameters(params): Parameters<BulkCreateShoppingItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let items = params
            .items
            .into_iter()
            .map(|item| ShoppingListItemPayload {
                display: Some(item.display),
                quantity: item.quantity,
                unit: item.unit,
                note: item.note,
                food_id: item.food_id,
                ..Default::default()
            })
            .collect();
        tool_reply(
            "Failed to bulk create shopping list items",
            self.client
                .bulk_create_shopping_list_items(&params.list_id, items)
                .await,
        )
    }

    #[tool(description = "Update several shopping list items in one request. Each item needs its id plus the fields to change.")]
    pub async fn bulk_update_shopping_list_items(
        &self,
        Parameters(params): Parameters<BulkUpdateShoppingItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let items: Vec<ShoppingListItemPayload> = params
            .items
            .into_iter()
            .map(|item| ShoppingListItemPayload {
                id: Some(item.id),
                display: item.display,
                quantity: item.quantity,
                unit: item.unit,
                note: item.note,
                checked: item.checked,
                position: item.position,
                ..Default::default()
            })
            .collect();
        tool_reply(
            "Failed to bulk update shopping list items",
            self.client.bulk_update_shopping_list_items(&items).await,
        )
    }

    #[tool(description = "Delete several shopping list items in one request.")]
    pub async fn bulk_delete_shopping_list_items(
        &self,
        Parameters(params): Parameters<BulkDeleteShoppingItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_reply(
            "Failed to bulk delete shopping list items",
            self.client
                .bulk_delete_shopping_list_items(&params.item_ids)
                .await,
        )
    }
}

#[tool_handler]
impl ServerHandler for MealieMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: prompts::catalogue(),
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::render(&request.name, request.arguments.as_ref())
    }
}
