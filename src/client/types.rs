//! Type definitions for the Mealie API.
//!
//! Responses are relayed to MCP clients as raw [`serde_json::Value`] so that
//! fields this crate does not know about survive untouched. The types here
//! cover the parts the adapter itself has to build or read:
//!
//! - request payloads, serialized in Mealie's camelCase
//! - filter structs turned into query strings by [`QueryParams`]
//! - [`RecipeSummary`], the projection returned by the concise recipe tool
//! - [`RecipeUpdate`], the set of fields merged into a fetched recipe before
//!   it is written back

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::MealieError;

/// Ordered query string pairs. `None` values are skipped and lists are
/// comma-joined, which is how Mealie's list filters expect them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Display>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn with_list(mut self, key: &str, values: Option<&[String]>) -> Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.0.push((key.to_string(), values.join(",")));
        }
        self
    }

    /// Adds one `key=value` pair per element.
    pub fn with_repeated(mut self, key: &str, values: &[String]) -> Self {
        self.0
            .extend(values.iter().map(|v| (key.to_string(), v.clone())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Filters for `GET /api/recipes`.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecipeFilter {
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("search", self.search.as_deref())
            .with("orderDirection", Some("desc"))
            .with("page", self.page)
            .with("perPage", self.per_page)
            .with_list("categories", self.categories.as_deref())
            .with_list("tags", self.tags.as_deref())
    }
}

/// Filters for `GET /api/foods`.
#[derive(Debug, Default, Clone)]
pub struct FoodFilter {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl FoodFilter {
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("search", self.search.as_deref())
            .with("orderDirection", Some("desc"))
            .with("page", self.page)
            .with("perPage", self.per_page)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("page", self.page)
            .with("perPage", self.per_page)
    }
}

/// Filters for `GET /api/households/mealplans`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Clone)]
pub struct MealPlanFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl MealPlanFilter {
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("start_date", self.start_date.as_deref())
            .with("end_date", self.end_date.as_deref())
            .with("page", self.page)
            .with("perPage", self.per_page)
    }
}

/// Filters for `GET /api/households/shopping/items`.
#[derive(Debug, Default, Clone)]
pub struct ShoppingItemFilter {
    pub list_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

impl ShoppingItemFilter {
    pub fn to_query(&self) -> QueryParams {
        let query_filter = self
            .list_id
            .as_deref()
            .map(|id| format!("shoppingListId=\"{id}\""));
        QueryParams::new()
            .with("queryFilter", query_filter)
            .with("page", self.page)
            .with("perPage", self.per_page)
            .with("orderBy", self.order_by.as_deref())
            .with("orderDirection", self.order_direction.as_deref())
    }
}

/// Meal slot of a meal plan entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Side,
    Snack,
    Drink,
    Dessert,
}

const ENTRY_TYPES: &str = "breakfast, lunch, dinner, side, snack, drink, dessert";

impl FromStr for EntryType {
    type Err = MealieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.trim().to_ascii_lowercase())).map_err(|_| {
            MealieError::invalid_argument(format!(
                "Unknown entry type '{s}'; expected one of {ENTRY_TYPES}"
            ))
        })
    }
}

/// Body of `POST /api/households/mealplans`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub date: String,
    pub entry_type: EntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

/// Body of `POST /api/households/shopping/lists`.
#[derive(Debug, Clone, Serialize)]
pub struct NewShoppingList {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /api/households/shopping/lists/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A shopping list item as sent to Mealie. The same shape serves creation,
/// single updates and the bulk endpoints; unset fields are left out.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl ShoppingListItemPayload {
    /// True when no field besides the identifiers is set.
    pub fn has_no_changes(&self) -> bool {
        self.display.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.note.is_none()
            && self.food_id.is_none()
            && self.checked.is_none()
            && self.position.is_none()
    }
}

/// The handful of recipe fields worth showing when planning meals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_servings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_yield_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipe_ingredient: Vec<IngredientSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_made: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields to overwrite on an existing recipe. Ingredients and instructions
/// are always replaced; everything else only when set.
#[derive(Debug, Default, Clone)]
pub struct RecipeUpdate {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub tools: Option<Vec<String>>,
    pub recipe_servings: Option<f64>,
    pub recipe_yield: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub extras: Option<Map<String, Value>>,
    pub nutrition: Option<BTreeMap<String, String>>,
    pub settings: Option<BTreeMap<String, bool>>,
    pub org_url: Option<String>,
}

impl RecipeUpdate {
    /// Writes the update into a recipe object fetched from Mealie. Fields not
    /// covered by the update are left as they were.
    pub fn apply_to(self, recipe: &mut Map<String, Value>) {
        let ingredients = self
            .ingredients
            .into_iter()
            .map(|note| json!({ "note": note, "isFood": true, "disableAmount": false }))
            .collect();
        recipe.insert("recipeIngredient".into(), Value::Array(ingredients));

        let instructions = self
            .instructions
            .into_iter()
            .map(|text| json!({ "text": text, "ingredientReferences": [] }))
            .collect();
        recipe.insert("recipeInstructions".into(), Value::Array(instructions));

        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                recipe.insert(key.to_string(), value);
            }
        };
        set("name", self.name.map(Value::String));
        set("description", self.description.map(Value::String));
        set("tags", self.tags.map(slug_refs));
        set("recipeCategory", self.categories.map(slug_refs));
        set("tools", self.tools.map(slug_refs));
        set("recipeServings", self.recipe_servings.map(|s| json!(s)));
        set("recipeYield", self.recipe_yield.map(Value::String));
        set("prepTime", self.prep_time.map(Value::String));
        set("cookTime", self.cook_time.map(Value::String));
        set("totalTime", self.total_time.map(Value::String));
        set("extras", self.extras.map(Value::Object));
        set("nutrition", self.nutrition.map(|n| json!(n)));
        set("orgURL", self.org_url.map(Value::String));

        if let Some(settings) = self.settings {
            let entry = recipe
                .entry("settings")
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(current) = entry {
                for (key, flag) in settings {
                    current.insert(key, Value::Bool(flag));
                }
            }
        }
    }
}

/// Tags, categories and tools are referenced by slug.
fn slug_refs(slugs: Vec<String>) -> Value {
    Value::Array(
        slugs
            .into_iter()
            .map(|slug| json!({ "name": slug, "slug": slug }))
            .collect(),
    )
}
