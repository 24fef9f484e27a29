use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::client::{auth::ApiKey, types::*};
use crate::config::MealieConfig;
use crate::error::{MealieError, Result};

/// HTTP client for one Mealie instance.
///
/// Holds no mutable state: the underlying `reqwest::Client` is already a
/// shared connection pool, so a single `MealieClient` can serve any number of
/// concurrent tool calls behind an `Arc`.
pub struct MealieClient {
    base_url: String,
    client: Client,
    auth: ApiKey,
}

impl MealieClient {
    pub fn new(base_url: &Url, auth: ApiKey, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MealieError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    pub fn from_config(config: &MealieConfig) -> Result<Self> {
        Self::new(&config.base_url, config.api_key.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key_preview(&self) -> String {
        self.auth.preview()
    }

    // Request plumbing

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Making {} request to {}", method, url);
        if !query.is_empty() {
            tracing::debug!("Request parameters: {:?}", query.pairs());
        }

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", self.auth.bearer_header());
        if !query.is_empty() {
            builder = builder.query(query.pairs());
        }
        if let Some(body) = &body {
            tracing::debug!("Request payload: {}", body);
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&method, path, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&method, path, e))?;

        if !status.is_success() {
            let detail = error_detail(&text, status);
            tracing::error!(
                "API error for {} {}: {} (status {})",
                method,
                path,
                detail,
                status
            );
            return Err(MealieError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        tracing::debug!("Request successful: {}", status);
        Ok(parse_body(&text))
    }

    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, &QueryParams::new(), Some(body))
            .await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, &QueryParams::new(), Some(body))
            .await
    }

    async fn delete(&self, path: &str, query: &QueryParams) -> Result<Value> {
        self.request(Method::DELETE, path, query, None).await
    }

    /// Lightweight probe used at startup to confirm the instance is reachable.
    pub async fn about(&self) -> Result<Value> {
        self.get("/api/app/about", &QueryParams::new()).await
    }

    // Recipe operations
    pub async fn get_recipes(&self, filter: &RecipeFilter) -> Result<Value> {
        tracing::info!("Retrieving recipes");
        self.get("/api/recipes", &filter.to_query()).await
    }

    pub async fn get_recipe(&self, slug: &str) -> Result<Value> {
        let slug = require("Recipe slug", slug)?;
        tracing::info!("Retrieving recipe {}", slug);
        self.get(&format!("/api/recipes/{}", segment(slug)), &QueryParams::new())
            .await
    }

    pub async fn get_recipe_summary(&self, slug: &str) -> Result<RecipeSummary> {
        let recipe = self.get_recipe(slug).await?;
        Ok(serde_json::from_value(recipe)?)
    }

    /// Creates an empty recipe and returns its slug.
    pub async fn create_recipe(&self, name: &str) -> Result<String> {
        let name = require("Recipe name", name)?;
        tracing::info!("Creating recipe '{}'", name);
        let created = self.post("/api/recipes", &json!({ "name": name })).await?;
        Ok(serde_json::from_value(created)?)
    }

    pub async fn update_recipe(&self, slug: &str, recipe: &Value) -> Result<Value> {
        let slug = require("Recipe slug", slug)?;
        match recipe.as_object() {
            Some(fields) if !fields.is_empty() => {}
            _ => return Err(MealieError::invalid_argument("Recipe data cannot be empty")),
        }
        tracing::info!("Updating recipe {}", slug);
        self.put(&format!("/api/recipes/{}", segment(slug)), recipe)
            .await
    }

    /// Fetches the recipe, merges `update` into it and writes it back.
    pub async fn apply_recipe_update(&self, slug: &str, update: RecipeUpdate) -> Result<Value> {
        let mut recipe = self.get_recipe(slug).await?;
        let fields = recipe.as_object_mut().ok_or_else(|| {
            MealieError::Decode(serde::de::Error::custom(format!(
                "recipe '{slug}' is not a JSON object"
            )))
        })?;
        update.apply_to(fields);
        self.update_recipe(slug, &recipe).await
    }

    /// Runs Mealie's scraper on `url` and returns the imported recipe.
    pub async fn import_recipe_from_url(&self, url: &str) -> Result<Value> {
        let url = require("URL", url)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MealieError::invalid_argument(
                "Invalid URL format - must start with http:// or https://",
            ));
        }
        tracing::info!("Importing recipe from {}", url);
        let created = self
            .post("/api/recipes/create/url", &json!({ "url": url }))
            .await?;
        let slug: String = serde_json::from_value(created)?;
        self.get_recipe(&slug).await
    }

    // Food operations
    pub async fn get_foods(&self, filter: &FoodFilter) -> Result<Value> {
        tracing::info!("Retrieving foods");
        self.get("/api/foods", &filter.to_query()).await
    }

    // User and group
    pub async fn get_current_user(&self) -> Result<Value> {
        self.get("/api/users/self", &QueryParams::new()).await
    }

    pub async fn get_current_group(&self) -> Result<Value> {
        self.get("/api/groups/self", &QueryParams::new()).await
    }

    // Meal planning operations
    pub async fn get_mealplans(&self, filter: &MealPlanFilter) -> Result<Value> {
        if let Some(start) = &filter.start_date {
            validate_date("start_date", start)?;
        }
        if let Some(end) = &filter.end_date {
            validate_date("end_date", end)?;
        }
        tracing::info!("Retrieving meal plans");
        self.get("/api/households/mealplans", &filter.to_query())
            .await
    }

    pub async fn create_mealplan(&self, entry: &MealPlanEntry) -> Result<Value> {
        validate_date("date", &entry.date)?;
        tracing::info!("Creating meal plan entry for {}", entry.date);
        self.post("/api/households/mealplans", entry).await
    }

    pub async fn get_todays_mealplan(&self) -> Result<Value> {
        self.get("/api/households/mealplans/today", &QueryParams::new())
            .await
    }

    // Shopping list operations
    pub async fn get_shopping_lists(&self, pagination: Pagination) -> Result<Value> {
        tracing::info!("Retrieving shopping lists");
        self.get("/api/households/shopping/lists", &pagination.to_query())
            .await
    }

    pub async fn get_shopping_list(&self, list_id: &str) -> Result<Value> {
        let list_id = require("Shopping list ID", list_id)?;
        self.get(
            &format!("/api/households/shopping/lists/{}", segment(list_id)),
            &QueryParams::new(),
        )
        .await
    }

    pub async fn create_shopping_list(&self, list: &NewShoppingList) -> Result<Value> {
        require("Shopping list name", &list.name)?;
        tracing::info!("Creating shopping list '{}'", list.name);
        self.post("/api/households/shopping/lists", list).await
    }

    pub async fn update_shopping_list(&self, update: &ShoppingListUpdate) -> Result<Value> {
        let list_id = require("Shopping list ID", &update.id)?;
        if update.name.is_none() && update.description.is_none() {
            return Err(MealieError::invalid_argument(
                "At least one of name or description must be provided",
            ));
        }
        tracing::info!("Updating shopping list {}", list_id);
        self.put(
            &format!("/api/households/shopping/lists/{}", segment(list_id)),
            update,
        )
        .await
    }

    pub async fn get_shopping_list_items(&self, filter: &ShoppingItemFilter) -> Result<Value> {
        if let Some(list_id) = &filter.list_id {
            if list_id.contains('"') {
                return Err(MealieError::invalid_argument(format!(
                    "Shopping list ID cannot contain quotes: '{list_id}'"
                )));
            }
        }
        tracing::info!("Retrieving shopping list items");
        self.get("/api/households/shopping/items", &filter.to_query())
            .await
    }

    pub async fn get_shopping_list_item(&self, item_id: &str) -> Result<Value> {
        let item_id = require("Shopping list item ID", item_id)?;
        self.get(&item_path(item_id), &QueryParams::new()).await
    }

    pub async fn create_shopping_list_item(&self, item: &ShoppingListItemPayload) -> Result<Value> {
        require("Shopping list ID", item.shopping_list_id.as_deref().unwrap_or_default())?;
        require("Item name", item.display.as_deref().unwrap_or_default())?;
        tracing::info!("Creating shopping list item");
        self.post("/api/households/shopping/items", item).await
    }

    pub async fn update_shopping_list_item(&self, item: &ShoppingListItemPayload) -> Result<Value> {
        let item_id = require("Shopping list item ID", item.id.as_deref().unwrap_or_default())?;
        if item.has_no_changes() {
            return Err(MealieError::invalid_argument(
                "At least one parameter must be provided to update",
            ));
        }
        tracing::info!("Updating shopping list item {}", item_id);
        self.put(&item_path(item_id), item).await
    }

    /// Flips the `checked` flag of an item, keeping the rest of it intact.
    pub async fn toggle_shopping_list_item(&self, item_id: &str) -> Result<Value> {
        let mut item = self.get_shopping_list_item(item_id).await?;
        let fields = item.as_object_mut().ok_or_else(|| {
            MealieError::Decode(serde::de::Error::custom(format!(
                "shopping list item '{item_id}' is not a JSON object"
            )))
        })?;
        let checked = fields
            .get("checked")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        fields.insert("checked".into(), Value::Bool(!checked));
        tracing::info!("Toggling shopping list item {} to checked={}", item_id, !checked);
        self.put(&item_path(item_id.trim()), &item).await
    }

    pub async fn delete_shopping_list_item(&self, item_id: &str) -> Result<Value> {
        let item_id = require("Shopping list item ID", item_id)?;
        tracing::info!("Deleting shopping list item {}", item_id);
        self.delete(&item_path(item_id), &QueryParams::new()).await
    }

    pub async fn bulk_create_shopping_list_items(
        &self,
        list_id: &str,
        items: Vec<ShoppingListItemPayload>,
    ) -> Result<Value> {
        let list_id = require("Shopping list ID", list_id)?;
        if items.is_empty() {
            return Err(MealieError::invalid_argument("Items must be a non-empty list"));
        }
        let mut payload = Vec::with_capacity(items.len());
        for mut item in items {
            require("Each item's display name", item.display.as_deref().unwrap_or_default())?;
            item.shopping_list_id = Some(list_id.to_string());
            payload.push(item);
        }
        tracing::info!("Bulk creating {} items in shopping list {}", payload.len(), list_id);
        self.post("/api/households/shopping/items/create-bulk", &payload)
            .await
    }

    pub async fn bulk_update_shopping_list_items(
        &self,
        items: &[ShoppingListItemPayload],
    ) -> Result<Value> {
        if items.is_empty() {
            return Err(MealieError::invalid_argument("Items must be a non-empty list"));
        }
        for item in items {
            require("Each item's id", item.id.as_deref().unwrap_or_default())?;
        }
        tracing::info!("Bulk updating {} shopping list items", items.len());
        self.put("/api/households/shopping/items", items).await
    }

    pub async fn bulk_delete_shopping_list_items(&self, item_ids: &[String]) -> Result<Value> {
        if item_ids.is_empty() {
            return Err(MealieError::invalid_argument("Item IDs must be a non-empty list"));
        }
        for id in item_ids {
            require("Each item ID", id)?;
        }
        tracing::info!("Bulk deleting {} shopping list items", item_ids.len());
        let query = QueryParams::new().with_repeated("ids", item_ids);
        self.delete("/api/households/shopping/items", &query).await
    }
}

fn item_path(item_id: &str) -> String {
    format!("/api/households/shopping/items/{}", segment(item_id))
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn require<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MealieError::invalid_argument(format!("{what} cannot be empty")));
    }
    Ok(trimmed)
}

fn validate_date(field: &str, value: &str) -> Result<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            MealieError::invalid_argument(format!(
                "{field} must be an ISO date (YYYY-MM-DD), got '{value}'"
            ))
        })
}

fn transport_error(method: &Method, path: &str, error: reqwest::Error) -> MealieError {
    if error.is_timeout() {
        tracing::error!("Request timeout for {} {}", method, path);
        MealieError::Timeout {
            method: method.to_string(),
            path: path.to_string(),
        }
    } else {
        tracing::error!("Connection error for {} {}: {}", method, path, error);
        MealieError::Network {
            method: method.to_string(),
            path: path.to_string(),
            source: error,
        }
    }
}

/// Mealie reports failures as `{"detail": ...}` where the detail is either a
/// string or an object with a `message`. Anything else is passed through.
fn error_detail(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        match parsed.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(detail) => {
                if let Some(message) = detail.get("message").and_then(Value::as_str) {
                    return message.to_string();
                }
                return detail.to_string();
            }
            None => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP Error {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return json!({ "success": true });
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse response as JSON: {}", e);
        json!({ "raw_response": body })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn error_detail_prefers_mealie_detail_field() {
        assert_eq!(
            error_detail(r#"{"detail":"Recipe not found"}"#, StatusCode::NOT_FOUND),
            "Recipe not found"
        );
        assert_eq!(
            error_detail(
                r#"{"detail":{"message":"Unknown list","error":true}}"#,
                StatusCode::BAD_REQUEST
            ),
            "Unknown list"
        );
        assert_eq!(
            error_detail("upstream exploded", StatusCode::BAD_GATEWAY),
            "upstream exploded"
        );
        assert_eq!(
            error_detail("", StatusCode::SERVICE_UNAVAILABLE),
            "HTTP Error 503"
        );
    }

    #[test]
    fn parse_body_handles_empty_and_non_json() {
        assert_eq!(parse_body(""), json!({ "success": true }));
        assert_eq!(parse_body("\"new-slug\""), json!("new-slug"));
        assert_eq!(parse_body("ok"), json!({ "raw_response": "ok" }));
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn date_validation() {
        assert!(validate_date("date", "2025-02-28").is_ok());
        assert!(validate_date("date", "2025-02-30").is_err());
        assert!(validate_date("date", "tomorrow").is_err());
    }
}
