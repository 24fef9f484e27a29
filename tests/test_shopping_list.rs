mod common;

use common::TestEnvironment;
use mcp_mealie::client::{
    NewShoppingList, ShoppingItemFilter, ShoppingListItemPayload, ShoppingListUpdate,
};
use mcp_mealie::MealieError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test_log::test(tokio::test)]
async fn test_create_shopping_list() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/households/shopping/lists"))
        .and(body_json(json!({ "name": "Weekly", "description": "Saturday market" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "list-1", "name": "Weekly" })),
        )
        .expect(1)
        .mount(&env.mealie)
        .await;

    let list = env
        .client
        .create_shopping_list(&NewShoppingList {
            name: "Weekly".into(),
            description: Some("Saturday market".into()),
        })
        .await
        .unwrap();
    assert_eq!(list["id"], "list-1");
}

#[test_log::test(tokio::test)]
async fn test_update_shopping_list_requires_a_change() {
    let env = TestEnvironment::new().await;

    let err = env
        .client
        .update_shopping_list(&ShoppingListUpdate {
            id: "list-1".into(),
            name: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MealieError::InvalidArgument { .. }));
}

#[test_log::test(tokio::test)]
async fn test_list_items_filtered_by_list() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/households/shopping/items"))
        .and(query_param("queryFilter", "shoppingListId=\"list-1\""))
        .and(query_param("perPage", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [], "total": 0 })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let filter = ShoppingItemFilter {
        list_id: Some("list-1".into()),
        per_page: Some(25),
        ..Default::default()
    };
    let items = env.client.get_shopping_list_items(&filter).await.unwrap();
    assert_eq!(items["total"], 0);
}

#[test_log::test(tokio::test)]
async fn test_list_id_with_quote_is_rejected() {
    let env = TestEnvironment::new().await;

    let filter = ShoppingItemFilter {
        list_id: Some("list-1\" OR \"1\"=\"1".into()),
        ..Default::default()
    };
    let err = env.client.get_shopping_list_items(&filter).await.unwrap_err();
    assert!(matches!(err, MealieError::InvalidArgument { .. }));
    assert!(env.mealie.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_create_item_sends_camel_case_payload() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/households/shopping/items"))
        .and(body_json(json!({
            "shoppingListId": "list-1",
            "display": "Oat milk",
            "quantity": 2.0,
            "unit": "litre"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "item-1" })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let item = ShoppingListItemPayload {
        shopping_list_id: Some("list-1".into()),
        display: Some("Oat milk".into()),
        quantity: Some(2.0),
        unit: Some("litre".into()),
        ..Default::default()
    };
    let created = env.client.create_shopping_list_item(&item).await.unwrap();
    assert_eq!(created["id"], "item-1");
}

#[test_log::test(tokio::test)]
async fn test_toggle_inverts_checked_flag() {
    let env = TestEnvironment::new().await;
    let item = json!({ "id": "item-1", "display": "Eggs", "checked": false, "position": 3 });

    Mock::given(method("GET"))
        .and(path("/api/households/shopping/items/item-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item))
        .expect(1)
        .mount(&env.mealie)
        .await;
    let toggled = json!({ "id": "item-1", "display": "Eggs", "checked": true, "position": 3 });
    Mock::given(method("PUT"))
        .and(path("/api/households/shopping/items/item-1"))
        .and(body_json(toggled.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(toggled.clone()))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let result = env.client.toggle_shopping_list_item("item-1").await.unwrap();
    assert_eq!(result, toggled);
}

#[test_log::test(tokio::test)]
async fn test_delete_item_with_empty_response() {
    let env = TestEnvironment::new().await;

    Mock::given(method("DELETE"))
        .and(path("/api/households/shopping/items/item-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let result = env.client.delete_shopping_list_item("item-1").await.unwrap();
    assert_eq!(result, json!({ "success": true }));
}

#[test_log::test(tokio::test)]
async fn test_bulk_create_tags_items_with_list() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/households/shopping/items/create-bulk"))
        .and(body_json(json!([
            { "shoppingListId": "list-1", "display": "Bread" },
            { "shoppingListId": "list-1", "display": "Eggs", "quantity": 12.0 }
        ])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "createdItems": [{}, {}] })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let items = vec![
        ShoppingListItemPayload {
            display: Some("Bread".into()),
            ..Default::default()
        },
        ShoppingListItemPayload {
            display: Some("Eggs".into()),
            quantity: Some(12.0),
            ..Default::default()
        },
    ];
    let result = env
        .client
        .bulk_create_shopping_list_items("list-1", items)
        .await
        .unwrap();
    assert_eq!(result["createdItems"].as_array().unwrap().len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_bulk_create_rejects_item_without_name() {
    let env = TestEnvironment::new().await;

    let err = env
        .client
        .bulk_create_shopping_list_items("list-1", vec![ShoppingListItemPayload::default()])
        .await
        .unwrap_err();
    assert!(matches!(err, MealieError::InvalidArgument { .. }));
    assert!(env.mealie.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_bulk_delete_sends_ids_as_query() {
    let env = TestEnvironment::new().await;

    Mock::given(method("DELETE"))
        .and(path("/api/households/shopping/items"))
        .and(query_param("ids", "item-1"))
        .and(query_param("ids", "item-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deletedItems": [] })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    env.client
        .bulk_delete_shopping_list_items(&["item-1".to_string(), "item-2".to_string()])
        .await
        .unwrap();
}

#[test_log::test(tokio::test)]
async fn test_bulk_update_requires_ids() {
    let env = TestEnvironment::new().await;

    let err = env
        .client
        .bulk_update_shopping_list_items(&[ShoppingListItemPayload {
            checked: Some(true),
            ..Default::default()
        }])
        .await
        .unwrap_err();
    assert!(matches!(err, MealieError::InvalidArgument { .. }));
}
