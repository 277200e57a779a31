//! API integration tests
//!
//! Run against a live server started with RUN_MODE=development (dev token
//! issuing enabled) and, for the payment tests, payment.api_base pointed at a
//! checkout-provider stub.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api/v1";

/// Sign a user up (idempotent) and fetch a dev bearer token for them
async fn get_token(client: &Client, email: &str) -> String {
    let _ = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "email": email, "name": "Test User" }))
        .send()
        .await
        .expect("Failed to send signup request");

    let response = client
        .post(format!("{}/auth/token", BASE_URL))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to send token request");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Token for the seeded admin account
async fn admin_token(client: &Client) -> String {
    get_token(client, "admin@boimela.test").await
}

/// Promote an email to librarian using the admin token. The token issued
/// before the promotion stays valid: role is resolved per request.
async fn librarian_token(client: &Client, email: &str) -> String {
    let token = get_token(client, email).await;
    let admin = admin_token(client).await;
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, email))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "role": "librarian" }))
        .send()
        .await
        .expect("Failed to send role update");
    assert!(response.status().is_success());
    token
}

async fn create_listing(client: &Client, librarian: &str, title: &str, price: &str) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({ "title": title, "author": "Anonymous", "price": price }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_str().expect("No book ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_access_is_rejected() {
    let client = Client::new();

    for path in ["/users", "/allbooks", "/orders", "/wishlist", "/invoices"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 401, "{} should require auth", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_signup_is_idempotent_on_email() {
    let client = Client::new();
    let email = "dup@boimela.test";

    let first: Value = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "email": email, "name": "First" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let second: Value = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "email": email, "name": "Second" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    // Same account both times: the second signup returned the first row
    assert_eq!(first["email"], second["email"]);
    assert_eq!(first["name"], second["name"]);
    assert_eq!(first["created_at"], second["created_at"]);
}

#[tokio::test]
#[ignore]
async fn test_user_list_is_admin_only() {
    let client = Client::new();
    let buyer = get_token(&client, "buyer1@boimela.test").await;

    let response = client
        .get(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let admin = admin_token(&client).await;
    let response = client
        .get(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_librarian_updates_only_own_listings() {
    let client = Client::new();
    let seller = librarian_token(&client, "s@boimela.test").await;
    let other = librarian_token(&client, "l@boimela.test").await;

    let book_id = create_listing(&client, &seller, "Owned Book", "12.50").await;

    // Foreign librarian: forbidden
    let response = client
        .patch(format!("{}/allbooks/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", other))
        .json(&json!({ "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Selling librarian: allowed
    let response = client
        .patch(format!("{}/allbooks/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", seller))
        .json(&json!({ "price": "11.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["price"], "11.00");
}

#[tokio::test]
#[ignore]
async fn test_book_delete_cascades_wishlist() {
    let client = Client::new();
    let seller = librarian_token(&client, "s@boimela.test").await;
    let buyer = get_token(&client, "wisher@boimela.test").await;
    let admin = admin_token(&client).await;

    let book_id = create_listing(&client, &seller, "Doomed Book", "5.00").await;

    let response = client
        .post(format!("{}/wishlist", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Delete is admin-only
    let response = client
        .delete(format!("{}/allbooks/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", seller))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .delete(format!("{}/allbooks/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    // The wishlist entry went with the book
    let wishlist: Value = client
        .get(format!("{}/wishlist", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let remaining = wishlist
        .as_array()
        .expect("Wishlist should be an array")
        .iter()
        .filter(|e| e["book_id"] == book_id.as_str())
        .count();
    assert_eq!(remaining, 0);
}

#[tokio::test]
#[ignore]
async fn test_role_change_applies_to_outstanding_tokens() {
    let client = Client::new();
    let email = "promoted@boimela.test";
    let token = get_token(&client, email).await;
    let admin = admin_token(&client).await;

    // The token was minted while the account was a buyer
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "title": "Too Early", "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, email))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "role": "librarian" }))
        .send()
        .await
        .expect("Failed to send role update");
    assert!(response.status().is_success());

    // The same token now acts with the stored role
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "title": "Right On Time", "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Demotion is just as immediate
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, email))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "role": "buyer" }))
        .send()
        .await
        .expect("Failed to send role update");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "title": "Too Late", "price": "1.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_wishlist_re_add_returns_the_stored_entry() {
    let client = Client::new();
    let seller = librarian_token(&client, "s@boimela.test").await;
    let buyer = get_token(&client, "rewisher@boimela.test").await;

    let book_id = create_listing(&client, &seller, "Wished Twice", "3.00").await;

    let mut entries = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{}/wishlist", BASE_URL))
            .header("Authorization", format!("Bearer {}", buyer))
            .json(&json!({ "book_id": book_id }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        entries.push(response.json::<Value>().await.expect("Failed to parse response"));
    }

    // The second add echoed the persisted row, not a fresh timestamp
    assert_eq!(entries[0]["added_at"], entries[1]["added_at"]);
    assert_eq!(entries[0]["user_email"], entries[1]["user_email"]);
}

#[tokio::test]
#[ignore]
async fn test_negative_listing_price_is_rejected() {
    let client = Client::new();
    let seller = librarian_token(&client, "s@boimela.test").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", seller))
        .json(&json!({ "title": "Cursed Book", "price": "-1.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_foreign_order_filter_is_forbidden() {
    let client = Client::new();
    let buyer = get_token(&client, "nosy@boimela.test").await;

    let response = client
        .get(format!("{}/orders?buyer_email=other@boimela.test", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request");

    // Forbidden outright, not an empty list
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_confirmation_records_one_payment() {
    let client = Client::new();
    let seller = librarian_token(&client, "s@boimela.test").await;
    let buyer = get_token(&client, "payer@boimela.test").await;

    let book_id = create_listing(&client, &seller, "Paid Book", "10.00").await;

    let order: Value = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let order_id = order["id"].as_str().expect("No order ID");

    // Checkout against the provider stub
    let response = client
        .post(format!("{}/create-checkout-session", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .json(&json!({ "order_id": order_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let orders: Value = client
        .get(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let session_id = orders
        .as_array()
        .and_then(|list| list.iter().find(|o| o["id"] == *order_id))
        .and_then(|o| o["session_id"].as_str())
        .expect("Order should carry its session id")
        .to_string();

    // Simulate client poll plus replayed webhook for the same session
    let mut confirmations = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{}/payment-success", BASE_URL))
            .json(&json!({ "session_id": session_id }))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        confirmations.push(response.json::<Value>().await.expect("Failed to parse response"));
    }

    assert_eq!(confirmations[0]["paid"], true);
    assert_eq!(confirmations[0]["order_id"], confirmations[1]["order_id"]);
    assert_eq!(
        confirmations[0]["transaction_id"],
        confirmations[1]["transaction_id"]
    );

    // Exactly one invoice for this order, with the provider-confirmed amount
    let invoices: Value = client
        .get(format!("{}/invoices", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let matching: Vec<_> = invoices
        .as_array()
        .expect("Invoices should be an array")
        .iter()
        .filter(|record| record["order_id"] == *order_id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["amount"], "10.00");

    // The order tracks the provider's truth
    let orders: Value = client
        .get(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", buyer))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let paid_order = orders
        .as_array()
        .and_then(|list| list.iter().find(|o| o["id"] == *order_id))
        .expect("Order should be visible to its buyer");
    assert_eq!(paid_order["payment_status"], "paid");
    assert_eq!(paid_order["status"], "processing");
}

#[tokio::test]
#[ignore]
async fn test_wishlist_is_invisible_to_admin() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    // Admin has their own (empty) wishlist but no access to others: the
    // wishlist endpoints only ever operate on the caller's entries.
    let response = client
        .get(format!("{}/wishlist", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.as_array().expect("Wishlist should be an array").is_empty());
}
