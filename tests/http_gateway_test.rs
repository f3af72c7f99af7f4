use std::time::Duration;

use serde_json::json;
use spice_pilot::domain::{ClientError, RecipeGateway, SessionGateway};
use spice_pilot::infrastructure::HttpGateway;
use spice_pilot::models::{
    GenerationPreferences, GenerationRequest, Id, LoginRequest, RatingSummary,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.uri(), Duration::from_secs(5)).expect("valid mock server URL")
}

fn recipe_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "country": "Kenya",
        "description": "A test dish",
        "difficulty": "Easy",
        "spice_level": "Mild",
        "is_vegan": false,
        "is_vegetarian": true,
        "is_gluten_free": true,
        "rating": { "average": 4.5, "count": 2 }
    })
}

#[tokio::test]
async fn list_decodes_numeric_ids_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([recipe_json(1, "Pilau"), recipe_json(2, "Sukuma Wiki")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let recipes = gateway(&server).list().await.unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].id, Id::from("1"));
    assert_eq!(recipes[1].rating, RatingSummary::new(4.5, 2));
}

#[tokio::test]
async fn search_sends_the_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "chicken curry & rice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([recipe_json(7, "Curry")])))
        .expect(1)
        .mount(&server)
        .await;

    let results = gateway(&server).search("chicken curry & rice").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Curry");
}

#[tokio::test]
async fn server_error_body_becomes_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/surprise"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Database unavailable" })),
        )
        .mount(&server)
        .await;

    match gateway(&server).surprise().await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipe/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).detail(&Id::from("3")).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let gateway = HttpGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = gateway.list().await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn rate_posts_id_and_stars() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rate-recipe"))
        .and(body_json(json!({ "recipe_id": "42", "rating": 5 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "average_rating": 4.2, "rating_count": 10 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = gateway(&server).rate(&Id::from("42"), 5).await.unwrap();
    assert_eq!(RatingSummary::from(resp), RatingSummary::new(4.2, 10));
}

#[tokio::test]
async fn generate_posts_ingredients_and_preferences() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-recipe"))
        .and(body_json(json!({
            "ingredients": ["chicken", "rice"],
            "preferences": { "difficulty": "Easy", "cuisine": "" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Chicken Fried Rice",
            "cuisine_type": "Asian",
            "ingredients": ["chicken", "rice", "soy sauce"],
            "steps": ["Cook rice", "Fry everything"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest {
        ingredients: vec!["chicken".into(), "rice".into()],
        preferences: GenerationPreferences {
            difficulty: "Easy".into(),
            cuisine: String::new(),
        },
    };
    let generated = gateway(&server).generate(&request).await.unwrap();
    assert_eq!(generated.name, "Chicken Fried Rice");
    assert_eq!(generated.steps.len(), 2);
}

#[tokio::test]
async fn ratings_overview_with_own_vote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ratings/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "average_rating": 3.5,
            "total_ratings": 4,
            "user_rating": { "rating": 2, "review": null },
            "reviews": [
                { "rating": 5, "review_text": "Lovely", "author_name": "Wanjiru", "created_at": "2024-05-01" }
            ]
        })))
        .mount(&server)
        .await;

    let overview = gateway(&server).ratings(&Id::from("42")).await.unwrap();
    assert_eq!(overview.average_rating, Some(3.5));
    assert_eq!(overview.user_rating.map(|r| r.rating), Some(2));
    assert_eq!(overview.reviews[0].author_name, "Wanjiru");
}

#[tokio::test]
async fn filter_option_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cuisines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Indian", "Kenyan"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["India", "Kenya"])))
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    assert_eq!(gateway.cuisines().await.unwrap(), vec!["Indian", "Kenyan"]);
    assert_eq!(gateway.countries().await.unwrap(), vec!["India", "Kenya"]);
}

#[tokio::test]
async fn current_user_is_none_when_not_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Not logged in" })))
        .mount(&server)
        .await;

    assert_eq!(gateway(&server).current_user().await.unwrap(), None);
}

#[tokio::test]
async fn current_user_when_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": "amina@example.com"
        })))
        .mount(&server)
        .await;

    let user = gateway(&server).current_user().await.unwrap().unwrap();
    assert_eq!(user.id, Id::from("5"));
    assert_eq!(user.initials(), "AO");
}

#[tokio::test]
async fn login_rejection_message_is_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({
            "email": "amina@example.com",
            "password": "wrong-password",
            "rememberMe": false
        })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let request = LoginRequest {
        email: "amina@example.com".into(),
        password: "wrong-password".into(),
        remember_me: false,
    };
    let err = gateway(&server).login(&request).await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn login_refusal_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let request = LoginRequest {
        email: "amina@example.com".into(),
        password: "whatever".into(),
        remember_me: true,
    };
    let err = gateway(&server).login(&request).await.unwrap_err();
    assert_eq!(err.user_message(), "Login failed");
}

#[tokio::test]
async fn logout_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = gateway(&server).logout().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(err.user_message(), "Logout failed");
}

#[tokio::test]
async fn logout_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(gateway(&server).logout().await.is_ok());
}
