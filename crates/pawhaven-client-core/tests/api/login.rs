use crate::helpers::{no_cb, spawn_app, spawn_app_with_users};
use pawhaven_client_core::{LandingRoute, LoginError, RoleResolution};
use pawhaven_shared::{
    req_args::LoginReqArgs,
    uac::{Role, RoleSet},
};
use pawhaven_test_backend::{LoginBehavior, TestUser};
use std::time::Duration;

#[tokio::test]
async fn successful_admin_login() {
    // Arrange
    let user = TestUser::generate(1, &["Admin"])
        .with_credentials("a@x.com", "p")
        .with_username("a")
        .with_login(LoginBehavior::FixedToken("T".to_string()));
    let app = spawn_app(user).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.landing, LandingRoute::AdminDashboard);
    assert_eq!(outcome.landing.path(), "/admin/dashboard");
    assert_eq!(outcome.role_resolution, RoleResolution::Resolved);
    let current = app.client.session().current();
    let identity = current.identity().unwrap();
    assert_eq!(u64::from(identity.user_id()), 1);
    assert_eq!(identity.username().as_ref(), "a");
    assert_eq!(identity.token().as_str(), "T");
    assert_eq!(**identity.roles(), RoleSet::from([Role::Admin]));
    assert_eq!(identity.shelter_id(), None);
    assert_eq!(identity, &outcome.identity);
}

#[tokio::test]
async fn session_holds_backend_id_and_non_empty_token() {
    // Arrange
    let app = spawn_app(TestUser::generate(77, &["Donor", "Volunteer"])).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    let identity = outcome.identity;
    assert_eq!(u64::from(identity.user_id()), 77);
    assert!(!identity.token().is_empty());
    assert_eq!(
        **identity.roles(),
        RoleSet::from([Role::Donor, Role::Volunteer])
    );
    assert_eq!(outcome.landing, LandingRoute::Home);
}

#[tokio::test]
async fn display_hint_is_decoded_from_token() {
    // Arrange
    let app = spawn_app(TestUser::generate(5, &["Admin"]).with_username("hinted")).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    let hint = outcome.identity.display_hint();
    assert_eq!(hint.username.as_deref(), Some("hinted"));
    assert_eq!(hint.role.as_deref(), Some("Admin"));
}

#[tokio::test]
async fn login_failure_invalid_password() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Admin"])).await;
    let login_args = app
        .test_user
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::LoginFailed);
    assert!(!app.client.is_logged_in());
    assert!(app.store.is_empty());
    assert!(app.backend.requests_to("/userrole").is_empty());
}

#[tokio::test]
async fn login_failure_unknown_user() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Admin"])).await;
    let login_args = LoginReqArgs::new("nobody@example.com", "pw".to_string().into());

    // Act
    let outcome = app.client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        LoginError::LoginFailed.to_string()
    );
}

#[tokio::test]
async fn login_failure_response_without_data() {
    // Arrange
    let app =
        spawn_app(TestUser::generate(1, &["Admin"]).with_login(LoginBehavior::MissingData)).await;

    // Act
    let outcome = app.login().await;

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::LoginFailed);
    assert!(!app.client.is_logged_in());
}

#[tokio::test]
async fn login_failure_empty_token() {
    // Arrange
    let app =
        spawn_app(TestUser::generate(1, &["Admin"]).with_login(LoginBehavior::EmptyToken)).await;

    // Act
    let outcome = app.login().await;

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::LoginFailed);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn empty_credentials_never_reach_the_backend() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Admin"])).await;
    let login_args = LoginReqArgs::new("", "".to_string().into());

    // Act
    let outcome = app.client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::InvalidInput);
    assert!(app.backend.recorded_requests().is_empty());
}

#[tokio::test]
async fn login_fails_when_backend_is_unreachable() {
    // Arrange
    let client = pawhaven_client_core::Client::new(
        "http://127.0.0.1:1".to_string(),
        pawhaven_client_core::SessionContext::in_memory(),
    );
    let login_args = LoginReqArgs::new("a@x.com", "p".to_string().into());

    // Act
    let outcome = client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::LoginFailed);
}

#[tokio::test]
async fn newer_login_supersedes_older_one() {
    // Arrange
    let slow_user =
        TestUser::generate(1, &["Admin"]).with_roles_delay(Duration::from_millis(500));
    let fast_user = TestUser::generate(2, &["Donor"]);
    let app = spawn_app_with_users(slow_user.clone(), vec![fast_user.clone()]).await;

    // Act
    let slow_rx = app.client.login(slow_user.login_args(), no_cb);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast_outcome = app.login_as(&fast_user).await;
    let slow_outcome = slow_rx.await.unwrap();

    // Assert
    assert_eq!(slow_outcome.unwrap_err(), LoginError::Superseded);
    let fast_outcome = fast_outcome.unwrap();
    assert_eq!(u64::from(fast_outcome.identity.user_id()), 2);
    let current = app.client.session().current();
    assert_eq!(u64::from(current.identity().unwrap().user_id()), 2);
    assert_eq!(*current.roles(), RoleSet::from([Role::Donor]));
}

#[tokio::test]
async fn login_attaches_bearer_token_to_role_request() {
    // Arrange
    let app = spawn_app(TestUser::generate(9, &["Admin"])).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    let expected = format!("Bearer {}", outcome.identity.token().as_str());
    let role_requests = app.backend.requests_to("/userrole/role/9/roles");
    assert_eq!(role_requests.len(), 1);
    assert_eq!(role_requests[0].authorization.as_deref(), Some(expected.as_str()));
    let login_requests = app.backend.requests_to("/auth/login");
    assert_eq!(login_requests.len(), 1);
    assert_eq!(login_requests[0].authorization, None);
}

#[tokio::test]
async fn token_is_persisted_before_roles_resolve() {
    // Arrange
    let user = TestUser::generate(31, &["Admin"])
        .with_username("early")
        .with_roles_delay(Duration::from_millis(500));
    let app = spawn_app(user).await;

    // Act
    let rx = app.client.login(app.test_user.login_args(), no_cb);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let during = app.store.dump();
    let is_logged_in_during = app.client.is_logged_in();
    let outcome = rx.await.unwrap().unwrap();

    // Assert
    assert!(is_logged_in_during);
    assert_eq!(
        during.get("token").map(String::as_str),
        Some(outcome.identity.token().as_str())
    );
    assert_eq!(during.get("nameid").map(String::as_str), Some("31"));
    assert_eq!(during.get("username").map(String::as_str), Some("early"));
    assert_eq!(during.get("userRoles").map(String::as_str), Some("[]"));
    assert_eq!(
        app.store.dump().get("userRoles").map(String::as_str),
        Some(r#"["Admin"]"#)
    );
}
