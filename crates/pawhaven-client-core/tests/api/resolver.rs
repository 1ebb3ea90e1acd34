use crate::helpers::{no_cb, spawn_app};
use pawhaven_client_core::{
    AuthorizationResolver, GateState, LandingRoute, LayoutArea, LayoutGate, RoleResolution,
};
use pawhaven_shared::{
    id::ShelterId,
    uac::{Role, RoleSet},
};
use pawhaven_test_backend::{RolesBehavior, ShelterBehavior, TestUser};
use rstest::rstest;

#[rstest]
#[case::server_error(RolesBehavior::ServerError, RoleResolution::FetchFailed)]
#[case::not_found(RolesBehavior::NotFound, RoleResolution::FetchFailed)]
#[case::null_roles(RolesBehavior::Null, RoleResolution::NoRolesAssigned)]
#[case::empty_roles(RolesBehavior::Roles(vec![]), RoleResolution::NoRolesAssigned)]
#[tokio::test]
async fn role_failures_still_complete_login(
    #[case] roles: RolesBehavior,
    #[case] expected_resolution: RoleResolution,
) {
    // Arrange
    let app = spawn_app(TestUser::generate(3, &[]).with_roles(roles)).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.role_resolution, expected_resolution);
    assert_eq!(outcome.landing, LandingRoute::Home);
    assert_eq!(outcome.landing.path(), "/");
    assert!(outcome.identity.roles().is_empty());
    assert!(app.client.is_logged_in());
    assert_eq!(u64::from(outcome.identity.user_id()), 3);
}

#[tokio::test]
async fn unknown_role_names_are_dropped() {
    // Arrange
    let roles = RolesBehavior::Roles(vec!["Admin".to_string(), "Janitor".to_string()]);
    let app = spawn_app(TestUser::generate(3, &[]).with_roles(roles)).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(**outcome.identity.roles(), RoleSet::from([Role::Admin]));
}

#[tokio::test]
async fn shelter_staff_gets_shelter_id() {
    // Arrange
    let app = spawn_app(
        TestUser::generate(11, &["ShelterStaff"]).with_shelter(ShelterBehavior::Found(42)),
    )
    .await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.landing, LandingRoute::ShelterDashboard);
    assert_eq!(outcome.identity.shelter_id(), Some(ShelterId::from(42)));
    let persisted = app.rehydrated_session();
    assert_eq!(
        persisted.identity().unwrap().shelter_id(),
        Some(ShelterId::from(42))
    );
}

#[rstest]
#[case::server_error(ShelterBehavior::ServerError)]
#[case::not_found(ShelterBehavior::NotFound)]
#[tokio::test]
async fn shelter_staff_with_failed_affiliation_lookup(#[case] shelter: ShelterBehavior) {
    // Arrange
    let app = spawn_app(TestUser::generate(12, &["ShelterStaff"]).with_shelter(shelter)).await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.landing, LandingRoute::ShelterDashboard);
    assert_eq!(outcome.landing.path(), "/shelter/dashboard");
    assert_eq!(outcome.role_resolution, RoleResolution::Resolved);
    assert_eq!(
        **outcome.identity.roles(),
        RoleSet::from([Role::ShelterStaff])
    );
    assert_eq!(outcome.identity.shelter_id(), None);
    assert!(outcome.identity.is_unassigned_shelter_staff());

    // Act - the shelter layout must still admit the user
    let mut gate = LayoutGate::new(LayoutArea::Shelter);
    let state = gate.mount(app.client.session());

    // Assert
    assert!(matches!(state, GateState::Authorized(_)), "{state:?}");
}

#[tokio::test]
async fn shelter_is_only_looked_up_for_shelter_staff() {
    // Arrange
    let app = spawn_app(TestUser::generate(13, &["Admin"]).with_shelter(ShelterBehavior::Found(7)))
        .await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.identity.shelter_id(), None);
    assert!(app.backend.requests_to("/shelter").is_empty());
}

#[tokio::test]
async fn admin_and_shelter_staff_lands_on_admin_dashboard() {
    // Arrange
    let app = spawn_app(
        TestUser::generate(14, &["ShelterStaff", "Admin"])
            .with_shelter(ShelterBehavior::Found(3)),
    )
    .await;

    // Act
    let outcome = app.login().await.unwrap();

    // Assert
    assert_eq!(outcome.landing, LandingRoute::AdminDashboard);
    assert_eq!(outcome.identity.shelter_id(), Some(ShelterId::from(3)));
}

#[tokio::test]
async fn resolver_can_be_used_directly() {
    // Arrange
    let app = spawn_app(
        TestUser::generate(15, &["ShelterStaff"]).with_shelter(ShelterBehavior::Found(8)),
    )
    .await;
    let identity = app.login().await.unwrap().identity;

    // Act
    let actual = AuthorizationResolver::new(&app.client)
        .resolve(identity.user_id(), identity.token())
        .await;

    // Assert
    assert_eq!(actual.role_resolution, RoleResolution::Resolved);
    assert_eq!(*actual.roles, RoleSet::from([Role::ShelterStaff]));
    assert_eq!(actual.shelter_id, Some(ShelterId::from(8)));
}

#[tokio::test]
async fn refresh_picks_up_changed_roles() {
    // Arrange
    let app = spawn_app(TestUser::generate(16, &["Donor"])).await;
    app.login().await.unwrap();
    app.backend
        .set_roles(16, RolesBehavior::Roles(vec!["Volunteer".to_string()]));

    // Act
    let identity = app
        .client
        .refresh_authorization(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(**identity.roles(), RoleSet::from([Role::Volunteer]));
    assert_eq!(
        *app.client.session().current().roles(),
        RoleSet::from([Role::Volunteer])
    );
    assert_eq!(
        *app.rehydrated_session().roles(),
        RoleSet::from([Role::Volunteer])
    );
}
