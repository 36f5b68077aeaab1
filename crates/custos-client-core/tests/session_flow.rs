//! End to end walk through the session lifecycle against a scripted identity
//! provider: cold start, login, route guarding, menu visibility and logout.

use std::{
    collections::VecDeque,
    ops::Deref,
    sync::{Arc, LazyLock, Mutex},
};

use custos_client_core::{
    decide, IdentityProvider, MemoryStorage, RouteAccess, SessionState, SessionStorage,
    SessionStore,
};
use custos_shared::{
    menu::default_menu,
    req_args::{ChangePasswordReqArgs, LoginReqArgs},
    telemetry::{self, get_subscriber, init_subscriber},
    token::AccessToken,
    uac::{
        AccessMode, ChangePasswordResponse, LoginResponse, Permission, Position, Principal,
        PrincipalStatus,
    },
};
use futures::future::BoxFuture;

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let (file, path) = telemetry::create_trace_file("client_core_tests").unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces suppressed, set TEST_LOG to write them to file".to_string()
    }
});

#[derive(Debug, Default)]
struct ScriptedProvider {
    login_results: Mutex<VecDeque<anyhow::Result<LoginResponse>>>,
    fetch_results: Mutex<VecDeque<anyhow::Result<Principal>>>,
}

impl IdentityProvider for ScriptedProvider {
    fn login(&self, _args: LoginReqArgs) -> BoxFuture<'static, anyhow::Result<LoginResponse>> {
        let result = self
            .login_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted login result");
        Box::pin(std::future::ready(result))
    }

    fn fetch_current_user(
        &self,
        _token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<Principal>> {
        let result = self
            .fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted fetch result");
        Box::pin(std::future::ready(result))
    }

    fn change_password(
        &self,
        _args: ChangePasswordReqArgs,
        _token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<ChangePasswordResponse>> {
        unimplemented!("not used by this test")
    }
}

fn custodian() -> Principal {
    Principal {
        id: 42.into(),
        username: "custodian1".try_into().unwrap(),
        display_name: "Ward Custodian".try_into().unwrap(),
        email: Some("custodian1@example.org".to_string()),
        phone: None,
        position: Some(Position {
            id: 3.into(),
            name: "Custodian".try_into().unwrap(),
            code: "CUST".try_into().unwrap(),
            level: 2,
            permissions: vec![
                Permission::ViewAllTools,
                Permission::AssignCustody,
                Permission::RevokeCustody,
                Permission::ViewCustodyHistory,
            ]
            .into(),
        }),
        unit_id: Some(5.into()),
        department_id: Some(8.into()),
        status: PrincipalStatus::Active,
    }
}

#[tokio::test]
async fn login_to_logout_round_trip() {
    // Arrange
    println!("{}", TRACING.deref());
    let provider = ScriptedProvider::default();
    provider.login_results.lock().unwrap().push_back(Ok(LoginResponse {
        access_token: "access-42".to_string().into(),
        refresh_token: "refresh-42".to_string().into(),
        user: custodian(),
    }));
    let store = SessionStore::new(
        Arc::new(provider),
        Arc::new(MemoryStorage::default()),
    );

    // Assert - Guard defers while the session has not settled
    assert_eq!(
        store.check_route(&[Permission::ViewAllTools], AccessMode::Any),
        RouteAccess::Loading
    );

    // Act - Cold start with nothing persisted
    store.initialize().await;

    // Assert - Anonymous sessions are redirected and see only public entries
    assert_eq!(store.state(), SessionState::Anonymous);
    assert_eq!(
        store.check_route(&[Permission::ViewAllTools], AccessMode::Any),
        RouteAccess::RedirectToLogin
    );
    let menu = store.visible_menu(&default_menu());
    assert_eq!(menu.len(), 1, "only the dashboard is unrestricted: {menu:#?}");

    // Act - Login
    let principal = store
        .login(LoginReqArgs::new("custodian1", "secret".to_string().into()))
        .await
        .unwrap();

    // Assert - Guarded routes now resolve per permissions
    assert_eq!(principal.username.as_ref(), "custodian1");
    assert!(store
        .check_route(
            &[Permission::ViewAllTools, Permission::ViewAssignedTools],
            AccessMode::Any
        )
        .is_granted());
    let denied = store.check_route(&[Permission::ManageSystem], AccessMode::Any);
    assert_eq!(denied.denial_labels(), vec!["Manage System".to_string()]);

    // Assert - Menu shows the custody group but not administration
    let menu = store.visible_menu(&default_menu());
    let labels: Vec<_> = menu.iter().map(|x| x.label).collect();
    assert_eq!(labels, vec!["Dashboard", "Assets", "Custody"]);

    // Act - Logout
    store.logout();

    // Assert
    assert_eq!(store.state(), SessionState::Anonymous);
    assert_eq!(
        store.check_route(&[], AccessMode::Any),
        RouteAccess::RedirectToLogin,
        "even unrestricted routes require a session"
    );
}

#[tokio::test]
async fn stale_fallback_then_refresh_recovers() {
    // Arrange - A persisted session from a previous run
    println!("{}", TRACING.deref());
    let provider = ScriptedProvider::default();
    {
        let mut fetches = provider.fetch_results.lock().unwrap();
        fetches.push_back(Err(anyhow::anyhow!("network down")));
        fetches.push_back(Ok(custodian()));
    }
    let storage = Arc::new(MemoryStorage::default());
    storage.set("accessToken", "access-42".to_string());
    storage.set("refreshToken", "refresh-42".to_string());
    storage.set("user", serde_json::to_string(&custodian()).unwrap());
    let store = SessionStore::new(Arc::new(provider), storage);

    // Act - Cold start hits the network failure
    store.initialize().await;

    // Assert - Stale fallback keeps the user logged in
    assert_eq!(store.state(), SessionState::Authenticated);

    // Act - A later refresh succeeds and re-syncs the principal
    store.refresh().await;

    // Assert
    assert_eq!(store.state(), SessionState::Authenticated);
    assert_eq!(store.principal().unwrap().username.as_ref(), "custodian1");
}

#[test]
fn decide_is_usable_without_a_store() {
    let actual = decide(
        SessionState::Anonymous,
        None,
        &[Permission::ViewAllTools],
        AccessMode::Any,
    );

    assert_eq!(actual, RouteAccess::RedirectToLogin);
}
