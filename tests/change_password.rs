//! End-to-end: the web client pages against the development API served on
//! an ephemeral port.

use std::{sync::Arc, time::Duration};
use superimpress_web::{
    app_lib::{DurableStorage, FileStorage, MemoryStorage, ACCESS_TOKEN_KEY},
    features::auth::Session,
    server::{self, ApiState},
    AppConfig, Browser, ExecutionContext,
};
use tokio::net::TcpListener;
use ulid::Ulid;

const PASSWORD: &str = "Password@123";
const NEW_PASSWORD: &str = "Password@456";

async fn spawn_api(token_ttl: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(ApiState::new(token_ttl));
    tokio::spawn(async move {
        let _ = server::serve(listener, state).await;
    });
    format!("http://{addr}")
}

fn unique_email() -> String {
    format!("user-{}@example.com", Ulid::new().to_string().to_lowercase())
}

fn browser(api: &str, storage: Arc<dyn DurableStorage>) -> Browser {
    Browser::new(
        AppConfig::default().with_api_base_url(api),
        ExecutionContext::Browser(storage),
    )
    .unwrap()
}

async fn register(browser: &mut Browser, email: &str) {
    browser.goto("/register").await.unwrap();
    browser.fill("Email", email).unwrap();
    browser.fill("Password", PASSWORD).unwrap();
    browser.fill("Confirm password", PASSWORD).unwrap();
    browser.click("Register").await.unwrap();
    assert_eq!(browser.url(), "/login", "{}", browser.view());
}

async fn login(browser: &mut Browser, email: &str, password: &str) {
    browser.goto("/login").await.unwrap();
    browser.fill("Email", email).unwrap();
    browser.fill("Password", password).unwrap();
    browser.click("Log in").await.unwrap();
}

fn alert_messages(browser: &Browser) -> Vec<String> {
    browser
        .view()
        .alerts
        .into_iter()
        .map(|alert| alert.message)
        .collect()
}

#[tokio::test]
async fn unauthenticated_visit_redirects_to_login() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let mut browser = browser(&api, Arc::new(MemoryStorage::new()));

    browser.goto("/change-password").await.unwrap();

    assert_eq!(browser.url(), "/login");
    assert!(browser.view().has_button("Log in"));
}

#[tokio::test]
async fn authenticated_user_changes_password() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let storage = Arc::new(MemoryStorage::new());
    let mut browser = browser(&api, storage.clone());
    let email = unique_email();

    register(&mut browser, &email).await;
    login(&mut browser, &email, PASSWORD).await;

    assert_eq!(browser.url(), "/");
    assert!(browser.session().is_authenticated());
    assert!(storage.get_item(ACCESS_TOKEN_KEY).unwrap().is_some());
    assert!(browser
        .view()
        .paragraphs
        .contains(&format!("Signed in as {email}")));

    browser.goto("/change-password").await.unwrap();
    assert_eq!(browser.url(), "/change-password");
    let view = browser.view();
    let form = view.form.as_ref().unwrap();
    let labels: Vec<&str> = form.fields.iter().map(|field| field.label).collect();
    assert_eq!(
        labels,
        vec!["Current password", "New password", "Confirm new password"]
    );
    assert_eq!(form.submit.label, "Change password");

    browser.fill("Current password", PASSWORD).unwrap();
    browser.fill("New password", NEW_PASSWORD).unwrap();
    browser.fill("Confirm new password", NEW_PASSWORD).unwrap();
    browser.click("Change password").await.unwrap();

    assert_eq!(browser.url(), "/");
    assert!(browser.session().is_authenticated());

    // The new password is the one the API accepts from now on.
    let mut other = self::browser(&api, Arc::new(MemoryStorage::new()));
    login(&mut other, &email, PASSWORD).await;
    assert_eq!(other.url(), "/login");
    assert_eq!(alert_messages(&other), vec!["Incorrect email or password"]);

    login(&mut other, &email, NEW_PASSWORD).await;
    assert_eq!(other.url(), "/");
}

#[tokio::test]
async fn wrong_current_password_keeps_session() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let mut browser = browser(&api, Arc::new(MemoryStorage::new()));
    let email = unique_email();

    register(&mut browser, &email).await;
    login(&mut browser, &email, PASSWORD).await;

    browser.goto("/change-password").await.unwrap();
    browser.fill("Current password", "not-my-password").unwrap();
    browser.fill("New password", NEW_PASSWORD).unwrap();
    browser.fill("Confirm new password", NEW_PASSWORD).unwrap();
    browser.click("Change password").await.unwrap();

    assert_eq!(browser.url(), "/change-password");
    assert_eq!(alert_messages(&browser), vec!["Incorrect password"]);
    assert!(browser.session().is_authenticated());
}

#[tokio::test]
async fn rejected_token_on_page_load_forces_logout() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let storage = Arc::new(MemoryStorage::new());
    let mut browser = browser(&api, storage.clone());
    browser.auth().login("not-a-real-token").unwrap();

    browser.goto("/").await.unwrap();

    assert_eq!(browser.url(), "/login");
    assert_eq!(browser.session(), Session::anonymous());
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn rejected_token_on_submit_forces_logout() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let storage = Arc::new(MemoryStorage::new());
    let mut browser = browser(&api, storage.clone());

    // The guard only checks for a token; the API is the one that rejects it.
    browser.auth().login("not-a-real-token").unwrap();
    browser.goto("/change-password").await.unwrap();
    assert_eq!(browser.url(), "/change-password");

    browser.fill("Current password", PASSWORD).unwrap();
    browser.fill("New password", NEW_PASSWORD).unwrap();
    browser.fill("Confirm new password", NEW_PASSWORD).unwrap();
    browser.click("Change password").await.unwrap();

    assert_eq!(browser.url(), "/login");
    assert_eq!(browser.session(), Session::anonymous());
    assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn expired_token_forces_logout_after_login() {
    let api = spawn_api(Duration::ZERO).await;
    let mut browser = browser(&api, Arc::new(MemoryStorage::new()));
    let email = unique_email();

    register(&mut browser, &email).await;
    login(&mut browser, &email, PASSWORD).await;

    // Login succeeded, but the home page's account lookup is already rejected.
    assert_eq!(browser.url(), "/login");
    assert_eq!(browser.session(), Session::anonymous());
}

#[tokio::test]
async fn login_failure_does_not_redirect() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let mut browser = browser(&api, Arc::new(MemoryStorage::new()));

    login(&mut browser, &unique_email(), PASSWORD).await;

    assert_eq!(browser.url(), "/login");
    assert_eq!(alert_messages(&browser), vec!["Incorrect email or password"]);
    assert_eq!(browser.context().history.entries(), vec!["/login"]);
}

#[tokio::test]
async fn duplicate_registration_shows_detail() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let mut browser = browser(&api, Arc::new(MemoryStorage::new()));
    let email = unique_email();

    register(&mut browser, &email).await;

    browser.goto("/register").await.unwrap();
    browser.fill("Email", &email).unwrap();
    browser.fill("Password", PASSWORD).unwrap();
    browser.fill("Confirm password", PASSWORD).unwrap();
    browser.click("Register").await.unwrap();

    assert_eq!(browser.url(), "/register");
    assert_eq!(alert_messages(&browser), vec!["Email already registered"]);
}

#[tokio::test]
async fn session_survives_a_new_browser_context() {
    let api = spawn_api(server::DEFAULT_TOKEN_TTL).await;
    let dir = std::env::temp_dir().join(format!("superimpress-e2e-{}", Ulid::new()));
    let path = dir.join("storage.json");
    let email = unique_email();

    {
        let mut first = browser(&api, Arc::new(FileStorage::new(&path)));
        register(&mut first, &email).await;
        login(&mut first, &email, PASSWORD).await;
        assert_eq!(first.url(), "/");
    }

    // First navigation of a fresh context already sees the persisted session.
    let mut second = browser(&api, Arc::new(FileStorage::new(&path)));
    assert!(second.session().is_authenticated());
    second.goto("/change-password").await.unwrap();
    assert_eq!(second.url(), "/change-password");

    second.goto("/").await.unwrap();
    second.click("Log out").await.unwrap();
    assert_eq!(second.url(), "/login");

    let third = browser(&api, Arc::new(FileStorage::new(&path)));
    assert_eq!(third.session(), Session::anonymous());

    let _ = std::fs::remove_dir_all(dir);
}
