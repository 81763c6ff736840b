use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use axum_extra::extract::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cppd_accounts::client::{ApiRequest, Navigation, ReqwestTransport, RoleSelectionFlow, SessionClient};
use cppd_accounts::middleware::{AuthState, SessionAuthConfig, auth_routes, route_guard};
use cppd_accounts::{IssuerClient, IssuerConfig, Role};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forge_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

fn bundle(access: &str, refresh: &str, selected: Option<&str>) -> Value {
    json!({
        "data": {
            "accessToken": access,
            "expiresIn": "15m",
            "refreshToken": refresh,
            "refreshExpiresIn": "7d",
            "roles": ["DOCENTE", "CPPD_MEMBER"],
            "selectedRole": selected,
            "needsProfileSelection": selected.is_none(),
            "firstAccess": false
        }
    })
}

async fn mount_issuer(server: &MockServer, after_select: &str, after_refresh: &str) {
    let at_login = forge_token(&json!({"roles": ["DOCENTE", "CPPD_MEMBER"], "selectedRole": null}));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"identifier": "ana@uni.br", "secret": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&at_login, "r1", None)))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/select-role"))
        .and(body_json(json!({"refreshToken": "r1", "role": "CPPD_MEMBER"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(bundle(after_select, "r2", Some("CPPD_MEMBER"))),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "r2"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(bundle(after_refresh, "r3", Some("CPPD_MEMBER"))),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Pages and one API route that only accepts `accepted` as access credential.
fn app(state: AuthState, accepted: String) -> Router {
    let evaluations = get(move |jar: CookieJar| {
        let accepted = accepted.clone();
        async move {
            match jar.get("accessToken") {
                Some(cookie) if cookie.value() == accepted => (StatusCode::OK, "evaluations"),
                _ => (StatusCode::UNAUTHORIZED, "expired"),
            }
        }
    });

    Router::new()
        .route("/login", get(|| async { "login page" }))
        .route("/cppd", get(|| async { "committee area" }))
        .route("/forbidden", get(|| async { "forbidden page" }))
        .route("/api/evaluations", evaluations)
        .merge(auth_routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(state, route_guard))
}

#[tokio::test]
async fn login_select_role_refresh_and_logout() {
    let issuer = MockServer::start().await;
    let after_select = forge_token(&json!({
        "roles": ["DOCENTE", "CPPD_MEMBER"],
        "selectedRole": "CPPD_MEMBER",
        "v": 2
    }));
    let after_refresh = forge_token(&json!({
        "roles": ["DOCENTE", "CPPD_MEMBER"],
        "selectedRole": "CPPD_MEMBER",
        "v": 3
    }));
    mount_issuer(&issuer, &after_select, &after_refresh).await;

    let issuer_config = IssuerConfig::new(format!("{}/auth", issuer.uri()).parse().unwrap()).unwrap();
    let state = AuthState::new(
        SessionAuthConfig::new(IssuerClient::new(issuer_config)).with_secure_cookies(false),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = app(state, after_refresh.clone());
    tokio::spawn(async move {
        axum::serve(listener, server).await.unwrap();
    });

    let transport = ReqwestTransport::new(format!("http://{addr}").parse().unwrap()).unwrap();
    let client = SessionClient::new(transport);

    // Unauthenticated visit bounces to login.
    let response = client.guarded_fetch(ApiRequest::get("/cppd")).await.unwrap();
    assert_eq!(response.text(), "login page");

    // Multi-role login lands on the selection screen.
    let Navigation::RoleSelection(draft) = client.login("ana@uni.br", "pw").await.unwrap() else {
        panic!("expected role selection");
    };
    let flow = RoleSelectionFlow::enter(Some(draft)).unwrap();
    let next = flow.choose(&client, Role::CppdMember).await.unwrap();
    assert_eq!(next, Navigation::Landing("/cppd"));

    let response = client.guarded_fetch(ApiRequest::get("/cppd")).await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "committee area");

    // The API rejects the current credential once; one refresh fixes it.
    let response = client
        .guarded_fetch(ApiRequest::get("/api/evaluations"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "evaluations");

    assert_eq!(client.landing().await.unwrap(), "/cppd");

    client.logout().await.unwrap();
    let response = client.guarded_fetch(ApiRequest::get("/cppd")).await.unwrap();
    assert_eq!(response.text(), "login page");
}
