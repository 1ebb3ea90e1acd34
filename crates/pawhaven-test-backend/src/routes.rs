use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};
use pawhaven_shared::{
    req_args::LoginReqArgs,
    uac::{AuthError, LoginData, LoginResponse, RolesResponse, ShelterResponse, UserSummary},
};
use secrecy::ExposeSecret as _;
use std::time::Duration;

use crate::{
    scenario::{LoginBehavior, RolesBehavior, ShelterBehavior},
    state::{BackendState, RecordedRequest},
};

/// Sample protected resource, standing in for any page's data
#[derive(Debug, serde::Serialize)]
struct Pet {
    id: u64,
    name: &'static str,
}

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .route("/auth/login", web::post().to(login))
        .route("/userrole/role/{id}/roles", web::get().to(user_roles))
        .route("/shelter/user/{id}", web::get().to(shelter_for_user))
        .route("/pets", web::get().to(pets));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[tracing::instrument(skip(req_args, state), fields(email = %req_args.email))]
async fn login(
    req: HttpRequest,
    web::Json(req_args): web::Json<LoginReqArgs>,
    state: web::Data<BackendState>,
) -> HttpResponse {
    let authorization = record(&req, &state);
    debug_assert!(authorization.is_none(), "login must not carry a token");
    let Some(user) =
        state.find_by_credentials(&req_args.email, req_args.password.expose_secret())
    else {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "message": AuthError::InvalidEmailOrPassword.to_string()
        }));
    };
    if matches!(user.login, LoginBehavior::MissingData) {
        return HttpResponse::Ok().json(LoginResponse { data: None });
    }
    let token = state.issue_token(&user);
    HttpResponse::Ok().json(LoginResponse {
        data: Some(LoginData {
            user: UserSummary {
                id: user.id.into(),
                username: user.username,
            },
            token: token.into(),
        }),
    })
}

#[tracing::instrument(skip(req, state))]
async fn user_roles(
    req: HttpRequest,
    path: web::Path<u64>,
    state: web::Data<BackendState>,
) -> HttpResponse {
    let authorization = record(&req, &state);
    if state.authenticate(authorization.as_deref()).is_none() {
        return unauthorized();
    }
    let Some(user) = state.find_by_id(path.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    if let Some(delay) = user.roles_delay {
        tokio::time::sleep(delay).await;
    }
    match user.roles {
        RolesBehavior::Roles(roles) => HttpResponse::Ok().json(RolesResponse { roles: Some(roles) }),
        RolesBehavior::Null => HttpResponse::Ok().json(RolesResponse::default()),
        RolesBehavior::NotFound => HttpResponse::NotFound().finish(),
        RolesBehavior::ServerError => {
            HttpResponse::InternalServerError().body("role service unavailable")
        }
    }
}

#[tracing::instrument(skip(req, state))]
async fn shelter_for_user(
    req: HttpRequest,
    path: web::Path<u64>,
    state: web::Data<BackendState>,
) -> HttpResponse {
    let authorization = record(&req, &state);
    if state.authenticate(authorization.as_deref()).is_none() {
        return unauthorized();
    }
    let Some(user) = state.find_by_id(path.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    match user.shelter {
        ShelterBehavior::Found(id) => HttpResponse::Ok().json(ShelterResponse { id: id.into() }),
        ShelterBehavior::NotFound => HttpResponse::NotFound().finish(),
        ShelterBehavior::ServerError => {
            HttpResponse::InternalServerError().body("shelter service unavailable")
        }
    }
}

#[tracing::instrument(skip_all)]
async fn pets(req: HttpRequest, state: web::Data<BackendState>) -> HttpResponse {
    let authorization = record(&req, &state);
    // Slow enough for a test to change the session while this is in flight.
    // The token is checked after the delay
    if req.query_string().contains("slow") {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    if state.authenticate(authorization.as_deref()).is_none() {
        return unauthorized();
    }
    HttpResponse::Ok().json([Pet { id: 1, name: "Biscuit" }, Pet { id: 2, name: "Mochi" }])
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "message": AuthError::InvalidToken.to_string()
    }))
}

/// Records the request and returns its authorization header
fn record(req: &HttpRequest, state: &BackendState) -> Option<String> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .map(|x| x.to_string());
    state.record(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        authorization: authorization.clone(),
    });
    authorization
}
