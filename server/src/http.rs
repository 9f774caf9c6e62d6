use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{self, HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult, Empty, Envelope};
use platform_db::DbPool;
use products_hr::{
    Department, Employee, EmployeeChanges, EmployeeDraft, HrError, HrModule, PageResult,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub hr: HrModule,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(addr = %config.addr, "hr admin listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/departments", get(departments_handler))
        .route("/employees", get(employees_handler))
        .route("/emp", post(create_employee_handler))
        .route(
            "/emp/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employees_handler),
        )
        .route("/checkUser", get(check_user_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct DepartmentsPayload {
    departments: Vec<Department>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PagePayload {
    page_info: PageResult<Employee>,
}

#[derive(Serialize)]
struct EmployeePayload {
    emp: Option<Employee>,
}

#[derive(Deserialize)]
struct PageQuery {
    pn: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckUserQuery {
    emp_name: String,
}

async fn departments_handler(State(state): State<AppState>) -> ApiResult<DepartmentsPayload> {
    let departments = state.hr.departments.list().await.map_err(hr_error)?;
    Ok(Envelope::success(DepartmentsPayload { departments }))
}

async fn employees_handler(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<PagePayload> {
    let Query(query) = query?;
    let page_info = state.hr.employees.list(query.pn).await.map_err(hr_error)?;
    Ok(Envelope::success(PagePayload { page_info }))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<EmployeePayload> {
    let Path(id) = id?;
    let emp = state.hr.employees.get(id).await.map_err(hr_error)?;
    Ok(Envelope::success(EmployeePayload { emp }))
}

async fn create_employee_handler(
    State(state): State<AppState>,
    body: Result<Json<EmployeeDraft>, JsonRejection>,
) -> ApiResult<Empty> {
    let Json(draft) = body?;
    state.hr.employees.create(draft).await.map_err(hr_error)?;
    Ok(Envelope::ok())
}

async fn update_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<EmployeeChanges>, JsonRejection>,
) -> ApiResult<Empty> {
    let Path(id) = id?;
    let Json(changes) = body?;
    state
        .hr
        .employees
        .update(id, changes)
        .await
        .map_err(hr_error)?;
    Ok(Envelope::ok())
}

async fn delete_employees_handler(
    State(state): State<AppState>,
    ids: Result<Path<String>, PathRejection>,
) -> ApiResult<Empty> {
    let Path(ids) = ids?;
    state.hr.employees.delete(&ids).await.map_err(hr_error)?;
    Ok(Envelope::ok())
}

async fn check_user_handler(
    State(state): State<AppState>,
    query: Result<Query<CheckUserQuery>, QueryRejection>,
) -> ApiResult<Empty> {
    let Query(query) = query?;
    state
        .hr
        .employees
        .check_username(&query.emp_name)
        .await
        .map_err(hr_error)?;
    Ok(Envelope::ok())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = platform_db::ping(&state.pool).await;
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

fn hr_error(err: HrError) -> ApiError {
    match err {
        HrError::Validation(fields) => ApiError::invalid_fields(fields.iter()),
        HrError::UsernameUnavailable(rejection) => ApiError::Rejected(rejection.to_string()),
        HrError::MalformedIdentifier { .. } => ApiError::Rejected(err.to_string()),
        HrError::NotFound(_) => ApiError::NotFound(err.to_string()),
        HrError::Storage(source) => ApiError::internal(source),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use platform_db::{DatabaseSettings, HrStore, connect, seed_demo};
    use products_hr::PageSettings;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router(employees: u32) -> Router {
        let pool = connect(&DatabaseSettings::new("sqlite::memory:", 1))
            .await
            .unwrap();
        Migrator::up(&pool, None).await.unwrap();
        seed_demo(&pool, employees).await.unwrap();
        let store = Arc::new(HrStore::new(pool.clone()));
        let config = Arc::new(AppConfig {
            database: DatabaseSettings::new("sqlite::memory:", 1),
            pages: PageSettings::default(),
            cors_allowed_origins: Vec::new(),
        });
        build_router(AppState {
            pool,
            hr: HrModule::new(store.clone(), store, config.pages),
            config,
        })
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_database() {
        let router = test_router(0).await;
        let (status, body) = call(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["dbOk"], json!(true));
    }

    #[tokio::test]
    async fn departments_are_enveloped() {
        let router = test_router(0).await;
        let (status, body) = call(&router, get("/departments")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(
            body["departments"],
            json!([{"id": 1, "name": "Development"}, {"id": 2, "name": "Testing"}])
        );
    }

    #[tokio::test]
    async fn employees_are_paged_with_departments() {
        let router = test_router(12).await;
        let (status, body) = call(&router, get("/employees?pn=3")).await;
        assert_eq!(status, StatusCode::OK);
        let page = &body["pageInfo"];
        assert_eq!(page["pageNum"], 3);
        assert_eq!(page["pages"], 3);
        assert_eq!(page["total"], 12);
        assert_eq!(page["list"].as_array().unwrap().len(), 2);
        assert_eq!(page["navigatepageNums"], json!([1, 2, 3]));
        assert!(page["list"][0]["department"]["name"].is_string());

        let (_, default_page) = call(&router, get("/employees")).await;
        assert_eq!(default_page["pageInfo"]["pageNum"], 1);
        assert_eq!(default_page["pageInfo"]["size"], 5);
    }

    #[tokio::test]
    async fn missing_employee_is_null_not_error() {
        let router = test_router(1).await;
        let (status, body) = call(&router, get("/emp/999")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "emp": null}));

        let (_, found) = call(&router, get("/emp/1")).await;
        assert_eq!(found["emp"]["name"], "staff_0001");
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let router = test_router(0).await;
        let draft = json!({
            "name": "grace_hopper",
            "gender": "F",
            "email": "grace@example.com",
            "departmentId": 1
        });
        let (status, body) = call(&router, with_json(Method::POST, "/emp", draft)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let (_, body) = call(&router, get("/emp/1")).await;
        assert_eq!(body["emp"]["email"], "grace@example.com");
        assert_eq!(body["emp"]["gender"], "F");
        assert_eq!(body["emp"]["departmentId"], 1);
    }

    #[tokio::test]
    async fn invalid_create_returns_error_fields() {
        let router = test_router(0).await;
        let draft = json!({"name": "", "email": "broken"});
        let (status, body) = call(&router, with_json(Method::POST, "/emp", draft)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["errorFields"]["name"], "Name is required");
        assert_eq!(body["errorFields"]["email"], "Email address is malformed");

        let (_, page) = call(&router, get("/employees")).await;
        assert_eq!(page["pageInfo"]["total"], 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_fail_envelope() {
        let router = test_router(0).await;
        let request = Request::post("/emp")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert!(body["reason"].is_string());
    }

    #[tokio::test]
    async fn update_overwrites_supplied_fields() {
        let router = test_router(1).await;
        let changes = json!({"email": "moved@example.com", "departmentId": 2});
        let (status, _) = call(&router, with_json(Method::PUT, "/emp/1", changes)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&router, get("/emp/1")).await;
        assert_eq!(body["emp"]["email"], "moved@example.com");
        assert_eq!(body["emp"]["departmentId"], 2);
        assert_eq!(body["emp"]["name"], "staff_0001");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let router = test_router(0).await;
        let changes = json!({"email": "ghost@example.com"});
        let (status, body) = call(&router, with_json(Method::PUT, "/emp/5", changes)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn delete_single_and_batch() {
        let router = test_router(6).await;
        let delete = |uri: &str| Request::delete(uri).body(Body::empty()).unwrap();

        let (status, body) = call(&router, delete("/emp/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let (status, _) = call(&router, delete("/emp/2-3-40")).await;
        assert_eq!(status, StatusCode::OK);

        let (_, page) = call(&router, get("/employees")).await;
        let ids: Vec<i64> = page["pageInfo"]["list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 5, 6]);

        let (status, body) = call(&router, delete("/emp/4-x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn undecodable_delete_path_is_a_fail_envelope() {
        let router = test_router(1).await;
        let request = Request::delete("/emp/%FF").body(Body::empty()).unwrap();
        let (status, body) = call(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert!(body["reason"].is_string());
    }

    #[tokio::test]
    async fn unknown_department_is_masked_as_internal() {
        let router = test_router(0).await;
        let draft = json!({
            "name": "orphan_hire",
            "email": "orphan@example.com",
            "departmentId": 99
        });
        let (status, body) = call(&router, with_json(Method::POST, "/emp", draft)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"status": "fail", "error": "internal server error"}));

        let (_, page) = call(&router, get("/employees")).await;
        assert_eq!(page["pageInfo"]["total"], 0);
    }

    #[tokio::test]
    async fn check_user_reports_reasons() {
        let router = test_router(1).await;

        let (status, body) = call(&router, get("/checkUser?empName=ab")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["reason"],
            "Name must be 6-16 letters, digits, '_' or '-', or 2-5 CJK characters"
        );

        let (status, body) = call(&router, get("/checkUser?empName=staff_0001")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "Name is already taken");

        let (status, body) = call(&router, get("/checkUser?empName=brand_new")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));
    }
}
