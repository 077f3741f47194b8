//! Application record routes.
//!
//! Every handler takes a [`Session`] first, so unauthenticated requests are
//! rejected before anything touches the record store.

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    extract::{json::Json, session::Session},
    setups::{RecordStore, ServerSetup},
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
};
use jobtrail_core::{
    common::{DeletedResponse, SuccessResponse},
    filter, ranking, ApplicationInput, ApplicationRecord, CompanyCounts, SearchTerms,
};

/// GET handler listing the caller's applications, ranked for display and
/// narrowed down by any search terms given.
#[utoipa::path(
    get,
    path = "/api/applications",
    params(SearchTerms),
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Ranked, filtered applications", body = [ApplicationRecord]),
        (status = 401, description = "Missing or invalid session", body = AppError),
    )
)]
pub async fn list<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
    query: Result<Query<SearchTerms>, QueryRejection>,
) -> AppResult<(StatusCode, Json<Vec<ApplicationRecord>>)> {
    let Query(terms) = query?;

    let records = state.record_store.find_all_by_owner(&session.owner).await?;
    let ranked = ranking::rank_owned(records);

    Ok((StatusCode::OK, Json(filter::filter_owned(ranked, &terms))))
}

/// POST handler creating an application.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplicationInput,
    security(("session_bearer" = [])),
    responses(
        (status = 201, description = "Created", body = ApplicationRecord),
        (status = 400, description = "Invalid field values", body = AppError),
        (status = 401, description = "Missing or invalid session", body = AppError),
    )
)]
pub async fn create<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
    Json(input): Json<ApplicationInput>,
) -> AppResult<(StatusCode, Json<ApplicationRecord>)> {
    let application = input.into_new_application()?;

    let record = state
        .record_store
        .create(&session.owner, application)
        .await?;

    tracing::info!(owner = %session.owner, id = %record.id, "Created application");

    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE handler removing all of the caller's applications.
#[utoipa::path(
    delete,
    path = "/api/applications",
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Removed", body = DeletedResponse),
        (status = 401, description = "Missing or invalid session", body = AppError),
    )
)]
pub async fn delete_all<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
) -> AppResult<(StatusCode, Json<DeletedResponse>)> {
    let deleted = state.record_store.delete_all(&session.owner).await?;

    tracing::info!(owner = %session.owner, deleted, "Deleted all applications");

    Ok((StatusCode::OK, Json(DeletedResponse { deleted })))
}

/// GET handler counting the caller's applications per company.
#[utoipa::path(
    get,
    path = "/api/applications/companies",
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Count per company", body = CompanyCounts),
        (status = 401, description = "Missing or invalid session", body = AppError),
    )
)]
pub async fn company_counts<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
) -> AppResult<(StatusCode, Json<CompanyCounts>)> {
    let records = state.record_store.find_all_by_owner(&session.owner).await?;

    Ok((StatusCode::OK, Json(CompanyCounts::tally(&records))))
}

/// GET handler for a single application.
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Found", body = ApplicationRecord),
        (status = 401, description = "Missing or invalid session", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    )
)]
pub async fn get_one<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<ApplicationRecord>)> {
    let record = state
        .record_store
        .find_one(&session.owner, &id)
        .await?
        .ok_or_else(|| AppError::not_found(&id))?;

    Ok((StatusCode::OK, Json(record)))
}

/// PUT handler changing the given fields of an application.
#[utoipa::path(
    put,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    request_body = ApplicationInput,
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Updated", body = ApplicationRecord),
        (status = 400, description = "Invalid field values", body = AppError),
        (status = 401, description = "Missing or invalid session", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    )
)]
pub async fn update<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
    Path(id): Path<String>,
    Json(input): Json<ApplicationInput>,
) -> AppResult<(StatusCode, Json<ApplicationRecord>)> {
    let changes = input.into_changes()?;

    let record = state
        .record_store
        .update(&session.owner, &id, changes)
        .await?
        .ok_or_else(|| AppError::not_found(&id))?;

    tracing::info!(owner = %session.owner, %id, "Updated application");

    Ok((StatusCode::OK, Json(record)))
}

/// DELETE handler for a single application.
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    security(("session_bearer" = [])),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid session", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    )
)]
pub async fn delete_one<S: ServerSetup>(
    State(state): State<AppState<S>>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<SuccessResponse>)> {
    if !state.record_store.delete(&session.owner, &id).await? {
        return Err(AppError::not_found(&id));
    }

    tracing::info!(owner = %session.owner, %id, "Deleted application");

    Ok((StatusCode::OK, Json(SuccessResponse { success: true })))
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ErrorResponse,
        test_utils::{route_builder::RouteBuilder, test_context::TestContext},
    };
    use assert_matches::assert_matches;
    use http::{Method, StatusCode};
    use jobtrail_core::{
        common::{DeletedResponse, SuccessResponse},
        date::is_canonical,
        ApplicationRecord, ApplicationStatus, CompanyCounts,
    };
    use serde_json::json;
    use testresult::TestResult;

    async fn create(
        ctx: &TestContext,
        token: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<ApplicationRecord> {
        let (status, record) = RouteBuilder::new(ctx.app(), Method::POST, "/api/applications")
            .with_session(token)
            .with_json_body(body)?
            .into_json_response::<ApplicationRecord>()
            .await?;

        assert_eq!(status, StatusCode::CREATED);
        Ok(record)
    }

    async fn list(
        ctx: &TestContext,
        token: &str,
        path: &str,
    ) -> anyhow::Result<Vec<ApplicationRecord>> {
        let (status, records) = RouteBuilder::new(ctx.app(), Method::GET, path)
            .with_session(token)
            .into_json_response::<Vec<ApplicationRecord>>()
            .await?;

        assert_eq!(status, StatusCode::OK);
        Ok(records)
    }

    fn companies(records: &[ApplicationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.company.as_str()).collect()
    }

    #[test_log::test(tokio::test)]
    async fn test_create_application() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(
            &ctx,
            &token,
            json!({ "date": "01.02.24", "company": "Acme", "position": "Engineer" }),
        )
        .await?;

        assert!(!record.id.is_empty());
        assert_eq!(record.owner_id.as_str(), "alice");
        assert_eq!(record.date, "01.02.2024");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.status, ApplicationStatus::NoAnswer);
        assert_eq!(record.remarks, "");
        assert_eq!(record.created_at, record.updated_at);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_expands_shorthand_date() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(&ctx, &token, json!({ "date": "0804" })).await?;
        assert!(is_canonical(&record.date), "{}", record.date);
        assert!(record.date.starts_with("08.04."));

        let record = create(&ctx, &token, json!({ "date": "sometime in may" })).await?;
        assert_eq!(record.date, "sometime in may");

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_rejects_unknown_status() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let (status, body) = RouteBuilder::new(ctx.app(), Method::POST, "/api/applications")
            .with_session(&token)
            .with_json_body(json!({ "company": "Acme", "status": "No Answer" }))?
            .into_json_response::<ErrorResponse>()
            .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_matches!(&body.errors[0].detail, Some(detail) if detail.contains("status"));
        assert!(list(&ctx, &token, "/api/applications").await?.is_empty());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_with_empty_status_takes_default() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(&ctx, &token, json!({ "company": "Acme", "status": "" })).await?;
        assert_eq!(record.status, ApplicationStatus::NoAnswer);

        let (status, updated) = RouteBuilder::new(
            ctx.app(),
            Method::PUT,
            format!("/api/applications/{}", record.id),
        )
        .with_session(&token)
        .with_json_body(json!({ "status": "", "position": "Engineer" }))?
        .into_json_response::<ApplicationRecord>()
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated.status, ApplicationStatus::NoAnswer);
        assert_eq!(updated.position, "Engineer");

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_rejects_malformed_json() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let (status, body) = RouteBuilder::new(ctx.app(), Method::POST, "/api/applications")
            .with_session(&token)
            .with_raw_body(mime::APPLICATION_JSON, "{ not json")
            .into_json_response::<ErrorResponse>()
            .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors[0].status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.store_accesses(), 0);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_list_is_ranked() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        for body in [
            json!({ "company": "a", "status": "rejected", "date": "01.01.2024" }),
            json!({ "company": "b", "status": "answered", "date": "01.01.2023" }),
            json!({ "company": "c", "status": "answered", "date": "05.05.2025" }),
            json!({ "company": "d", "status": "no-answer" }),
            json!({ "company": "e", "status": "no-answer", "date": "31.12.2019" }),
        ] {
            create(&ctx, &token, body).await?;
        }

        let records = list(&ctx, &token, "/api/applications").await?;

        assert_eq!(companies(&records), vec!["c", "b", "e", "d", "a"]);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_list_filters_after_ranking() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        for body in [
            json!({ "company": "Acme Corp", "status": "no-answer", "date": "01.01.2020" }),
            json!({ "company": "Globex", "status": "no-answer", "date": "01.01.2025" }),
            json!({ "company": "acme labs", "status": "answered", "date": "01.01.2021" }),
            json!({ "company": "ACME Inc", "status": "no-answer", "date": "01.01.2024" }),
        ] {
            create(&ctx, &token, body).await?;
        }

        let records = list(&ctx, &token, "/api/applications?company=acme").await?;
        assert_eq!(
            companies(&records),
            vec!["acme labs", "ACME Inc", "Acme Corp"]
        );

        let records = list(&ctx, &token, "/api/applications?company=acme&status=no-").await?;
        assert_eq!(companies(&records), vec!["ACME Inc", "Acme Corp"]);

        let records = list(&ctx, &token, "/api/applications?status=No%20Answer").await?;
        assert!(records.is_empty());

        let records = list(&ctx, &token, "/api/applications?date=&remarks=").await?;
        assert_eq!(records.len(), 4);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_owners_are_isolated() -> TestResult {
        let ctx = TestContext::new();
        let alice = ctx.login("alice");
        let bob = ctx.login("bob");

        let record = create(&ctx, &alice, json!({ "company": "Acme" })).await?;
        create(&ctx, &bob, json!({ "company": "Globex" })).await?;

        assert_eq!(companies(&list(&ctx, &alice, "/api/applications").await?), vec!["Acme"]);
        assert_eq!(companies(&list(&ctx, &bob, "/api/applications").await?), vec!["Globex"]);

        let path = format!("/api/applications/{}", record.id);

        let (status, _) = RouteBuilder::new(ctx.app(), Method::GET, &path)
            .with_session(&bob)
            .into_json_response::<ErrorResponse>()
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = RouteBuilder::new(ctx.app(), Method::PUT, &path)
            .with_session(&bob)
            .with_json_body(json!({ "company": "Hijacked" }))?
            .into_json_response::<ErrorResponse>()
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = RouteBuilder::new(ctx.app(), Method::DELETE, &path)
            .with_session(&bob)
            .into_json_response::<ErrorResponse>()
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, fetched) = RouteBuilder::new(ctx.app(), Method::GET, &path)
            .with_session(&alice)
            .into_json_response::<ApplicationRecord>()
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, record);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_id_is_not_found() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");
        let id = ulid::Ulid::new().to_string();

        let (status, body) =
            RouteBuilder::new(ctx.app(), Method::GET, format!("/api/applications/{id}"))
                .with_session(&token)
                .into_json_response::<ErrorResponse>()
                .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body.errors[0].detail,
            Some(format!("Application with id {id} not found"))
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_update_changes_given_fields_only() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(
            &ctx,
            &token,
            json!({ "company": "Acme", "position": "Engineer", "date": "01.01.2025" }),
        )
        .await?;

        let (status, updated) = RouteBuilder::new(
            ctx.app(),
            Method::PUT,
            format!("/api/applications/{}", record.id),
        )
        .with_session(&token)
        .with_json_body(json!({ "status": "answered", "date": "150623" }))?
        .into_json_response::<ApplicationRecord>()
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.status, ApplicationStatus::Answered);
        assert_eq!(updated.date, "15.06.2023");
        assert_eq!(updated.company, "Acme");
        assert_eq!(updated.position, "Engineer");
        assert_eq!(updated.created_at, record.created_at);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_invalid_update_leaves_record_alone() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(&ctx, &token, json!({ "company": "Acme" })).await?;
        let path = format!("/api/applications/{}", record.id);

        let (status, _) = RouteBuilder::new(ctx.app(), Method::PUT, &path)
            .with_session(&token)
            .with_json_body(json!({ "company": "Globex", "status": "ghosted" }))?
            .into_json_response::<ErrorResponse>()
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, fetched) = RouteBuilder::new(ctx.app(), Method::GET, &path)
            .with_session(&token)
            .into_json_response::<ApplicationRecord>()
            .await?;
        assert_eq!(fetched, record);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_one() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        let record = create(&ctx, &token, json!({ "company": "Acme" })).await?;
        let path = format!("/api/applications/{}", record.id);

        let (status, body) = RouteBuilder::new(ctx.app(), Method::DELETE, &path)
            .with_session(&token)
            .into_json_response::<SuccessResponse>()
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);

        let (status, _) = RouteBuilder::new(ctx.app(), Method::DELETE, &path)
            .with_session(&token)
            .into_json_response::<ErrorResponse>()
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_all_only_touches_own_records() -> TestResult {
        let ctx = TestContext::new();
        let alice = ctx.login("alice");
        let bob = ctx.login("bob");

        for company in ["a", "b", "c"] {
            create(&ctx, &alice, json!({ "company": company })).await?;
        }
        create(&ctx, &bob, json!({ "company": "d" })).await?;

        let (status, body) = RouteBuilder::new(ctx.app(), Method::DELETE, "/api/applications")
            .with_session(&alice)
            .into_json_response::<DeletedResponse>()
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DeletedResponse { deleted: 3 });
        assert!(list(&ctx, &alice, "/api/applications").await?.is_empty());
        assert_eq!(list(&ctx, &bob, "/api/applications").await?.len(), 1);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_company_counts() -> TestResult {
        let ctx = TestContext::new();
        let token = ctx.login("alice");

        for company in ["Acme", " acme ", "Globex", ""] {
            create(&ctx, &token, json!({ "company": company })).await?;
        }

        let (status, counts) =
            RouteBuilder::new(ctx.app(), Method::GET, "/api/applications/companies")
                .with_session(&token)
                .into_json_response::<CompanyCounts>()
                .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(counts.get("acme"), 2);
        assert_eq!(counts.get("globex"), 1);
        assert_eq!(counts.counts.len(), 2);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_unauthenticated_requests_never_reach_the_store() -> TestResult {
        let ctx = TestContext::new();
        let id = ulid::Ulid::new().to_string();
        let one = format!("/api/applications/{id}");

        let requests = [
            (Method::GET, "/api/applications".to_string()),
            (Method::POST, "/api/applications".to_string()),
            (Method::DELETE, "/api/applications".to_string()),
            (Method::GET, "/api/applications/companies".to_string()),
            (Method::GET, one.clone()),
            (Method::PUT, one.clone()),
            (Method::DELETE, one),
        ];

        for (method, path) in requests {
            for token in [None, Some("not-a-session")] {
                let mut builder = RouteBuilder::new(ctx.app(), method.clone(), path.as_str())
                    .with_json_body(json!({ "company": "Acme" }))?;
                if let Some(token) = token {
                    builder = builder.with_session(token);
                }

                let (status, body) = builder.into_json_response::<ErrorResponse>().await?;

                assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {path}");
                assert_eq!(body.errors[0].status(), StatusCode::UNAUTHORIZED);
            }
        }

        assert_eq!(ctx.store_accesses(), 0);

        Ok(())
    }
}
