//! OpenAPI doc generation.

use crate::{
    error::AppError,
    extract::session_addon::SessionAddon,
    routes::{applications, health, ping},
};
use jobtrail_core::{
    common::{DeletedResponse, SuccessResponse},
    ApplicationInput, ApplicationRecord, ApplicationStatus, CompanyCounts, SearchTerms,
};
use utoipa::OpenApi;

/// API documentation generator.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck,
        ping::get,
        applications::list,
        applications::create,
        applications::delete_all,
        applications::company_counts,
        applications::get_one,
        applications::update,
        applications::delete_one,
    ),
    components(
        schemas(
            AppError,
            ApplicationRecord,
            ApplicationInput,
            ApplicationStatus,
            CompanyCounts,
            SearchTerms,
            SuccessResponse,
            DeletedResponse,
            health::HealthcheckResponse
        )
    ),
    modifiers(&SessionAddon),
)]

/// Tied to OpenAPI documentation.
#[derive(Debug)]
pub struct ApiDoc;
