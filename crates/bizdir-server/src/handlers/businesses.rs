//! Directory handlers (list, create, update, delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::Json;

use bizdir_core::Mutation;

use crate::error::ApiError;
use crate::schema::businesses::{
    BusinessDeletedResponse, BusinessListResponse, BusinessSavedResponse, MutationBody,
};
use crate::state::AppState;

/// Lists every business in the directory.
///
/// `GET /businesses`
pub async fn list_businesses(
    State(state): State<AppState>,
) -> Result<Json<BusinessListResponse>, ApiError> {
    let listing = state.service()?.list().await?;
    Ok(Json(BusinessListResponse {
        success: true,
        businesses: listing.collection,
        token: listing.token,
        last_updated: listing.last_updated,
    }))
}

/// Adds a business.
///
/// `POST /businesses`
pub async fn create_business(
    State(state): State<AppState>,
    body: Result<Json<MutationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<BusinessSavedResponse>), ApiError> {
    let service = state.service()?;
    let Json(body) = body.map_err(bad_json)?;

    let committed = service
        .execute(body.credential(), || {
            Ok(Mutation::Create {
                fields: body.business_data()?,
            })
        })
        .await?;

    let business = committed.value;
    Ok((
        StatusCode::CREATED,
        Json(BusinessSavedResponse {
            success: true,
            message: format!("Business \"{}\" added successfully", business.name()),
            business,
        }),
    ))
}

/// Replaces an existing business.
///
/// `PUT /businesses`
pub async fn update_business(
    State(state): State<AppState>,
    body: Result<Json<MutationBody>, JsonRejection>,
) -> Result<Json<BusinessSavedResponse>, ApiError> {
    let service = state.service()?;
    let Json(body) = body.map_err(bad_json)?;

    let committed = service
        .execute(body.credential(), || {
            Ok(Mutation::Update {
                id: body.business_id()?,
                fields: body.business_data()?,
            })
        })
        .await?;

    let business = committed.value;
    Ok(Json(BusinessSavedResponse {
        success: true,
        message: format!("Business \"{}\" updated successfully", business.name()),
        business,
    }))
}

/// Removes a business.
///
/// `DELETE /businesses`
pub async fn delete_business(
    State(state): State<AppState>,
    body: Result<Json<MutationBody>, JsonRejection>,
) -> Result<Json<BusinessDeletedResponse>, ApiError> {
    let service = state.service()?;
    let Json(body) = body.map_err(bad_json)?;

    let committed = service
        .execute(body.credential(), || {
            Ok(Mutation::Delete {
                id: body.business_id()?,
            })
        })
        .await?;

    let deleted = committed.value;
    Ok(Json(BusinessDeletedResponse {
        success: true,
        message: format!("Business \"{}\" deleted successfully", deleted.name()),
        deleted_business: deleted,
    }))
}

/// Fallback for methods a route does not serve.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!("method {} not allowed", method))
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}
