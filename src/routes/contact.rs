use axum::{Json, extract::State, extract::rejection::JsonRejection};
use portfolio_shared::{ContactSubmission, SuccessBody};

use crate::{error::AppError, routes::AppState};

/// POST /api/contact - relay a contact submission as one outbound email
pub async fn action(
    State(app_state): State<AppState>,
    input: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<SuccessBody>, AppError> {
    let Json(submission) = input?;

    app_state.contact_command.submit(submission).await?;

    Ok(Json(SuccessBody::ok()))
}
