//! `GET|POST /protein/create_new_protein/`

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};

use super::page::{render, Notice, ProteinForm};
use crate::error::AppError;
use crate::features::proteins::commands::{create, CreateProteinCommand};
use crate::features::{route_with_slash, FeatureState};

pub fn forms_routes() -> Router<FeatureState> {
    route_with_slash(
        Router::new(),
        "/protein/create_new_protein",
        get(show_form).post(submit_form),
    )
}

/// Render the page with `status`, or a bare 500 when the template fails
fn page(status: StatusCode, form: &ProteinForm, notice: Option<&Notice>) -> Response {
    match render(form, notice) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to render protein form");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render form").into_response()
        },
    }
}

async fn show_form() -> Response {
    page(StatusCode::OK, &ProteinForm::default(), None)
}

/// Create a protein without domain assignments, reusing a matching organism
#[tracing::instrument(skip(state, form))]
async fn submit_form(
    State(state): State<FeatureState>,
    form: Result<Form<ProteinForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let notice = Notice::Error(rejection.body_text());
            return page(StatusCode::BAD_REQUEST, &ProteinForm::default(), Some(&notice));
        },
    };

    let payload = match form.to_payload() {
        Ok(payload) => payload,
        Err(message) => {
            return page(StatusCode::BAD_REQUEST, &form, Some(&Notice::Error(message)));
        },
    };

    let command = CreateProteinCommand {
        payload,
        reuse_existing_organism: true,
    };

    match create::handle(state.store, command).await {
        Ok(aggregate) => {
            let notice = Notice::Success(format!(
                "Protein {} created successfully",
                aggregate.protein_id
            ));
            page(StatusCode::OK, &ProteinForm::default(), Some(&notice))
        },
        Err(err) => {
            let err = AppError::from(err);
            let (status, message) = if err.status() == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = %err, "Protein form submission failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create protein".to_string())
            } else {
                (StatusCode::BAD_REQUEST, format!("Failed to create protein: {}", err))
            };
            page(status, &form, Some(&Notice::Error(message)))
        },
    }
}
