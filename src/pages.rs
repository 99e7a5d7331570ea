//! Askama templates for the server-rendered pages

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::{Principal, ProviderKind};

/// Wrapper rendering a template as an HTML response.
///
/// A render failure logs the error and answers 500 rather than panicking.
pub struct HtmlPage<T: Template>(pub T);

impl<T: Template> IntoResponse for HtmlPage<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Template rendering error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// One login link on the index and login pages
pub struct ProviderLink {
    pub display_name: &'static str,
    pub login_page: String,
}

impl ProviderLink {
    /// Links for all supported providers, in registration order
    pub fn all() -> Vec<ProviderLink> {
        ProviderKind::ALL
            .iter()
            .map(|kind| ProviderLink {
                display_name: kind.display_name(),
                login_page: format!("/login_{}", kind.route_suffix()),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub signed_in: bool,
    pub greeting: String,
    pub providers: Vec<ProviderLink>,
}

impl IndexTemplate {
    pub fn new(user: Option<&Principal>) -> Self {
        let greeting = match user {
            Some(principal) => {
                let name = principal
                    .display_name
                    .as_deref()
                    .unwrap_or(&principal.provider_user_id);
                format!("Signed in as {} via {}.", name, principal.provider)
            }
            None => String::new(),
        };

        Self {
            signed_in: user.is_some(),
            greeting,
            providers: ProviderLink::all(),
        }
    }
}

#[derive(Template)]
#[template(path = "login_index.html")]
pub struct LoginIndexTemplate {
    pub providers: Vec<ProviderLink>,
}

impl LoginIndexTemplate {
    pub fn new() -> Self {
        Self {
            providers: ProviderLink::all(),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub provider_name: &'static str,
    pub start_url: String,
}

impl LoginTemplate {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            provider_name: kind.display_name(),
            start_url: format!("/login/{}", kind.as_str()),
        }
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub provider_name: &'static str,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub picture: String,
}

impl ProfileTemplate {
    pub fn new(kind: ProviderKind, principal: &Principal) -> Self {
        Self {
            provider_name: kind.display_name(),
            user_id: principal.provider_user_id.clone(),
            display_name: principal.display_name.clone().unwrap_or_default(),
            email: principal.email.clone().unwrap_or_default(),
            picture: principal.picture.clone().unwrap_or_default(),
        }
    }
}
