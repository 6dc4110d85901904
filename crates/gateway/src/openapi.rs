//! OpenAPI documentation.

use utoipa::{
    openapi::security::{
        Flow, HttpAuthScheme, HttpBuilder, OAuth2, Password, Scopes, SecurityScheme,
    },
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{LoginRequest, RegisterRequest, TokenResponse};
use crate::handlers::category_handler::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth};
use crate::handlers::product_handler::{CreateProductRequest, UpdateProductRequest};
use crate::handlers::user_handler::UpdateUserRequest;
use domain::{Category, Product, UserResponse};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::user_handler::get_current_user,
        crate::handlers::user_handler::update_current_user,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::category_handler::list_categories,
        crate::handlers::category_handler::get_category,
        crate::handlers::category_handler::list_category_products,
        crate::handlers::category_handler::create_category,
        crate::handlers::category_handler::update_category,
        crate::handlers::category_handler::delete_category,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::create_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceHealth,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            UpdateUserRequest,
            Category,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            Product,
            CreateProductRequest,
            UpdateProductRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and dependency checks"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Own profile and user administration"),
        (name = "Categories", description = "Category catalog"),
        (name = "Products", description = "Product catalog"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "oauth2_password",
                SecurityScheme::OAuth2(OAuth2::new([Flow::Password(Password::new(
                    "/api/v1/auth/login",
                    Scopes::new(),
                ))])),
            );
        }
    }
}
