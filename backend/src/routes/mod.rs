//! Route definitions for the Ferreteria Management System

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth routes (login/refresh public, the rest behind the token)
        .nest("/auth", auth_routes())
        // Protected routes - product catalog and stock
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/stock-movements", movement_routes())
        // Protected routes - sales
        .nest("/invoices", invoice_routes())
        .nest("/customers", customer_routes())
        // Protected routes - suppliers (admin only, checked per handler)
        .nest("/suppliers", supplier_routes())
        // Protected routes - stock reports and exports
        .nest("/reports", report_routes())
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes())
        // Protected routes - settings and preferences
        .nest("/settings", settings_routes())
        .nest("/preferences", preference_routes())
        // Protected routes - user administration
        .nest("/admin/users", user_admin_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(session_routes())
}

/// Session routes (protected)
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route("/logout", post(handlers::logout))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/low-stock", get(handlers::low_stock))
        .route("/metrics", get(handlers::inventory_metrics))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/stock", put(handlers::set_stock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock movement routes (protected)
fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route("/stats", get(handlers::invoice_stats))
        .route("/:invoice_id", get(handlers::get_invoice))
        .route("/:invoice_id/status", put(handlers::update_invoice_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/:customer_id/stats", get(handlers::customer_stats))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route("/:supplier_id/products", get(handlers::supplier_products))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock report and export routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stock",
            get(handlers::list_stock_reports).post(handlers::create_stock_report),
        )
        .route("/stock/:report_id", get(handlers::get_stock_report))
        .route(
            "/stock/:report_id/status",
            put(handlers::update_stock_report_status),
        )
        .route("/inventory", get(handlers::inventory_report))
        .route("/sales", get(handlers::sales_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// System settings routes (protected)
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// User preference routes (protected)
fn preference_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// User administration routes (protected, admin checked in the service)
fn user_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/update-password", post(handlers::update_password))
        .route(
            "/:user_id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
