use axum::{
    routing::{get, post, put},
    Router,
};
use learnhub_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::rate_limit,
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool)?;

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // Unauthenticated entry points plus the chat proxy share the tighter
    // open-traffic budget.
    let open_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/auth/forgot-password",
            post(routes::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password/:token",
            post(routes::auth::reset_password),
        )
        .route(
            "/api/auth/send-verification",
            post(routes::auth::send_verification),
        )
        .route(
            "/api/auth/verify-email/:token",
            get(routes::auth::verify_email),
        )
        .route("/api/chat", post(routes::chat::chat))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.open_rps),
            rate_limit::rps_middleware,
        ));

    let platform_api = Router::new()
        .route(
            "/api/users/me",
            get(routes::users::get_me).patch(routes::users::update_me),
        )
        .route("/api/users/:id", get(routes::users::get_public_profile))
        .route(
            "/api/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route(
            "/api/courses/enrolled/me",
            get(routes::courses::my_enrolled_courses),
        )
        .route(
            "/api/courses/:id",
            get(routes::courses::get_course)
                .put(routes::courses::update_course)
                .delete(routes::courses::delete_course),
        )
        .route("/api/courses/:id/enroll", post(routes::courses::enroll))
        .route(
            "/api/courses/:id/reviews",
            get(routes::courses::list_reviews).post(routes::courses::create_review),
        )
        .route(
            "/api/courses/:id/modules",
            get(routes::modules::list_modules).post(routes::modules::create_module),
        )
        .route(
            "/api/courses/:id/quizzes",
            post(routes::quizzes::create_quiz_for_course),
        )
        .route(
            "/api/modules/:id",
            get(routes::modules::get_module)
                .put(routes::modules::update_module)
                .delete(routes::modules::delete_module),
        )
        .route(
            "/api/modules/:id/lessons",
            get(routes::modules::list_lessons).post(routes::modules::create_lesson),
        )
        .route(
            "/api/lessons/:id",
            get(routes::lessons::get_lesson)
                .put(routes::lessons::update_lesson)
                .delete(routes::lessons::delete_lesson),
        )
        .route(
            "/api/lessons/:id/quizzes",
            post(routes::lessons::create_quiz_for_lesson),
        )
        .route(
            "/api/quizzes/:id",
            get(routes::quizzes::get_quiz)
                .put(routes::quizzes::update_quiz)
                .delete(routes::quizzes::delete_quiz),
        )
        .route("/api/quizzes/:id/full", get(routes::quizzes::get_quiz_full))
        .route(
            "/api/quizzes/:id/questions",
            post(routes::quizzes::add_question),
        )
        .route(
            "/api/quizzes/:id/questions/:question_id",
            put(routes::quizzes::update_question).delete(routes::quizzes::delete_question),
        )
        .route("/api/quizzes/:id/submit", post(routes::quizzes::submit_quiz))
        .route(
            "/api/quizzes/:id/result/:submission_id",
            get(routes::quizzes::get_submission_result),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.api_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(open_api)
        .merge(platform_api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = TcpListener::bind(&config.server_address).await?;
    info!("listening on {}", config.server_address);
    axum::serve(listener, app).await?;
    Ok(())
}
