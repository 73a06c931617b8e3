//! Application wiring: shared state plus the route, gate, resolver and error
//! page tables, all registered here at startup.

use actix_web::web;
use std::sync::Arc;

use common::Item;

use crate::config::AppConfig;
use crate::db::{ItemRepository, MemberRepository};
use crate::dispatch::{ErrorPages, ViewCatalog, DEFAULT_ERROR_PATH};
use crate::error::Result;
use crate::handlers;
use crate::messages::MessageSource;
use crate::middleware::{LogGate, LoginCheckGate};
use crate::pipeline::{
    DispatchKind, Dispatcher, GateChain, GateRegistration, RouteTable, WebRequest, WebResponse,
};
use crate::resolver::{ExceptionHandlers, IllegalArgumentResolver, ResolverChain, UserResolver};
use crate::session::SessionStore;

type StateHandler = fn(&AppState, &mut WebRequest, &mut WebResponse) -> Result<()>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub members: MemberRepository,
    pub items: ItemRepository,
    pub messages: Arc<MessageSource>,
    pub views: Arc<ViewCatalog>,
}

impl AppState {
    pub fn new(config: AppConfig, messages: MessageSource, views: ViewCatalog) -> Self {
        Self {
            sessions: SessionStore::new(config.session_timeout()),
            config: Arc::new(config),
            members: MemberRepository::new(),
            items: ItemRepository::new(),
            messages: Arc::new(messages),
            views: Arc::new(views),
        }
    }

    /// Loads messages and views from the configured locations.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let messages = match &config.views.messages_path {
            Some(path) if path.exists() => MessageSource::load(path)?,
            Some(path) => {
                log::warn!(
                    "Messages file '{}' not found, using built-in messages",
                    path.display()
                );
                MessageSource::default()
            }
            None => MessageSource::default(),
        };
        log::info!("Loaded {} messages", messages.len());

        let views = ViewCatalog::load(
            config.views.templates_dir.as_deref(),
            config.views.static_dir.as_deref(),
        )?;

        Ok(Self::new(config, messages, views))
    }

    /// Demo data: member `test` / `test!` and two items.
    pub fn seed(&self) -> Result<()> {
        self.members
            .register("test", "Tester", "test!", self.config.login.password_cost)?;
        self.items.save(Item::new("itemA", 10_000, 10));
        self.items.save(Item::new("itemB", 20_000, 20));

        log::info!("Seeded {} members", self.members.count());
        Ok(())
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}

fn bind(
    state: &AppState,
    handler: StateHandler,
) -> impl Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync + 'static {
    let state = state.clone();
    move |req: &mut WebRequest, res: &mut WebResponse| handler(&state, req, res)
}

pub fn routes(state: &AppState) -> RouteTable {
    let login_path = state.config.login.login_path.as_str();

    RouteTable::new()
        // login
        .get("/", "home", bind(state, handlers::home::home))
        .get(login_path, "loginForm", bind(state, handlers::auth::login_form))
        .post(login_path, "login", bind(state, handlers::auth::login))
        .post("/logout", "logout", bind(state, handlers::auth::logout))
        .get("/session-info", "sessionInfo", bind(state, handlers::home::session_info))
        .get("/members/add", "addMemberForm", bind(state, handlers::members::add_form))
        .post("/members/add", "addMember", bind(state, handlers::members::add))
        // exceptions
        .get("/error-ex", "errorEx", bind(state, handlers::api::error_ex))
        .get("/error-404", "error404", bind(state, handlers::api::error_404))
        .get("/error-500", "error500", bind(state, handlers::api::error_500))
        .get("/api/members/{id}", "getMember", bind(state, handlers::api::get_member))
        .get(
            "/api/response-status-ex1",
            "responseStatusEx1",
            bind(state, handlers::api::response_status_ex1),
        )
        .get(
            "/api/response-status-ex2",
            "responseStatusEx2",
            bind(state, handlers::api::response_status_ex2),
        )
        .get(
            "/api/default-handler-ex",
            "defaultHandlerEx",
            bind(state, handlers::api::default_handler_ex),
        )
        // conversion
        .get("/hello-v2", "helloV2", bind(state, handlers::convert::hello_v2))
        .get("/ip-port", "ipPort", bind(state, handlers::convert::ip_port))
        .get("/number-format", "numberFormat", bind(state, handlers::convert::number_format))
        // upload
        .get("/servlet/v2/upload", "newFile", bind(state, handlers::upload::new_file))
        .post("/servlet/v2/upload", "saveFile", bind(state, handlers::upload::save_file))
        // validation
        .post(
            "/validation/api/items/add",
            "addItem",
            bind(state, handlers::validation::add_item),
        )
        .get("/health", "health", bind(state, handlers::health::health_check))
        // error paths
        .any(DEFAULT_ERROR_PATH, "basicError", bind(state, handlers::error_page::basic_error))
        .any("/error-page/404", "errorPage404", bind(state, handlers::error_page::error_page_404))
        .any("/error-page/500", "errorPage500", bind(state, handlers::error_page::error_page_500))
}

pub fn error_pages(state: &AppState) -> ErrorPages {
    ErrorPages::from_config(&state.config.error_pages)
}

pub fn gates(state: &AppState, error_pages: &ErrorPages) -> GateChain {
    let login = &state.config.login;
    let mut excluded = error_pages.paths();
    excluded.push("/error-page/*");

    GateChain::new()
        .register(
            GateRegistration::new(LogGate)
                .exclude(&["/css/*", "/*.ico"])
                .dispatch_kinds(&[DispatchKind::Request, DispatchKind::Error]),
        )
        .register(
            GateRegistration::new(
                LoginCheckGate::new(state.sessions.clone(), state.cookie_name(), &login.login_path)
                    .redirect_param(&login.redirect_param)
                    .whitelist(&login.whitelist),
            )
            .include(&["/*"])
            .exclude(&excluded),
        )
}

/// Built-in resolvers first; custom ones are appended, never put in front.
///
/// With the API handlers on, `IllegalArgument` and `User` failures never
/// reach the appended resolvers.
pub fn resolvers(state: &AppState) -> ResolverChain {
    let exceptions = &state.config.exceptions;

    let mut handlers = if exceptions.api_handlers {
        ExceptionHandlers::api_defaults()
    } else {
        ExceptionHandlers::new()
    };
    if exceptions.catch_all {
        handlers = handlers.with_catch_all();
    }

    ResolverChain::with_defaults(handlers, Arc::clone(&state.messages))
        .extend(IllegalArgumentResolver)
        .extend(UserResolver)
}

pub fn build_dispatcher(state: &AppState) -> Dispatcher {
    let error_pages = error_pages(state);

    Dispatcher::new(
        routes(state),
        gates(state, &error_pages),
        resolvers(state),
        error_pages,
        Arc::clone(&state.views),
    )
    .with_payload_limit(state.config.upload.max_request_size)
}

/// Dispatcher ready to hand to [`crate::pipeline::boundary::configure`].
pub fn dispatcher_data(state: &AppState) -> web::Data<Dispatcher> {
    web::Data::new(build_dispatcher(state))
}
