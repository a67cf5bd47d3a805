use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Serialize;
use tera::{Context, Tera};

use crate::directory::QueryState;
use crate::domain::types::Category;
use crate::dto::main::{IndexPageData, IndexQuery, MemberModal};
use crate::forms::member::MemberForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::main::{load_index_page, query_state};
use crate::services::{ServiceError, member as member_service};

/// Query string parameters that keep the list where the user left it.
#[derive(Serialize)]
struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<usize>,
    /// Page count the list was rendered with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<usize>,
}

impl<'a> ListParams<'a> {
    fn new(search: &'a str, category: Option<Category>, page: Option<usize>) -> Self {
        Self {
            search: Some(search).filter(|s| !s.is_empty()),
            category: category.map(Category::as_str),
            page,
            pages: None,
        }
    }

    fn pages(mut self, pages: Option<usize>) -> Self {
        self.pages = pages;
        self
    }

    fn encode(&self) -> String {
        serde_html_form::to_string(self).unwrap_or_else(|err| {
            error!("Failed to encode list parameters: {err}");
            String::new()
        })
    }
}

fn requested_state(query: &IndexQuery) -> QueryState {
    query_state(
        query.search.as_deref(),
        query.category.as_deref(),
        query.page,
    )
}

/// `/` with the filters and page of `state`, bounded by `pages` when known.
fn index_location(state: &QueryState, pages: Option<usize>) -> String {
    let params = ListParams::new(&state.search, state.category, Some(state.page))
        .pages(pages)
        .encode();
    format!("/?{params}")
}

fn index_context(
    mut context: Context,
    data: &IndexPageData,
    server_config: &ServerConfig,
) -> Context {
    let search = data.search_query.as_deref().unwrap_or_default();
    let filter_query = ListParams::new(search, data.category, None).encode();
    let current_query = ListParams::new(search, data.category, Some(data.members.page))
        .pages(Some(data.members.total_pages))
        .encode();

    context.insert("members", &data.members);
    context.insert("counts", &data.counts);
    context.insert("search_query", search);
    context.insert("category", &data.category.map(Category::as_str));
    context.insert("categories", &Category::ALL.map(Category::as_str));
    context.insert("error", &data.error);
    context.insert("modal", &data.modal);
    context.insert("filter_query", &filter_query);
    context.insert("current_query", &current_query);
    context.insert("search_debounce_ms", &server_config.search_debounce_ms);
    context
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQuery>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = load_index_page(repo.get_ref(), &params, None).await;
    let context = index_context(
        base_context(&flash_messages, "index"),
        &data,
        &server_config,
    );
    render_template(&tera, "main/index.html", &context)
}

/// Re-renders the index with the submitted form still open and the
/// failure shown above it.
async fn render_failed_submission(
    repo: &HttpRepository,
    params: &IndexQuery,
    modal: MemberModal,
    message: String,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let data = load_index_page(repo, params, Some(modal)).await;
    let mut context = base_context(flash_messages, "index");
    context.insert("alerts", &[(message, "danger")]);
    let context = index_context(context, &data, server_config);
    render_template(tera, "main/index.html", &context)
}

fn failure_message(action: &str, err: &ServiceError) -> String {
    match err {
        ServiceError::Form(message) => {
            format!("Failed to {action} member. {message}")
        }
        other => format!("Failed to {action} member. Please try again. ({other})"),
    }
}

#[post("/member/add")]
pub async fn add_member(
    params: web::Query<IndexQuery>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<MemberForm>,
) -> impl Responder {
    match member_service::create_member(repo.get_ref(), form.clone()).await {
        Ok(_) => {
            FlashMessage::success("Member added successfully!").send();
            redirect(&index_location(&requested_state(&params), params.pages))
        }
        Err(err) => {
            render_failed_submission(
                repo.get_ref(),
                &params,
                MemberModal::add(form),
                failure_message("add", &err),
                &flash_messages,
                &server_config,
                &tera,
            )
            .await
        }
    }
}

#[post("/member/{key}/save")]
pub async fn save_member(
    key: web::Path<String>,
    params: web::Query<IndexQuery>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<MemberForm>,
) -> impl Responder {
    let key = key.into_inner();
    match member_service::update_member(repo.get_ref(), &key, form.clone()).await {
        Ok(_) => {
            FlashMessage::success("Member updated successfully!").send();
            redirect(&index_location(&requested_state(&params), params.pages))
        }
        Err(err) => {
            render_failed_submission(
                repo.get_ref(),
                &params,
                MemberModal::edit(key, form),
                failure_message("update", &err),
                &flash_messages,
                &server_config,
                &tera,
            )
            .await
        }
    }
}
