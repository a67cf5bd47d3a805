use actix_web::{HttpResponse, Responder, get, web};
use log::error;
use serde_json::json;

use crate::dto::api::MembersQuery;
use crate::repository::HttpRepository;
use crate::services::api as api_service;

#[get("/v1/members")]
pub async fn api_v1_members(
    params: web::Query<MembersQuery>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match api_service::list_members(repo.get_ref(), params.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            error!("Failed to list members: {err}");
            HttpResponse::BadGateway().json(json!({ "message": err.to_string() }))
        }
    }
}
