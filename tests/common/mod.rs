//! In-process stand-in for the remote actor service.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde::Deserialize;
use serde_json::{Value, json};

/// Records served per page, small enough to exercise pagination.
pub const PAGE_SIZE: usize = 2;

/// Search text that makes the listing endpoint fail.
pub const FAILING_SEARCH: &str = "boom";

#[derive(Default)]
struct Store {
    actors: Vec<Value>,
    next_id: usize,
    payloads: Vec<Value>,
}

type SharedStore = Arc<Mutex<Store>>;

#[derive(Deserialize)]
struct ActorsQuery {
    page: Option<usize>,
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
}

async fn list_actors(store: web::Data<SharedStore>, query: web::Query<ActorsQuery>) -> HttpResponse {
    if query.search == FAILING_SEARCH {
        return HttpResponse::InternalServerError().json(json!({ "message": "database offline" }));
    }

    let store = store.lock().unwrap();
    let search = query.search.to_lowercase();
    let matching: Vec<&Value> = store
        .actors
        .iter()
        .filter(|a| {
            a["fullName"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&search)
        })
        .filter(|a| query.category.is_empty() || a["category"] == query.category.as_str())
        .collect();

    let count = |category: &str| matching.iter().filter(|a| a["category"] == category).count();
    let total_pages = matching.len().div_ceil(PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let actors: Vec<&Value> = matching
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .copied()
        .collect();

    HttpResponse::Ok().json(json!({
        "data": {
            "actor": actors,
            "categoryACount": count("A"),
            "categoryBCount": count("B"),
            "totalActor": matching.len(),
            "totalPage": total_pages,
        }
    }))
}

async fn add_actor(store: web::Data<SharedStore>, body: web::Json<Value>) -> HttpResponse {
    let mut store = store.lock().unwrap();
    let mut actor = body.into_inner();
    store.payloads.push(actor.clone());

    if store
        .actors
        .iter()
        .any(|a| a["idNo"] == actor["idNo"])
    {
        return HttpResponse::Conflict().json(json!({ "message": "idNo already exists" }));
    }

    store.next_id += 1;
    actor["_id"] = json!(format!("k{}", store.next_id));
    store.actors.push(actor.clone());
    HttpResponse::Created().json(json!({ "data": actor }))
}

async fn update_actor(
    store: web::Data<SharedStore>,
    key: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut store = store.lock().unwrap();
    let key = key.into_inner();
    let updates = body.into_inner();
    store.payloads.push(updates.clone());

    match store.actors.iter_mut().find(|a| a["_id"] == key.as_str()) {
        Some(stored) => {
            if let (Some(fields), Some(updates)) = (stored.as_object_mut(), updates.as_object()) {
                for (name, value) in updates {
                    fields.insert(name.clone(), value.clone());
                }
            }
            // Bare record, no envelope.
            HttpResponse::Ok().json(stored.clone())
        }
        None => HttpResponse::NotFound().json(json!({ "message": "Actor not found" })),
    }
}

pub struct FakeActorApi {
    pub base_url: String,
    store: SharedStore,
    handle: ServerHandle,
}

impl FakeActorApi {
    /// Starts the service seeded with Alice (A) and Bob (B).
    pub async fn start() -> Self {
        let api = Self::start_empty().await;
        api.insert("M1", "Alice", "A", "1990-05-04");
        api.insert("M2", "Bob", "B", "1985-11-23");
        api
    }

    pub async fn start_empty() -> Self {
        let store = SharedStore::default();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local address").port();

        let data = web::Data::new(store.clone());
        let server = HttpServer::new(move || {
            App::new().app_data(data.clone()).service(
                web::scope("/api/v1")
                    .route("/actors", web::get().to(list_actors))
                    .route("/admin/add-actor", web::post().to(add_actor))
                    .route("/admin/update-actor/{key}", web::put().to(update_actor)),
            )
        })
        .workers(1)
        .listen(listener)
        .expect("listen on ephemeral port")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            store,
            handle,
        }
    }

    pub fn insert(&self, id_no: &str, name: &str, category: &str, dob: &str) {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let key = format!("k{}", store.next_id);
        drop(store);
        self.insert_with_key(&key, id_no, name, category, dob);
    }

    /// Stores a record under a caller-chosen `_id`.
    pub fn insert_with_key(&self, key: &str, id_no: &str, name: &str, category: &str, dob: &str) {
        let mut store = self.store.lock().unwrap();
        store.actors.push(json!({
            "_id": key,
            "idNo": id_no,
            "fullName": name,
            "phoneNumber": "555-0100",
            "category": category,
            "dob": format!("{dob}T00:00:00.000Z"),
        }));
    }

    /// Bodies received by the mutation endpoints, oldest first.
    pub fn payloads(&self) -> Vec<Value> {
        self.store.lock().unwrap().payloads.clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
