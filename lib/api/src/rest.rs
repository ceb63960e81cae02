use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use attrx_core::{AttributeRequest, AttributeSelector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Deserialize)]
struct SelectAttributeRequest {
    product_number: String,
    attribute_name: String,
    available_values: Vec<String>,
    image_path: Option<String>,
}

#[derive(Serialize)]
struct SelectAttributeResponse {
    product_number: String,
    selected_value: String,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        selector: Arc<AttributeSelector>,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(selector.clone()))
                .route("/attributes/select", web::post().to(select_attribute))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn select_attribute(
    selector: web::Data<Arc<AttributeSelector>>,
    req: web::Json<SelectAttributeRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    if req.available_values.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "available_values must not be empty"
        })));
    }

    let request = AttributeRequest {
        product_id: req.product_number,
        attribute_name: req.attribute_name,
        candidates: req.available_values,
        image: req.image_path.map(PathBuf::from),
    };

    let result = selector.select_attribute_value(&request).await;

    Ok(HttpResponse::Ok().json(SelectAttributeResponse {
        product_number: result.product_id,
        selected_value: result.selected_value,
    }))
}
