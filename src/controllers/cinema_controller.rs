use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
    Json as AxumJson,
};
use mongodb::bson::{doc, from_document, oid::ObjectId, Bson, Document};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::links;
use crate::models::cinema_model::{Cinema, CinemaDetail, CinemaInput, CinemaOverview, CinemaUpdate};
use crate::queries;
use crate::store::{DynStore, CINES};

pub async fn add_cinema(
    Extension(store): Extension<DynStore>,
    AxumJson(input): AxumJson<CinemaInput>,
) -> Result<(StatusCode, Json<Cinema>), ApiError> {
    let mut missing = Vec::new();
    if input.nombre.is_none() {
        missing.push("nombre");
    }
    if input.ubicacion.is_none() {
        missing.push("ubicacion");
    }
    let (Some(nombre), Some(ubicacion)) = (input.nombre, input.ubicacion) else {
        return Err(ApiError::Validation(missing));
    };

    let document = store
        .create(CINES, doc! {"nombre": nombre, "ubicacion": ubicacion, "salas": []})
        .await?;
    let cinema: Cinema = from_document(document)?;
    Ok((StatusCode::CREATED, Json(cinema)))
}

pub async fn load_cinemas(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<CinemaDetail>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(CINES).await? {
        let cinema: Cinema = from_document(document)?;
        result.push(queries::cinema_detail(store.as_ref(), cinema).await?);
    }
    Ok(Json(result))
}

pub async fn load_cinema(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<CinemaDetail>, ApiError> {
    let cinema_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(CINES, cinema_id)
        .await?
        .ok_or(ApiError::NotFound("Cine no encontrado"))?;
    let cinema: Cinema = from_document(document)?;
    Ok(Json(queries::cinema_detail(store.as_ref(), cinema).await?))
}

pub async fn update_cinema(
    Extension(store): Extension<DynStore>,
    Path(id_str): Path<String>,
    Json(update_data): Json<CinemaUpdate>,
) -> Result<Json<Cinema>, ApiError> {
    let cinema_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;

    let json =
        serde_json::to_value(&update_data).unwrap_or_else(|_| Value::Object(Default::default()));

    let mut update_doc = Document::new();
    if let Value::Object(obj) = json {
        for (key, value) in obj {
            if !value.is_null() {
                let bson_value = match Bson::try_from(value) {
                    Ok(bv) => bv,
                    Err(_) => continue,
                };
                update_doc.insert(key, bson_value);
            }
        }
    }

    let document = if update_doc.is_empty() {
        store.get(CINES, cinema_id).await?
    } else {
        store.update_fields(CINES, cinema_id, update_doc).await?
    };
    let document = document.ok_or(ApiError::NotFound("Cine no encontrado"))?;
    Ok(Json(from_document(document)?))
}

/// Deletes the cinema and every room that references it. The deleted rooms'
/// showtimes and movie links are left untouched.
pub async fn delete_cinema(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Value>, ApiError> {
    let cinema_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    store
        .get(CINES, cinema_id)
        .await?
        .ok_or(ApiError::NotFound("Cine no encontrado"))?;

    let removed = links::cascade_delete_rooms_of_cinema(store.as_ref(), cinema_id).await?;
    store
        .delete(CINES, cinema_id)
        .await?
        .ok_or(ApiError::NotFound("Cine no encontrado"))?;

    tracing::info!(cine = %cinema_id, salas = removed, "cine eliminado");
    Ok(Json(json!({"message": "Cine eliminado con éxito"})))
}

pub async fn load_cinemas_overview(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<CinemaOverview>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(CINES).await? {
        let cinema: Cinema = from_document(document)?;
        result.push(queries::cinema_overview(store.as_ref(), cinema).await?);
    }
    Ok(Json(result))
}
