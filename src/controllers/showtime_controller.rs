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
use crate::models::showtime_model::{
    Showtime, ShowtimeDetail, ShowtimeInput, ShowtimeOverview, ShowtimeUpdate,
};
use crate::queries;
use crate::store::{DynStore, HORARIOS};

/// Creates the showtime, then appends it to its room's `horarios`. If the
/// room vanished in between, the 404 is reported and the created showtime
/// stays behind unlinked.
pub async fn add_showtime(
    Extension(store): Extension<DynStore>,
    AxumJson(input): AxumJson<ShowtimeInput>,
) -> Result<(StatusCode, Json<Showtime>), ApiError> {
    let mut missing = Vec::new();
    if input.hora.is_none() {
        missing.push("hora");
    }
    if input.sala.is_none() {
        missing.push("sala");
    }
    let (Some(hora), Some(sala)) = (input.hora, input.sala) else {
        return Err(ApiError::Validation(missing));
    };
    let room_id = ObjectId::parse_str(&sala).map_err(|_| ApiError::InvalidId)?;

    let created = store
        .create(HORARIOS, doc! {"hora": hora, "sala": room_id})
        .await?;
    let showtime_id = created.get_object_id("_id")?;

    links::link_showtime_to_room(store.as_ref(), showtime_id, room_id).await?;

    Ok((StatusCode::CREATED, Json(from_document(created)?)))
}

pub async fn load_showtimes(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<ShowtimeDetail>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(HORARIOS).await? {
        let showtime: Showtime = from_document(document)?;
        result.push(queries::showtime_detail(store.as_ref(), showtime).await?);
    }
    Ok(Json(result))
}

pub async fn load_showtime(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<ShowtimeDetail>, ApiError> {
    let showtime_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(HORARIOS, showtime_id)
        .await?
        .ok_or(ApiError::NotFound("Horario no encontrado"))?;
    let showtime: Showtime = from_document(document)?;
    Ok(Json(queries::showtime_detail(store.as_ref(), showtime).await?))
}

pub async fn update_showtime(
    Extension(store): Extension<DynStore>,
    Path(id_str): Path<String>,
    Json(update_data): Json<ShowtimeUpdate>,
) -> Result<Json<Showtime>, ApiError> {
    let showtime_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;

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
        store.get(HORARIOS, showtime_id).await?
    } else {
        store.update_fields(HORARIOS, showtime_id, update_doc).await?
    };
    let document = document.ok_or(ApiError::NotFound("Horario no encontrado"))?;
    Ok(Json(from_document(document)?))
}

/// Pulls the showtime out of its room's list, then deletes it.
pub async fn delete_showtime(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Value>, ApiError> {
    let showtime_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(HORARIOS, showtime_id)
        .await?
        .ok_or(ApiError::NotFound("Horario no encontrado"))?;
    let showtime: Showtime = from_document(document)?;

    links::unlink_showtime_from_room(store.as_ref(), showtime_id, showtime.sala).await?;
    store
        .delete(HORARIOS, showtime_id)
        .await?
        .ok_or(ApiError::NotFound("Horario no encontrado"))?;

    Ok(Json(json!({"message": "Horario eliminado con éxito"})))
}

pub async fn load_showtimes_overview(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<ShowtimeOverview>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(HORARIOS).await? {
        let showtime: Showtime = from_document(document)?;
        result.push(queries::showtime_overview(store.as_ref(), showtime).await?);
    }
    Ok(Json(result))
}
