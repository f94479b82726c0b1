use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
    Json as AxumJson,
};
use mongodb::bson::{doc, from_document, oid::ObjectId, Document};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::links;
use crate::models::movie_model::Movie;
use crate::models::room_model::{Room, RoomDetail, RoomInput, RoomUpdate};
use crate::queries;
use crate::store::{DynStore, PELICULAS, SALAS};

/// Creates the room, then issues the link writes: movie first (when one was
/// supplied), cinema second. A link failure leaves the already-created room
/// in place.
pub async fn add_room(
    Extension(store): Extension<DynStore>,
    AxumJson(input): AxumJson<RoomInput>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let mut missing = Vec::new();
    if input.numero_sala.is_none() {
        missing.push("numero_sala");
    }
    if input.cine.is_none() {
        missing.push("cine");
    }
    let (Some(numero_sala), Some(cine)) = (input.numero_sala, input.cine) else {
        return Err(ApiError::Validation(missing));
    };
    let cinema_id = ObjectId::parse_str(&cine).map_err(|_| ApiError::InvalidId)?;
    let butacas = input.butacas.unwrap_or(100);

    let created = store
        .create(
            SALAS,
            doc! {"numero_sala": numero_sala, "butacas": butacas, "cine": cinema_id, "horarios": []},
        )
        .await?;
    let room_id = created.get_object_id("_id")?;

    if let Some(pelicula) = input.pelicula {
        let movie_id = ObjectId::parse_str(&pelicula).map_err(|_| ApiError::InvalidId)?;
        links::link_room_to_movie(store.as_ref(), room_id, movie_id).await?;
    }
    links::link_room_to_cinema(store.as_ref(), room_id, cinema_id).await?;

    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    Ok((StatusCode::CREATED, Json(from_document(document)?)))
}

pub async fn load_rooms(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<RoomDetail>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(SALAS).await? {
        let room: Room = from_document(document)?;
        result.push(queries::room_detail(store.as_ref(), room).await?);
    }
    Ok(Json(result))
}

pub async fn load_room(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<RoomDetail>, ApiError> {
    let room_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    let room: Room = from_document(document)?;
    Ok(Json(queries::room_detail(store.as_ref(), room).await?))
}

/// `$set`s the scalar fields and, when a movie id was supplied, re-links the
/// movie. Rebinding `cine` does not move the room between the two cinemas'
/// `salas` lists.
pub async fn update_room(
    Extension(store): Extension<DynStore>,
    Path(id_str): Path<String>,
    Json(update_data): Json<RoomUpdate>,
) -> Result<Json<Room>, ApiError> {
    let room_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;

    let mut update_doc = Document::new();
    if let Some(numero_sala) = update_data.numero_sala {
        update_doc.insert("numero_sala", numero_sala);
    }
    if let Some(butacas) = update_data.butacas {
        update_doc.insert("butacas", butacas);
    }
    if let Some(cine) = &update_data.cine {
        let cinema_id = ObjectId::parse_str(cine).map_err(|_| ApiError::InvalidId)?;
        update_doc.insert("cine", cinema_id);
    }

    let document = if update_doc.is_empty() {
        store.get(SALAS, room_id).await?
    } else {
        store.update_fields(SALAS, room_id, update_doc).await?
    };
    document.ok_or(ApiError::NotFound("Sala no encontrada"))?;

    if let Some(pelicula) = &update_data.pelicula {
        let movie_id = ObjectId::parse_str(pelicula).map_err(|_| ApiError::InvalidId)?;
        links::link_room_to_movie(store.as_ref(), room_id, movie_id).await?;
    }

    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    Ok(Json(from_document(document)?))
}

/// Deletes the room, then pulls it out of its movie's set and its cinema's
/// list.
pub async fn delete_room(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Value>, ApiError> {
    let room_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    let room: Room = from_document(document)?;

    store
        .delete(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;

    if let Some(movie_id) = room.pelicula {
        links::unlink_room_from_movie(store.as_ref(), room_id, movie_id).await?;
    }
    links::unlink_room_from_cinema(store.as_ref(), room_id, room.cine).await?;

    Ok(Json(json!({"message": "Sala de Cine eliminada con éxito"})))
}

/// Attaches an existing movie to an existing room; both ids are verified
/// before any write.
pub async fn attach_movie_to_room(
    Path((sala_str, pelicula_str)): Path<(String, String)>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Room>, ApiError> {
    let room_id = ObjectId::parse_str(&sala_str).map_err(|_| ApiError::InvalidId)?;
    let movie_id = ObjectId::parse_str(&pelicula_str).map_err(|_| ApiError::InvalidId)?;

    store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    store
        .get(PELICULAS, movie_id)
        .await?
        .ok_or(ApiError::NotFound("Película no encontrada"))?;

    links::link_room_to_movie(store.as_ref(), room_id, movie_id).await?;

    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    Ok(Json(from_document(document)?))
}

/// Returns the movie currently showing in the room, but only when the room
/// really references that movie.
pub async fn fetch_room_movie(
    Path((sala_str, pelicula_str)): Path<(String, String)>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Movie>, ApiError> {
    let room_id = ObjectId::parse_str(&sala_str).map_err(|_| ApiError::InvalidId)?;
    let movie_id = ObjectId::parse_str(&pelicula_str).map_err(|_| ApiError::InvalidId)?;

    let document = store
        .get(SALAS, room_id)
        .await?
        .ok_or(ApiError::NotFound("Sala no encontrada"))?;
    let room: Room = from_document(document)?;

    if room.pelicula != Some(movie_id) {
        return Err(ApiError::NotFound("Película no encontrada en la sala"));
    }

    let document = store
        .get(PELICULAS, movie_id)
        .await?
        .ok_or(ApiError::NotFound("Película no encontrada en la sala"))?;
    Ok(Json(from_document(document)?))
}
