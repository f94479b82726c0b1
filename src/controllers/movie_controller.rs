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
use crate::models::movie_model::{Movie, MovieDetail, MovieInput, MovieOverview, MovieUpdate};
use crate::queries;
use crate::store::{DynStore, PELICULAS};

pub async fn add_movie(
    Extension(store): Extension<DynStore>,
    AxumJson(input): AxumJson<MovieInput>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let mut missing = Vec::new();
    if input.titulo.is_none() {
        missing.push("titulo");
    }
    if input.director.is_none() {
        missing.push("director");
    }
    if input.duracion.is_none() {
        missing.push("duracion");
    }
    if input.genero.is_none() {
        missing.push("genero");
    }
    let (Some(titulo), Some(director), Some(duracion), Some(genero)) =
        (input.titulo, input.director, input.duracion, input.genero)
    else {
        return Err(ApiError::Validation(missing));
    };

    let document = store
        .create(
            PELICULAS,
            doc! {"titulo": titulo, "director": director, "duracion": duracion, "genero": genero, "salas": []},
        )
        .await?;
    let movie: Movie = from_document(document)?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn load_movies(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<MovieDetail>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(PELICULAS).await? {
        let movie: Movie = from_document(document)?;
        result.push(queries::movie_detail(store.as_ref(), movie).await?);
    }
    Ok(Json(result))
}

pub async fn load_movie(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<MovieDetail>, ApiError> {
    let movie_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    let document = store
        .get(PELICULAS, movie_id)
        .await?
        .ok_or(ApiError::NotFound("Película no encontrada"))?;
    let movie: Movie = from_document(document)?;
    Ok(Json(queries::movie_detail(store.as_ref(), movie).await?))
}

pub async fn update_movie(
    Extension(store): Extension<DynStore>,
    Path(id_str): Path<String>,
    Json(update_data): Json<MovieUpdate>,
) -> Result<Json<Movie>, ApiError> {
    let movie_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;

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
        store.get(PELICULAS, movie_id).await?
    } else {
        store.update_fields(PELICULAS, movie_id, update_doc).await?
    };
    let document = document.ok_or(ApiError::NotFound("Película no encontrada"))?;
    Ok(Json(from_document(document)?))
}

/// Deletes the movie and clears the `pelicula` reference on every room that
/// pointed at it; the rooms themselves stay.
pub async fn delete_movie(
    Path(id_str): Path<String>,
    Extension(store): Extension<DynStore>,
) -> Result<Json<Value>, ApiError> {
    let movie_id = ObjectId::parse_str(&id_str).map_err(|_| ApiError::InvalidId)?;
    store
        .get(PELICULAS, movie_id)
        .await?
        .ok_or(ApiError::NotFound("Película no encontrada"))?;

    store
        .delete(PELICULAS, movie_id)
        .await?
        .ok_or(ApiError::NotFound("Película no encontrada"))?;
    links::clear_movie_from_rooms(store.as_ref(), movie_id).await?;

    Ok(Json(json!({"message": "Película eliminada con éxito"})))
}

pub async fn load_movies_overview(
    Extension(store): Extension<DynStore>,
) -> Result<Json<Vec<MovieOverview>>, ApiError> {
    let mut result = Vec::new();
    for document in store.find_all(PELICULAS).await? {
        let movie: Movie = from_document(document)?;
        result.push(queries::movie_overview(store.as_ref(), movie).await?);
    }
    Ok(Json(result))
}
