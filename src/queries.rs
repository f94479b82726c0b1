//! Relation expansion over the id-addressable store: resolves referenced ids
//! into embedded documents, skipping ids that no longer resolve (the document
//! store keeps dangling ids around after the documented deletion gaps).

use mongodb::bson::{from_document, oid::ObjectId};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    cinema_model::{Cinema, CinemaDetail, CinemaOverview},
    movie_model::{Movie, MovieDetail, MovieOverview},
    room_model::{Room, RoomDetail, RoomVenue},
    showtime_model::{Showtime, ShowtimeDetail, ShowtimeOverview},
};
use crate::store::{EntityStore, CINES, HORARIOS, PELICULAS, SALAS};

async fn fetch<T: DeserializeOwned>(
    store: &dyn EntityStore,
    collection: &str,
    id: ObjectId,
) -> Result<Option<T>, ApiError> {
    match store.get(collection, id).await? {
        Some(document) => Ok(Some(from_document(document)?)),
        None => Ok(None),
    }
}

async fn fetch_many<T: DeserializeOwned>(
    store: &dyn EntityStore,
    collection: &str,
    ids: &[ObjectId],
) -> Result<Vec<T>, ApiError> {
    let mut result = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(entity) = fetch(store, collection, *id).await? {
            result.push(entity);
        }
    }
    Ok(result)
}

pub async fn cinema_detail(
    store: &dyn EntityStore,
    cinema: Cinema,
) -> Result<CinemaDetail, ApiError> {
    let salas = fetch_many(store, SALAS, &cinema.salas).await?;
    Ok(CinemaDetail {
        id: cinema.id,
        nombre: cinema.nombre,
        ubicacion: cinema.ubicacion,
        salas,
    })
}

pub async fn cinema_overview(
    store: &dyn EntityStore,
    cinema: Cinema,
) -> Result<CinemaOverview, ApiError> {
    let rooms: Vec<Room> = fetch_many(store, SALAS, &cinema.salas).await?;
    let mut salas = Vec::with_capacity(rooms.len());
    for room in rooms {
        salas.push(room_detail(store, room).await?);
    }
    Ok(CinemaOverview {
        id: cinema.id,
        nombre: cinema.nombre,
        ubicacion: cinema.ubicacion,
        salas,
    })
}

pub async fn room_detail(store: &dyn EntityStore, room: Room) -> Result<RoomDetail, ApiError> {
    let pelicula = match room.pelicula {
        Some(movie_id) => fetch(store, PELICULAS, movie_id).await?,
        None => None,
    };
    let horarios: Vec<Showtime> = fetch_many(store, HORARIOS, &room.horarios).await?;
    Ok(RoomDetail {
        id: room.id,
        numero_sala: room.numero_sala,
        butacas: room.butacas,
        pelicula,
        horarios,
        cine: room.cine,
    })
}

pub async fn room_venue(store: &dyn EntityStore, room: Room) -> Result<RoomVenue, ApiError> {
    let cine = fetch(store, CINES, room.cine).await?;
    let pelicula = match room.pelicula {
        Some(movie_id) => fetch(store, PELICULAS, movie_id).await?,
        None => None,
    };
    Ok(RoomVenue {
        id: room.id,
        numero_sala: room.numero_sala,
        butacas: room.butacas,
        cine,
        pelicula,
        horarios: room.horarios,
    })
}

pub async fn movie_detail(store: &dyn EntityStore, movie: Movie) -> Result<MovieDetail, ApiError> {
    let salas = fetch_many(store, SALAS, &movie.salas).await?;
    Ok(MovieDetail {
        id: movie.id,
        titulo: movie.titulo,
        director: movie.director,
        duracion: movie.duracion,
        genero: movie.genero,
        salas,
    })
}

pub async fn movie_overview(
    store: &dyn EntityStore,
    movie: Movie,
) -> Result<MovieOverview, ApiError> {
    let rooms: Vec<Room> = fetch_many(store, SALAS, &movie.salas).await?;
    let mut salas = Vec::with_capacity(rooms.len());
    for room in rooms {
        salas.push(room_detail(store, room).await?);
    }
    Ok(MovieOverview {
        id: movie.id,
        titulo: movie.titulo,
        director: movie.director,
        duracion: movie.duracion,
        genero: movie.genero,
        salas,
    })
}

pub async fn showtime_detail(
    store: &dyn EntityStore,
    showtime: Showtime,
) -> Result<ShowtimeDetail, ApiError> {
    let sala = fetch(store, SALAS, showtime.sala).await?;
    Ok(ShowtimeDetail {
        id: showtime.id,
        hora: showtime.hora,
        sala,
    })
}

pub async fn showtime_overview(
    store: &dyn EntityStore,
    showtime: Showtime,
) -> Result<ShowtimeOverview, ApiError> {
    let sala = match fetch::<Room>(store, SALAS, showtime.sala).await? {
        Some(room) => Some(room_venue(store, room).await?),
        None => None,
    };
    Ok(ShowtimeOverview {
        id: showtime.id,
        hora: showtime.hora,
        sala,
    })
}
