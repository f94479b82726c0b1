use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::oid::ObjectId;

use cartelera_api::controllers::{
    cinema_controller::*, movie_controller::*, room_controller::*, showtime_controller::*,
};
use cartelera_api::error::ApiError;
use cartelera_api::models::{
    cinema_model::{Cinema, CinemaInput},
    movie_model::{Movie, MovieInput},
    room_model::{Room, RoomInput, RoomUpdate},
    showtime_model::{Showtime, ShowtimeInput},
};
use cartelera_api::store::{DynStore, EntityStore, MemoryStore, CINES, HORARIOS, PELICULAS, SALAS};

fn memory_store() -> DynStore {
    Arc::new(MemoryStore::new())
}

fn hex(id: Option<ObjectId>) -> String {
    id.expect("entity should carry an id").to_hex()
}

async fn create_cinema(store: &DynStore, nombre: &str, ubicacion: &str) -> Cinema {
    let (status, Json(cinema)) = add_cinema(
        Extension(store.clone()),
        Json(CinemaInput {
            nombre: Some(nombre.to_string()),
            ubicacion: Some(ubicacion.to_string()),
        }),
    )
    .await
    .expect("cinema creation should succeed");
    assert_eq!(status, StatusCode::CREATED);
    cinema
}

async fn create_movie(store: &DynStore, titulo: &str) -> Movie {
    let (status, Json(movie)) = add_movie(
        Extension(store.clone()),
        Json(MovieInput {
            titulo: Some(titulo.to_string()),
            director: Some("D".to_string()),
            duracion: Some(155),
            genero: Some("Sci-Fi".to_string()),
        }),
    )
    .await
    .expect("movie creation should succeed");
    assert_eq!(status, StatusCode::CREATED);
    movie
}

async fn create_room(
    store: &DynStore,
    numero: i32,
    butacas: Option<i32>,
    cine: &Cinema,
    pelicula: Option<&Movie>,
) -> Room {
    let (status, Json(room)) = add_room(
        Extension(store.clone()),
        Json(RoomInput {
            numero_sala: Some(numero),
            butacas,
            cine: Some(hex(cine.id)),
            pelicula: pelicula.map(|movie| hex(movie.id)),
        }),
    )
    .await
    .expect("room creation should succeed");
    assert_eq!(status, StatusCode::CREATED);
    room
}

async fn create_showtime(store: &DynStore, hora: &str, room: &Room) -> Showtime {
    let (status, Json(showtime)) = add_showtime(
        Extension(store.clone()),
        Json(ShowtimeInput {
            hora: Some(hora.to_string()),
            sala: Some(hex(room.id)),
        }),
    )
    .await
    .expect("showtime creation should succeed");
    assert_eq!(status, StatusCode::CREATED);
    showtime
}

async fn stored_cinema(store: &DynStore, id: Option<ObjectId>) -> Cinema {
    let document = store
        .get(CINES, id.expect("id"))
        .await
        .expect("store read")
        .expect("cinema should exist");
    mongodb::bson::from_document(document).expect("valid cinema document")
}

async fn stored_room(store: &DynStore, id: Option<ObjectId>) -> Room {
    let document = store
        .get(SALAS, id.expect("id"))
        .await
        .expect("store read")
        .expect("room should exist");
    mongodb::bson::from_document(document).expect("valid room document")
}

async fn stored_movie(store: &DynStore, id: Option<ObjectId>) -> Movie {
    let document = store
        .get(PELICULAS, id.expect("id"))
        .await
        .expect("store read")
        .expect("movie should exist");
    mongodb::bson::from_document(document).expect("valid movie document")
}

#[tokio::test]
async fn new_cinema_starts_with_no_rooms() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;

    assert_eq!(cinema.nombre, "Lux");
    assert_eq!(cinema.ubicacion, "Downtown");
    assert!(cinema.salas.is_empty());
    assert!(cinema.id.is_some());
}

#[tokio::test]
async fn cinema_creation_reports_every_missing_field() {
    let store = memory_store();
    let error = add_cinema(
        Extension(store.clone()),
        Json(CinemaInput {
            nombre: None,
            ubicacion: None,
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, ApiError::Validation(ref fields) if *fields == ["nombre", "ubicacion"]));
}

#[tokio::test]
async fn room_creation_links_cinema_and_movie() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;

    assert_eq!(room.pelicula, movie.id);

    let cinema = stored_cinema(&store, cinema.id).await;
    assert_eq!(cinema.salas, vec![room.id.unwrap()]);

    let movie = stored_movie(&store, movie.id).await;
    assert_eq!(movie.salas, vec![room.id.unwrap()]);
}

#[tokio::test]
async fn room_without_seats_defaults_to_one_hundred() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let room = create_room(&store, 3, None, &cinema, None).await;

    assert_eq!(room.butacas, 100);
    assert!(room.pelicula.is_none());
    assert!(room.horarios.is_empty());
}

#[tokio::test]
async fn attaching_the_same_movie_twice_keeps_one_set_entry() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, None).await;

    for _ in 0..2 {
        let Json(updated) = attach_movie_to_room(
            Path((hex(room.id), hex(movie.id))),
            Extension(store.clone()),
        )
        .await
        .expect("attach should succeed");
        assert_eq!(updated.pelicula, movie.id);
    }

    let movie = stored_movie(&store, movie.id).await;
    assert_eq!(movie.salas, vec![room.id.unwrap()]);
}

#[tokio::test]
async fn attaching_a_missing_movie_is_a_not_found() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let room = create_room(&store, 1, Some(80), &cinema, None).await;

    let error = attach_movie_to_room(
        Path((hex(room.id), ObjectId::new().to_hex())),
        Extension(store.clone()),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, ApiError::NotFound("Película no encontrada")));
}

#[tokio::test]
async fn room_movie_lookup_requires_the_current_link() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let showing = create_movie(&store, "Dune").await;
    let other = create_movie(&store, "Solaris").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&showing)).await;

    let Json(found) = fetch_room_movie(
        Path((hex(room.id), hex(showing.id))),
        Extension(store.clone()),
    )
    .await
    .expect("linked movie should resolve");
    assert_eq!(found.titulo, "Dune");

    let error = fetch_room_movie(
        Path((hex(room.id), hex(other.id))),
        Extension(store.clone()),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        error,
        ApiError::NotFound("Película no encontrada en la sala")
    ));
}

#[tokio::test]
async fn deleting_a_room_unlinks_cinema_and_movie_only() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;
    let sibling = create_room(&store, 2, None, &cinema, Some(&movie)).await;

    delete_room(Path(hex(room.id)), Extension(store.clone()))
        .await
        .expect("room deletion should succeed");

    let cinema = stored_cinema(&store, cinema.id).await;
    assert_eq!(cinema.salas, vec![sibling.id.unwrap()]);

    let movie = stored_movie(&store, movie.id).await;
    assert_eq!(movie.salas, vec![sibling.id.unwrap()]);

    assert!(store.get(SALAS, room.id.unwrap()).await.unwrap().is_none());
    assert!(store.get(SALAS, sibling.id.unwrap()).await.unwrap().is_some());
}

// The cascade deliberately stops at the rooms: their showtimes stay behind as
// orphans and the movie's room set keeps the stale entry.
#[tokio::test]
async fn deleting_a_cinema_cascades_to_rooms_but_not_further() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let other_cinema = create_cinema(&store, "Rex", "Uptown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;
    let unrelated = create_room(&store, 9, None, &other_cinema, None).await;
    let showtime = create_showtime(&store, "18:00", &room).await;

    delete_cinema(Path(hex(cinema.id)), Extension(store.clone()))
        .await
        .expect("cinema deletion should succeed");

    assert!(store.get(CINES, cinema.id.unwrap()).await.unwrap().is_none());
    assert!(store.get(SALAS, room.id.unwrap()).await.unwrap().is_none());
    assert!(store
        .get(SALAS, unrelated.id.unwrap())
        .await
        .unwrap()
        .is_some());

    // Orphaned showtime document survives.
    assert!(store
        .get(HORARIOS, showtime.id.unwrap())
        .await
        .unwrap()
        .is_some());

    // Stale room id survives in the movie's set.
    let movie = stored_movie(&store, movie.id).await;
    assert_eq!(movie.salas, vec![room.id.unwrap()]);
}

#[tokio::test]
async fn deleting_a_movie_clears_rooms_without_deleting_them() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let first = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;
    let second = create_room(&store, 2, None, &cinema, Some(&movie)).await;

    delete_movie(Path(hex(movie.id)), Extension(store.clone()))
        .await
        .expect("movie deletion should succeed");

    assert!(store
        .get(PELICULAS, movie.id.unwrap())
        .await
        .unwrap()
        .is_none());

    for id in [first.id, second.id] {
        let room = stored_room(&store, id).await;
        assert!(room.pelicula.is_none());
    }
}

#[tokio::test]
async fn deleting_a_showtime_unlinks_its_room() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let room = create_room(&store, 1, Some(80), &cinema, None).await;
    let morning = create_showtime(&store, "10:00", &room).await;
    let evening = create_showtime(&store, "18:00", &room).await;

    delete_showtime(Path(hex(morning.id)), Extension(store.clone()))
        .await
        .expect("showtime deletion should succeed");

    assert!(store
        .get(HORARIOS, morning.id.unwrap())
        .await
        .unwrap()
        .is_none());
    let room = stored_room(&store, room.id).await;
    assert_eq!(room.horarios, vec![evening.id.unwrap()]);
}

#[tokio::test]
async fn showtime_for_a_missing_room_reports_not_found_and_stays_unlinked() {
    let store = memory_store();
    let error = add_showtime(
        Extension(store.clone()),
        Json(ShowtimeInput {
            hora: Some("20:00".to_string()),
            sala: Some(ObjectId::new().to_hex()),
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Store(cartelera_api::store::StoreError::NotFound)
    ));
    // The primary mutation is not rolled back.
    assert_eq!(store.find_all(HORARIOS).await.unwrap().len(), 1);
}

// Rebinding a room's cinema only rewrites the room's own reference; neither
// cinema's room list is touched. Kept as documented behavior.
#[tokio::test]
async fn room_cinema_rebind_leaves_both_room_lists_stale() {
    let store = memory_store();
    let old_cinema = create_cinema(&store, "Lux", "Downtown").await;
    let new_cinema = create_cinema(&store, "Rex", "Uptown").await;
    let room = create_room(&store, 1, Some(80), &old_cinema, None).await;

    let Json(updated) = update_room(
        Extension(store.clone()),
        Path(hex(room.id)),
        Json(RoomUpdate {
            numero_sala: None,
            butacas: None,
            cine: Some(hex(new_cinema.id)),
            pelicula: None,
        }),
    )
    .await
    .expect("room update should succeed");

    assert_eq!(updated.cine, new_cinema.id.unwrap());
    let old_cinema = stored_cinema(&store, old_cinema.id).await;
    assert_eq!(old_cinema.salas, vec![room.id.unwrap()]);
    let new_cinema = stored_cinema(&store, new_cinema.id).await;
    assert!(new_cinema.salas.is_empty());
}

#[tokio::test]
async fn room_update_can_link_a_movie() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, None).await;

    let Json(updated) = update_room(
        Extension(store.clone()),
        Path(hex(room.id)),
        Json(RoomUpdate {
            numero_sala: None,
            butacas: Some(120),
            cine: None,
            pelicula: Some(hex(movie.id)),
        }),
    )
    .await
    .expect("room update should succeed");

    assert_eq!(updated.butacas, 120);
    assert_eq!(updated.pelicula, movie.id);
    let movie = stored_movie(&store, movie.id).await;
    assert_eq!(movie.salas, vec![room.id.unwrap()]);
}

#[tokio::test]
async fn cinema_overview_expands_rooms_movies_and_showtimes() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let room = create_room(&store, 1, Some(80), &cinema, None).await;
    let movie = create_movie(&store, "Dune").await;
    attach_movie_to_room(
        Path((hex(room.id), hex(movie.id))),
        Extension(store.clone()),
    )
    .await
    .expect("attach should succeed");
    create_showtime(&store, "18:00", &room).await;

    let Json(overview) = load_cinemas_overview(Extension(store.clone()))
        .await
        .expect("overview should succeed");

    assert_eq!(overview.len(), 1);
    let lux = &overview[0];
    assert_eq!(lux.nombre, "Lux");
    assert_eq!(lux.salas.len(), 1);
    let sala = &lux.salas[0];
    assert_eq!(sala.numero_sala, 1);
    let dune = sala.pelicula.as_ref().expect("movie should be expanded");
    assert_eq!(dune.titulo, "Dune");
    assert_eq!(dune.director, "D");
    assert_eq!(dune.duracion, 155);
    assert_eq!(sala.horarios.len(), 1);
    assert_eq!(sala.horarios[0].hora, "18:00");
}

#[tokio::test]
async fn movie_overview_expands_rooms_and_their_showtimes() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;
    create_showtime(&store, "16:00", &room).await;
    create_showtime(&store, "20:00", &room).await;

    let Json(overview) = load_movies_overview(Extension(store.clone()))
        .await
        .expect("overview should succeed");

    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].salas.len(), 1);
    let horas: Vec<&str> = overview[0].salas[0]
        .horarios
        .iter()
        .map(|h| h.hora.as_str())
        .collect();
    assert_eq!(horas, ["16:00", "20:00"]);
}

#[tokio::test]
async fn showtime_overview_expands_room_cinema_and_movie() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;
    create_showtime(&store, "18:00", &room).await;

    let Json(overview) = load_showtimes_overview(Extension(store.clone()))
        .await
        .expect("overview should succeed");

    assert_eq!(overview.len(), 1);
    let sala = overview[0].sala.as_ref().expect("room should be expanded");
    let cine = sala.cine.as_ref().expect("cinema should be expanded");
    assert_eq!(cine.nombre, "Lux");
    let pelicula = sala.pelicula.as_ref().expect("movie should be expanded");
    assert_eq!(pelicula.titulo, "Dune");
}

#[tokio::test]
async fn reads_skip_dangling_room_ids() {
    let store = memory_store();
    let cinema = create_cinema(&store, "Lux", "Downtown").await;
    let movie = create_movie(&store, "Dune").await;
    let room = create_room(&store, 1, Some(80), &cinema, Some(&movie)).await;

    // Bypass the handlers to simulate the post-cascade stale state.
    store
        .delete(SALAS, room.id.unwrap())
        .await
        .unwrap()
        .expect("room should exist");

    let Json(cinemas) = load_cinemas(Extension(store.clone()))
        .await
        .expect("listing should succeed");
    assert!(cinemas[0].salas.is_empty());

    let Json(movie_detail) = load_movie(Path(hex(movie.id)), Extension(store.clone()))
        .await
        .expect("movie read should succeed");
    assert!(movie_detail.salas.is_empty());
}
