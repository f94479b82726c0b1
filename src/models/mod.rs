pub mod cinema_model;
pub mod movie_model;
pub mod room_model;
pub mod showtime_model;
