use utoipa::OpenApi;

use crate::controllers::actors::{ActorDetail, CreateActorRequest};
use crate::controllers::movies::{CreateMovieRequest, MovieDetail, MovieListItem};
use crate::controllers::ratings::{CreateRatingRequest, RatingResponse};
use crate::controllers::reviews::{CreateReviewRequest, ReviewChild, ReviewCreated, ReviewResponse};
use crate::models::actor::ActorSummary;
use crate::models::{category, genre};

/// OpenAPI documentation for the catalog endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::controllers::actors::list_actors,
        crate::controllers::actors::create_actor,
        crate::controllers::actors::get_actor,
        crate::controllers::catalog::list_categories,
        crate::controllers::catalog::list_genres,
        crate::controllers::movies::list_movies,
        crate::controllers::movies::create_movie,
        crate::controllers::movies::get_movie,
        crate::controllers::reviews::create_review,
        crate::controllers::reviews::list_movie_reviews,
        crate::controllers::ratings::create_rating,
    ),
    components(
        schemas(
            ActorSummary,
            ActorDetail,
            CreateActorRequest,
            category::Model,
            genre::Model,
            MovieListItem,
            MovieDetail,
            CreateMovieRequest,
            ReviewResponse,
            ReviewChild,
            ReviewCreated,
            CreateReviewRequest,
            CreateRatingRequest,
            RatingResponse,
        )
    ),
    tags(
        (name = "actors", description = "Actors and directors"),
        (name = "catalog", description = "Categories and genres"),
        (name = "movies", description = "Movie list, details and creation"),
        (name = "reviews", description = "Visitor reviews and replies"),
        (name = "ratings", description = "Star ratings by IP")
    )
)]
pub struct CatalogApiDoc;
