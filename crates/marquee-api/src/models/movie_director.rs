use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `director_id` points into `actors`; directors share that table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_directors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub director_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_delete = "Cascade"
    )]
    Movie,
    #[sea_orm(
        belongs_to = "super::actor::Entity",
        from = "Column::DirectorId",
        to = "super::actor::Column::Id",
        on_delete = "Cascade"
    )]
    Director,
}

impl ActiveModelBehavior for ActiveModel {}
