use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An actor or director. Movies link to the same table for both roles.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub age: i32,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Image path or URL, always a .jpg, .jpeg or .png
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Short form used in lists and inside movie details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
}

impl From<Model> for ActorSummary {
    fn from(actor: Model) -> Self {
        ActorSummary {
            id: actor.id,
            name: actor.name,
            image: actor.image,
        }
    }
}
