use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookmarks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub key_id: i32,
    pub comic_id: i32,
    /// `None` bookmarks the comic as a whole.
    pub chapter_number: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::access_keys::Entity",
        from = "Column::KeyId",
        to = "super::access_keys::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    AccessKeys,
    #[sea_orm(
        belongs_to = "super::comics::Entity",
        from = "Column::ComicId",
        to = "super::comics::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Comics,
}

impl Related<super::access_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccessKeys.def()
    }
}

impl Related<super::comics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
