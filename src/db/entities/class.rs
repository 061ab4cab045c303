use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(indexed)]
    pub teacher_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "teacher_id", to = "id", on_delete = "Cascade")]
    pub teacher: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub enrollments: HasMany<super::enrollment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
