use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique_key = "class_student")]
    pub class_id: Uuid,
    #[sea_orm(unique_key = "class_student", indexed)]
    pub student_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub enrolled_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "class_id", to = "id", on_delete = "Cascade")]
    pub class: HasOne<super::class::Entity>,
    #[sea_orm(belongs_to, from = "student_id", to = "id", on_delete = "Cascade")]
    pub student: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
