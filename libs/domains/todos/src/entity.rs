use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskId};
use crate::repository::StoreError;
use crate::values::{DescriptionValue, TitleValue};

/// Sea-ORM Entity for the tasks table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: Option<Uuid>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Rows are re-validated on load; a row that no longer passes is reported
// rather than silently accepted.
impl TryFrom<Model> for Task {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = TaskId::new(model.id);
        let corrupt = |source| StoreError::CorruptRecord { id, source };

        let title = TitleValue::new(model.title).map_err(corrupt)?;
        let description = DescriptionValue::new(model.description).map_err(corrupt)?;

        Ok(Task::restore(
            id,
            model.owner_id,
            title,
            description,
            model.completed,
            model.created_at.into(),
            model.updated_at.into(),
            model.completed_at.map(Into::into),
        ))
    }
}

// Unsaved tasks leave the key unset so the database assigns it.
impl From<Task> for ActiveModel {
    fn from(task: Task) -> Self {
        ActiveModel {
            id: task.id().map_or(NotSet, |id| Set(id.value())),
            owner_id: Set(task.owner_id()),
            title: Set(task.title().to_string()),
            description: Set(task.description().to_string()),
            completed: Set(task.completed()),
            created_at: Set(task.created_at().into()),
            updated_at: Set(task.updated_at().into()),
            completed_at: Set(task.completed_at().map(Into::into)),
        }
    }
}
