use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, QueryFilter,
};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    entity,
    models::{Task, TaskId},
    repository::{StoreResult, TaskRepository},
};

pub struct PgTaskRepository {
    db: DatabaseConnection,
}

const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    owner_id UUID NULL,
    title VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ NULL
)
"#;

const CREATE_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner_id ON tasks (owner_id)";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at)";

/// Connect to PostgreSQL with a small pool
pub async fn connect(database_url: &str) -> StoreResult<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    tracing::info!("Connected to PostgreSQL");
    Ok(db)
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `tasks` table and its indexes when missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in [CREATE_TASKS_TABLE, CREATE_OWNER_INDEX, CREATE_CREATED_AT_INDEX] {
            self.db.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

fn into_tasks(models: Vec<entity::Model>) -> StoreResult<Vec<Task>> {
    models.into_iter().map(Task::try_from).collect()
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_all(&self) -> StoreResult<Vec<Task>> {
        let models = entity::Entity::find().all(&self.db).await?;
        into_tasks(models)
    }

    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id.value()).one(&self.db).await?;
        model.map(Task::try_from).transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::OwnerId.eq(owner_id))
            .all(&self.db)
            .await?;
        into_tasks(models)
    }

    async fn find_guest_created_after(&self, since: DateTime<Utc>) -> StoreResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::OwnerId.is_null())
            .filter(entity::Column::CreatedAt.gt(since))
            .all(&self.db)
            .await?;
        into_tasks(models)
    }

    async fn save(&self, task: Task) -> StoreResult<Task> {
        let is_new = !task.is_persisted();
        let active_model: entity::ActiveModel = task.into();

        let model = if is_new {
            active_model.insert(&self.db).await?
        } else {
            active_model.update(&self.db).await?
        };

        tracing::info!(task_id = model.id, created = is_new, "Saved task");
        Task::try_from(model)
    }
}
