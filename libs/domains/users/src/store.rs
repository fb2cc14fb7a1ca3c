use async_trait::async_trait;
use chrono::Utc;
use database::UnitOfWork;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

/// SeaORM implementation of UserRepository.
///
/// Backend-neutral: the same queries run on PostgreSQL, MySQL and SQLite.
#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn live() -> sea_orm::Select<entity::Entity> {
    entity::Entity::find().filter(entity::Column::DeletedAt.is_null())
}

async fn insert<C: ConnectionTrait>(conn: &C, user: User) -> Result<User, DbErr> {
    let active_model: entity::ActiveModel = user.into();
    let model = active_model.insert(conn).await?;
    Ok(model.into())
}

async fn save<C: ConnectionTrait>(conn: &C, mut user: User) -> Result<User, DbErr> {
    user.updated_at = Utc::now();

    let changes = entity::ActiveModel {
        nickname: Set(user.nickname.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password.clone()),
        updated_at: Set(user.updated_at),
        ..Default::default()
    };

    let result = entity::Entity::update_many()
        .set(changes)
        .filter(entity::Column::Id.eq(user.id))
        .filter(entity::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // MySQL reports zero affected rows when nothing changed
        let exists = live()
            .filter(entity::Column::Id.eq(user.id))
            .count(conn)
            .await?
            > 0;
        if !exists {
            return Err(DbErr::RecordNotUpdated);
        }
    }

    Ok(user)
}

async fn find_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<User>, DbErr> {
    let model = live()
        .filter(entity::Column::UserId.eq(user_id))
        .one(conn)
        .await?;
    Ok(model.map(Into::into))
}

async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>, DbErr> {
    let model = live()
        .filter(entity::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(model.map(Into::into))
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, uow: Option<&UnitOfWork>, user: User) -> UserResult<User> {
        let created = match uow {
            Some(uow) => insert(uow.connection(), user).await?,
            None => insert(&self.db, user).await?,
        };

        tracing::info!(user_id = %created.user_id, "Created user");
        Ok(created)
    }

    async fn update(&self, uow: Option<&UnitOfWork>, user: User) -> UserResult<User> {
        let updated = match uow {
            Some(uow) => save(uow.connection(), user).await?,
            None => save(&self.db, user).await?,
        };

        tracing::debug!(user_id = %updated.user_id, "Updated user");
        Ok(updated)
    }

    async fn get_by_id(&self, uow: Option<&UnitOfWork>, user_id: &str) -> UserResult<User> {
        let found = match uow {
            Some(uow) => find_by_user_id(uow.connection(), user_id).await?,
            None => find_by_user_id(&self.db, user_id).await?,
        };

        found.ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    async fn get_by_email(
        &self,
        uow: Option<&UnitOfWork>,
        email: &str,
    ) -> UserResult<Option<User>> {
        let found = match uow {
            Some(uow) => find_by_email(uow.connection(), email).await?,
            None => find_by_email(&self.db, email).await?,
        };
        Ok(found)
    }
}
