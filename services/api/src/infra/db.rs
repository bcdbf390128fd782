use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use roombook_api_schema::{audit_logs, events, permissions, role_permissions, roles, user_roles, users};
use roombook_domain::permission::Permission;
use roombook_domain::role::{DEFAULT_ROLE, RoleName};

use crate::domain::repository::{
    AuditLogRepository, EventRepository, RoleRepository, UserRepository,
};
use crate::domain::types::{
    AuditEntry, AuditFilter, Event, PermissionRecord, RoleRecord, UpsertedUser, User,
};
use crate::error::ApiError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn upsert_with_login_token(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UpsertedUser, ApiError> {
        let email = email.to_owned();
        let token = token.to_owned();
        let upserted = self
            .db
            .transaction::<_, UpsertedUser, DbErr>(|txn| {
                Box::pin(async move {
                    // Single atomic upsert: two concurrent requests for the
                    // same new address cannot both take the insert path, so
                    // neither can trip the email unique constraint.
                    let candidate_id = Uuid::new_v4();
                    let model = users::Entity::insert(users::ActiveModel {
                        id: Set(candidate_id),
                        email: Set(email),
                        login_token: Set(Some(token)),
                        login_token_expires_at: Set(Some(expires_at)),
                        created_at: Set(Utc::now()),
                    })
                    .on_conflict(
                        OnConflict::column(users::Column::Email)
                            .update_columns([
                                users::Column::LoginToken,
                                users::Column::LoginTokenExpiresAt,
                            ])
                            .to_owned(),
                    )
                    .exec_with_returning(txn)
                    .await?;

                    // On the update path the row keeps its original id.
                    let created = model.id == candidate_id;
                    if created {
                        // Default role grant is part of the creation transaction.
                        grant_role(txn, model.id, DEFAULT_ROLE).await?;
                    }
                    Ok(UpsertedUser {
                        user: user_from_model(model),
                        created,
                    })
                })
            })
            .await
            .context("upsert user with login token")?;
        Ok(upserted)
    }

    async fn consume_login_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        // Single conditional update: clearing the token fields and deciding
        // success happen in one statement, so two concurrent verifies can
        // never both observe a live token.
        let now = Utc::now();
        let rows = users::Entity::update_many()
            .col_expr(users::Column::LoginToken, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::LoginTokenExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(users::Column::LoginToken.eq(token))
            .filter(users::Column::LoginTokenExpiresAt.gt(now))
            .exec_with_returning(&self.db)
            .await
            .context("consume login token")?;
        Ok(rows.into_iter().next().map(user_from_model))
    }

    async fn find_by_login_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::LoginToken.eq(token))
            .one(&self.db)
            .await
            .context("find user by login token")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

async fn grant_role(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    role: RoleName,
) -> Result<(), DbErr> {
    let role_row = roles::Entity::find()
        .filter(roles::Column::Name.eq(role.as_str()))
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("seed role missing: {role}")))?;
    user_roles::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_row.id),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        login_token: model.login_token,
        login_token_expires_at: model.login_token_expires_at,
        created_at: model.created_at,
    }
}

// ── Role repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl DbRoleRepository {
    async fn role_ids_of(&self, user_id: Uuid) -> Result<Vec<i32>, ApiError> {
        let rows = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list user role ids")?;
        Ok(rows.into_iter().map(|r| r.role_id).collect())
    }

    async fn find_role_id(&self, role: RoleName) -> Result<i32, ApiError> {
        let row = roles::Entity::find()
            .filter(roles::Column::Name.eq(role.as_str()))
            .one(&self.db)
            .await
            .context("find role by name")?;
        row.map(|r| r.id).ok_or(ApiError::RoleNotFound)
    }
}

impl RoleRepository for DbRoleRepository {
    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<RoleName>, ApiError> {
        let role_ids = self.role_ids_of(user_id).await?;
        if role_ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = roles::Entity::find()
            .filter(roles::Column::Id.is_in(role_ids))
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .context("list roles by id")?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.name.parse().context("role row outside closed set")?);
        }
        Ok(names)
    }

    async fn permissions_of(&self, user_id: Uuid) -> Result<Vec<Permission>, ApiError> {
        let role_ids = self.role_ids_of(user_id).await?;
        if role_ids.is_empty() {
            return Ok(vec![]);
        }
        let grants = role_permissions::Entity::find()
            .filter(role_permissions::Column::RoleId.is_in(role_ids))
            .all(&self.db)
            .await
            .context("list role permission grants")?;
        let mut permission_ids: Vec<i32> = grants.into_iter().map(|g| g.permission_id).collect();
        permission_ids.sort_unstable();
        permission_ids.dedup();
        if permission_ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = permissions::Entity::find()
            .filter(permissions::Column::Id.is_in(permission_ids))
            .order_by_asc(permissions::Column::Id)
            .all(&self.db)
            .await
            .context("list permissions by id")?;
        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.name.parse().context("permission row outside closed set")?);
        }
        Ok(names)
    }

    async fn assign_role(&self, user_id: Uuid, role: RoleName) -> Result<(), ApiError> {
        let role_id = self.find_role_id(role).await?;
        let insert = user_roles::Entity::insert(user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .on_conflict(
            OnConflict::columns([user_roles::Column::UserId, user_roles::Column::RoleId])
                .do_nothing()
                .to_owned(),
        );
        match insert.exec(&self.db).await {
            Ok(_) => Ok(()),
            // Role already held: the assign is idempotent.
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(anyhow::Error::from(e).context("assign role").into()),
        }
    }

    async fn remove_role(&self, user_id: Uuid, role: RoleName) -> Result<(), ApiError> {
        let role_id = self.find_role_id(role).await?;
        // Zero rows affected means the role was not held; still a success.
        user_roles::Entity::delete_many()
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(user_roles::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .context("remove role")?;
        Ok(())
    }

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, ApiError> {
        let rows = roles::Entity::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .context("list roles")?;
        Ok(rows
            .into_iter()
            .map(|r| RoleRecord {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, ApiError> {
        let rows = permissions::Entity::find()
            .order_by_asc(permissions::Column::Id)
            .all(&self.db)
            .await
            .context("list permissions")?;
        Ok(rows
            .into_iter()
            .map(|p| PermissionRecord {
                id: p.id,
                name: p.name,
                description: p.description,
            })
            .collect())
    }
}

// ── Audit log repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuditLogRepository {
    pub db: DatabaseConnection,
}

impl AuditLogRepository for DbAuditLogRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<(), ApiError> {
        audit_logs::ActiveModel {
            id: Set(entry.id),
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_owned()),
            target_type: Set(entry.target_type.as_str().to_owned()),
            target_id: Set(entry.target_id.clone()),
            details: Set(entry.details.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("append audit entry")?;
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, ApiError> {
        let mut select = audit_logs::Entity::find();
        if let Some(action) = filter.action {
            select = select.filter(audit_logs::Column::Action.eq(action.as_str()));
        }
        if let Some(target_type) = filter.target_type {
            select = select.filter(audit_logs::Column::TargetType.eq(target_type.as_str()));
        }
        if let Some(from) = filter.from {
            select = select.filter(audit_logs::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(audit_logs::Column::CreatedAt.lte(to));
        }
        let page = filter.page.clamped();
        let rows = select
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .context("query audit log")?;
        rows.into_iter().map(audit_entry_from_model).collect()
    }
}

fn audit_entry_from_model(model: audit_logs::Model) -> Result<AuditEntry, ApiError> {
    Ok(AuditEntry {
        id: model.id,
        user_id: model.user_id,
        action: model.action.parse().context("audit action outside closed set")?,
        target_type: model
            .target_type
            .parse()
            .context("audit target type outside closed set")?,
        target_id: model.target_id,
        details: model.details,
        created_at: model.created_at,
    })
}

// ── Event repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

impl EventRepository for DbEventRepository {
    async fn list_all(&self) -> Result<Vec<Event>, ApiError> {
        let models = events::Entity::find()
            .order_by_desc(events::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list all events")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, ApiError> {
        let models = events::Entity::find()
            .filter(events::Column::UserId.eq(user_id))
            .order_by_desc(events::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list events for user")?;
        Ok(models.into_iter().map(event_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ApiError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        Ok(model.map(event_from_model))
    }

    async fn create(&self, event: &Event) -> Result<(), ApiError> {
        events::ActiveModel {
            id: Set(event.id),
            user_id: Set(event.user_id),
            date: Set(event.date),
            text: Set(event.text.clone()),
            created_at: Set(event.created_at),
        }
        .insert(&self.db)
        .await
        .context("create event")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
        text: Option<&str>,
    ) -> Result<bool, ApiError> {
        let mut update = events::Entity::update_many().filter(events::Column::Id.eq(id));
        if let Some(date) = date {
            update = update.col_expr(events::Column::Date, Expr::value(date));
        }
        if let Some(text) = text {
            update = update.col_expr(events::Column::Text, Expr::value(text));
        }
        let result = update.exec(&self.db).await.context("update event")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = events::Entity::delete_many()
            .filter(events::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete event")?;
        Ok(result.rows_affected > 0)
    }
}

fn event_from_model(model: events::Model) -> Event {
    Event {
        id: model.id,
        user_id: model.user_id,
        date: model.date,
        text: model.text,
        created_at: model.created_at,
    }
}
