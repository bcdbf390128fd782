use sea_orm_migration::prelude::*;

use roombook_domain::permission::{ALL_PERMISSIONS, Permission};
use roombook_domain::role::{ALL_ROLES, RoleName};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seed the closed role and permission sets and the grant matrix.
///
/// Ids are fixed (seed order, 1-based) — both sets are closed, so no rows are
/// ever inserted outside this migration.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert_roles = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name, Roles::Description])
            .to_owned();
        for (idx, role) in ALL_ROLES.into_iter().enumerate() {
            insert_roles.values_panic([
                (idx as i32 + 1).into(),
                role.as_str().into(),
                role.description().into(),
            ]);
        }
        manager.exec_stmt(insert_roles).await?;

        let mut insert_permissions = Query::insert()
            .into_table(Permissions::Table)
            .columns([Permissions::Id, Permissions::Name, Permissions::Description])
            .to_owned();
        for (idx, permission) in ALL_PERMISSIONS.into_iter().enumerate() {
            insert_permissions.values_panic([
                (idx as i32 + 1).into(),
                permission.as_str().into(),
                permission.description().into(),
            ]);
        }
        manager.exec_stmt(insert_permissions).await?;

        let mut insert_grants = Query::insert()
            .into_table(RolePermissions::Table)
            .columns([RolePermissions::RoleId, RolePermissions::PermissionId])
            .to_owned();
        for role in ALL_ROLES {
            for permission in granted_permissions(role) {
                insert_grants.values_panic([role_id(role).into(), permission_id(permission).into()]);
            }
        }
        manager.exec_stmt(insert_grants).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Permissions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Roles::Table).to_owned())
            .await
    }
}

fn role_id(role: RoleName) -> i32 {
    ALL_ROLES.iter().position(|r| *r == role).unwrap() as i32 + 1
}

fn permission_id(permission: Permission) -> i32 {
    ALL_PERMISSIONS
        .iter()
        .position(|p| *p == permission)
        .unwrap() as i32
        + 1
}

/// The seed grant matrix.
fn granted_permissions(role: RoleName) -> Vec<Permission> {
    match role {
        RoleName::Admin => ALL_PERMISSIONS.to_vec(),
        RoleName::Teacher => vec![
            Permission::ViewEvents,
            Permission::CreateEvents,
            Permission::UpdateEvents,
            Permission::DeleteEvents,
            Permission::ViewAllEvents,
            Permission::ViewLogs,
        ],
        RoleName::Student => vec![Permission::ViewEvents, Permission::CreateEvents],
    }
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
}

#[derive(Iden)]
enum Permissions {
    Table,
    Id,
    Name,
    Description,
}

#[derive(Iden)]
enum RolePermissions {
    Table,
    RoleId,
    PermissionId,
}
