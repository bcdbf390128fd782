use uuid::Uuid;

use roombook_api::usecase::audit::AuditWriter;
use roombook_api::usecase::rbac::{
    AssignRoleUseCase, HasPermissionUseCase, ListRolesUseCase, RemoveRoleUseCase,
};
use roombook_domain::permission::{ALL_PERMISSIONS, Permission};
use roombook_domain::role::RoleName;

use crate::helpers::{MockAuditRepo, MockRoleRepo};

#[tokio::test]
async fn should_union_permissions_across_roles() {
    let user_id = Uuid::new_v4();
    let uc = HasPermissionUseCase {
        roles: MockRoleRepo::new(vec![
            (user_id, RoleName::Student),
            (user_id, RoleName::Teacher),
        ]),
    };

    // Student alone cannot update; the teacher role adds it.
    assert!(uc.execute(user_id, Permission::UpdateEvents).await);
    assert!(uc.execute(user_id, Permission::ViewEvents).await);
    assert!(!uc.execute(user_id, Permission::ManageRoles).await);
}

#[tokio::test]
async fn should_deny_user_without_roles() {
    let uc = HasPermissionUseCase {
        roles: MockRoleRepo::empty(),
    };
    assert!(!uc.execute(Uuid::new_v4(), Permission::ViewEvents).await);
}

#[tokio::test]
async fn should_fail_closed_on_storage_error() {
    let uc = HasPermissionUseCase {
        roles: MockRoleRepo::failing(),
    };
    // Even a permission every role grants resolves to false when the
    // lookup cannot complete.
    assert!(!uc.execute(Uuid::new_v4(), Permission::ViewEvents).await);
}

#[tokio::test]
async fn should_treat_double_assign_as_noop() {
    let actor = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let roles = MockRoleRepo::empty();
    let assignments = roles.assignments_handle();

    let uc = AssignRoleUseCase {
        roles,
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    };

    uc.execute(actor, user_id, RoleName::Teacher).await.unwrap();
    uc.execute(actor, user_id, RoleName::Teacher).await.unwrap();

    assert_eq!(
        assignments.lock().unwrap().len(),
        1,
        "assigning a held role must not duplicate the membership"
    );
}

#[tokio::test]
async fn should_lose_permission_with_sole_granting_role() {
    let actor = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let roles = MockRoleRepo::new(vec![(user_id, RoleName::Student), (user_id, RoleName::Teacher)]);

    let check = HasPermissionUseCase {
        roles: roles.clone(),
    };
    assert!(check.execute(user_id, Permission::ViewLogs).await);

    RemoveRoleUseCase {
        roles: roles.clone(),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(actor, user_id, RoleName::Teacher)
    .await
    .unwrap();

    assert!(
        !check.execute(user_id, Permission::ViewLogs).await,
        "teacher was the only role granting view_logs"
    );
    // Student grants survive.
    assert!(check.execute(user_id, Permission::ViewEvents).await);
}

#[tokio::test]
async fn should_remove_unheld_role_silently() {
    let result = RemoveRoleUseCase {
        roles: MockRoleRepo::empty(),
        audit: AuditWriter {
            repo: MockAuditRepo::empty(),
        },
    }
    .execute(Uuid::new_v4(), Uuid::new_v4(), RoleName::Admin)
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn should_audit_role_membership_changes() {
    let actor = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let audit = MockAuditRepo::empty();
    let entries = audit.entries_handle();
    let roles = MockRoleRepo::empty();

    AssignRoleUseCase {
        roles: roles.clone(),
        audit: AuditWriter {
            repo: audit.clone(),
        },
    }
    .execute(actor, user_id, RoleName::Teacher)
    .await
    .unwrap();

    RemoveRoleUseCase {
        roles,
        audit: AuditWriter { repo: audit },
    }
    .execute(actor, user_id, RoleName::Teacher)
    .await
    .unwrap();

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.user_id == Some(actor)));
    assert!(entries.iter().all(|e| e.target_id == Some(user_id.to_string())));
}

#[tokio::test]
async fn should_list_full_catalog() {
    let catalog = ListRolesUseCase {
        roles: MockRoleRepo::empty(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(catalog.roles.len(), 3);
    assert_eq!(catalog.permissions.len(), ALL_PERMISSIONS.len());
    assert!(catalog.permissions.iter().any(|p| p.name == "view_all_events"));
}
