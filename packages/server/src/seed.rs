use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{fish, notice, role, role_permission, user_competition};

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &["admin", "angler"];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("admin", "competition:manage"),
    ("admin", "fish:verify"),
    ("admin", "content:manage"),
    ("admin", "dashboard:view"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => roles_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => perms_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

async fn ensure_index(db: &DatabaseConnection, name: &str, stmt: String) {
    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}

/// Ensure required database indexes exist.
///
/// Schema sync doesn't create composite non-unique indexes, so they are
/// created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Scoring history and per-competition fish lists:
    // WHERE competition_id = ? AND user_id = ? AND status = ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_fish_competition_user_status")
        .table(fish::Entity)
        .col(fish::Column::CompetitionId)
        .col(fish::Column::UserId)
        .col(fish::Column::Status)
        .to_string(PostgresQueryBuilder);
    ensure_index(db, "idx_fish_competition_user_status", stmt).await;

    // Participations of a user
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_user_competition_user")
        .table(user_competition::Entity)
        .col(user_competition::Column::UserId)
        .to_string(PostgresQueryBuilder);
    ensure_index(db, "idx_user_competition_user", stmt).await;

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_notice_updated")
        .table(notice::Entity)
        .col(notice::Column::UpdatedDate)
        .to_string(PostgresQueryBuilder);
    ensure_index(db, "idx_notice_updated", stmt).await;

    Ok(())
}
