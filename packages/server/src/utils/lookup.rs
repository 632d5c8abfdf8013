use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{competition, fish, fish_image, fish_type, profile, user};
use crate::error::AppError;
use crate::models::fish::FishImageResponse;
use crate::models::shared::UserSummary;

/// Look up a competition by ID, returning 404 if not found.
pub async fn find_competition<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<competition::Model, AppError> {
    competition::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("COMPETITION.NOT_FOUND"))
}

/// Look up a fish by ID, returning 404 if not found.
pub async fn find_fish<C: ConnectionTrait>(db: &C, id: i32) -> Result<fish::Model, AppError> {
    fish::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("FISH_NOT_FOUND"))
}

/// Reject references to fish types that do not exist.
pub async fn require_fish_type<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    fish_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("FISH_TYPE_NOT_FOUND"))?;
    Ok(())
}

/// Batch-load the public identity of every user in `ids`.
pub async fn user_summaries<C, I>(db: &C, ids: I) -> Result<HashMap<i32, UserSummary>, AppError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let profiles: HashMap<i32, profile::Model> = profile::Entity::find()
        .filter(profile::Column::UserId.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect();

    let summaries = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| {
            let profile = profiles.get(&u.id);
            let summary = UserSummary {
                id: u.id,
                username: u.username,
                nickname: profile.map(|p| p.nickname.clone()),
                style: profile.map(|p| p.style.clone()),
                level: profile.map(|p| p.level),
                avatar: profile.and_then(|p| p.avatar.clone()),
            };
            (summary.id, summary)
        })
        .collect();

    Ok(summaries)
}

/// Take the summary of `id` out of a batch, falling back to a bare id.
pub fn summary_of(users: &HashMap<i32, UserSummary>, id: i32) -> UserSummary {
    users
        .get(&id)
        .cloned()
        .unwrap_or_else(|| UserSummary::unknown(id))
}

pub async fn fish_type_names<C, I>(db: &C, ids: I) -> Result<HashMap<i32, String>, AppError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let ids: Vec<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(fish_type::Entity::find()
        .filter(fish_type::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect())
}

pub async fn competition_names<C, I>(db: &C, ids: I) -> Result<HashMap<i32, String>, AppError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let ids: Vec<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(competition::Entity::find()
        .filter(competition::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Images of each fish in `fish_ids`, oldest first.
pub async fn images_by_fish<C: ConnectionTrait>(
    db: &C,
    fish_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<FishImageResponse>>, AppError> {
    if fish_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut images: HashMap<i32, Vec<FishImageResponse>> = HashMap::new();
    for img in fish_image::Entity::find()
        .filter(fish_image::Column::FishId.is_in(fish_ids))
        .order_by_asc(fish_image::Column::Id)
        .all(db)
        .await?
    {
        images.entry(img.fish_id).or_default().push(FishImageResponse {
            id: img.id,
            image: img.image,
        });
    }
    Ok(images)
}
