use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use tracing::debug;

use crate::db::TxScope;
use crate::entities::member::{self, Entity as Member};
use crate::errors::ServiceError;
use crate::models::Address;

use super::{find_in_scope, MAX_RESULTS};

/// Data for a member that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub address: Option<Address>,
}

impl NewMember {
    pub fn new(name: impl Into<String>, address: Option<Address>) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemberRepository;

impl MemberRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn save(
        &self,
        scope: &TxScope,
        member: NewMember,
    ) -> Result<Arc<member::Model>, ServiceError> {
        scope.ensure_writable()?;
        let (city, street, zipcode) = Address::into_columns(member.address);
        let saved = member::ActiveModel {
            name: Set(member.name.clone()),
            city: Set(city),
            street: Set(street),
            zipcode: Set(zipcode),
            ..Default::default()
        }
        .insert(scope.conn())
        .await
        .map_err(|e| ServiceError::from_member_write(e, &member.name))?;

        debug!(member_id = saved.id, "member inserted");
        Ok(scope.identity().register(saved.id, saved))
    }

    pub async fn find_one(
        &self,
        scope: &TxScope,
        id: i64,
    ) -> Result<Option<Arc<member::Model>>, ServiceError> {
        find_in_scope::<Member>(scope, id).await
    }

    pub async fn find_all(&self, scope: &TxScope) -> Result<Vec<member::Model>, ServiceError> {
        Ok(Member::find()
            .order_by_asc(member::Column::Id)
            .limit(MAX_RESULTS)
            .all(scope.conn())
            .await?)
    }

    pub async fn find_by_name(
        &self,
        scope: &TxScope,
        name: &str,
    ) -> Result<Vec<member::Model>, ServiceError> {
        Ok(Member::find()
            .filter(member::Column::Name.eq(name))
            .all(scope.conn())
            .await?)
    }

    /// Renames a member loaded in this scope and refreshes the identity map entry.
    pub async fn update_name(
        &self,
        scope: &TxScope,
        member: &member::Model,
        name: &str,
    ) -> Result<Arc<member::Model>, ServiceError> {
        scope.ensure_writable()?;
        let mut active: member::ActiveModel = member.clone().into();
        active.name = Set(name.to_string());
        let updated = active
            .update(scope.conn())
            .await
            .map_err(|e| ServiceError::from_member_write(e, name))?;

        Ok(scope.identity().register(updated.id, updated))
    }
}
