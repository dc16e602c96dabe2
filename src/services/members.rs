use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::db::{DbPool, TxScope};
use crate::entities::member;
use crate::errors::ServiceError;
use crate::repositories::{MemberRepository, NewMember};

/// Service for registering and looking up members
#[derive(Clone)]
pub struct MemberService {
    db: Arc<DbPool>,
    members: MemberRepository,
}

impl MemberService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            db,
            members: MemberRepository::new(),
        }
    }

    /// Registers a member and returns the generated id.
    #[instrument(skip(self, member), fields(name = %member.name))]
    pub async fn join(&self, member: NewMember) -> Result<i64, ServiceError> {
        validate_name(&member.name)?;

        let scope = TxScope::begin(&self.db).await?;
        self.validate_duplicate_member(&scope, &member.name, None)
            .await?;
        let saved = self.members.save(&scope, member).await?;
        scope.commit().await?;

        info!(member_id = saved.id, "member joined");
        Ok(saved.id)
    }

    #[instrument(skip(self))]
    pub async fn find_members(&self) -> Result<Vec<member::Model>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let members = self.members.find_all(&scope).await?;
        scope.commit().await?;
        Ok(members)
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, member_id: i64) -> Result<member::Model, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let member = self
            .members
            .find_one(&scope, member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", member_id))?;
        scope.commit().await?;
        Ok(member.as_ref().clone())
    }

    /// Renames a member.
    #[instrument(skip(self))]
    pub async fn update(&self, member_id: i64, name: &str) -> Result<member::Model, ServiceError> {
        validate_name(name)?;

        let scope = TxScope::begin(&self.db).await?;
        let member = self
            .members
            .find_one(&scope, member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", member_id))?;
        self.validate_duplicate_member(&scope, name, Some(member_id))
            .await?;
        let updated = self.members.update_name(&scope, &member, name).await?;
        scope.commit().await?;

        info!(member_id, "member renamed");
        Ok(updated.as_ref().clone())
    }

    // The unique index on member.name backs this check up under concurrent joins.
    async fn validate_duplicate_member(
        &self,
        scope: &TxScope,
        name: &str,
        except: Option<i64>,
    ) -> Result<(), ServiceError> {
        let existing = self.members.find_by_name(scope, name).await?;
        if existing.iter().any(|m| Some(m.id) != except) {
            warn!(name, "duplicate member rejected");
            return Err(ServiceError::DuplicateMember(format!(
                "member already exists: {}",
                name
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "member name is required".to_string(),
        ));
    }
    Ok(())
}
