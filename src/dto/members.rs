use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::member;
use crate::models::Address;
use crate::repositories::NewMember;

/// Wraps a list so fields can be added next to it without breaking clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResult<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResult<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MemberNameDto {
    pub name: String,
}

impl From<member::Model> for MemberNameDto {
    fn from(member: member::Model) -> Self {
        Self { name: member.name }
    }
}

/// Member body shaped like the stored entity.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MemberEntityRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
}

impl From<MemberEntityRequest> for NewMember {
    fn from(request: MemberEntityRequest) -> Self {
        NewMember::new(request.name, request.address)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberResponse {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_result_counts_its_data() {
        let result = ListResult::new(vec![
            MemberNameDto { name: "a".into() },
            MemberNameDto { name: "b".into() },
        ]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["data"][1]["name"], "b");
    }

    #[test]
    fn empty_name_fails_validation() {
        let request = CreateMemberRequest {
            name: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
