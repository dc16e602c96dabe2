//! Request and response bodies of the JSON API.

pub mod members;
pub mod orders;

pub use members::{
    CreateMemberRequest, CreateMemberResponse, ListResult, MemberEntityRequest, MemberNameDto,
    UpdateMemberRequest, UpdateMemberResponse,
};
pub use orders::{OrderDto, OrderItemDto, PageParams, SimpleOrderDto};
