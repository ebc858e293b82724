//! Managed resources, one module per Terraform resource type.

mod comment;
mod component;
mod custom_field;
mod filter;
mod group;
mod group_membership;
mod issue;
mod issue_link;
mod issue_link_type;
mod issue_type;
mod issue_type_scheme;
mod project;
pub(crate) mod project_category;
mod project_membership;
mod role;
mod user;
mod webhook;

pub use comment::CommentResource;
pub use component::ComponentResource;
pub use custom_field::CustomFieldResource;
pub use filter::{FilterResource, Permission};
pub use group::GroupResource;
pub use group_membership::GroupMembershipResource;
pub use issue::IssueResource;
pub use issue_link::IssueLinkResource;
pub use issue_link_type::IssueLinkTypeResource;
pub use issue_type::IssueTypeResource;
pub use issue_type_scheme::IssueTypeSchemeResource;
pub use project::ProjectResource;
pub use project_category::ProjectCategoryResource;
pub use project_membership::ProjectMembershipResource;
pub use role::RoleResource;
pub use user::UserResource;
pub use webhook::WebhookResource;
