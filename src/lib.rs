//! Hierarchical role-based access control with role and resource inheritance.
//!
//! An `Acl` answers one question: may this *role* perform this *privilege* on this *resource*?
//!
//! * a *resource* is an object to which access is controlled.
//! * a *role* is an object that may request access to a resource.
//! * a *privilege* is an action which may be granted on a resource to a role.
//!
//! Each of them may be replaced by the wildcard [`ALL`] in rules and queries.
//!
//! # Resources
//!
//! Resources form a tree and must be named uniquely. A query on a resource also considers the rules
//! of its ancestors, from the most specific to the least specific, and finally the rules defined
//! for all resources. A resource may have only one parent.
//!
//! # Roles
//!
//! A role may inherit from several roles. When several parents have conflicting rules, the parent
//! added *last* wins. The inheritance graph is searched depth first, so a grandparent reached through
//! the winning parent is visited before any lower priority parent:
//!
//! ```rust
//! # use rbac_acl::{Acl, ALL};
//! let mut acl = Acl::new();
//! let none: &[&str] = &[];
//!
//! acl.add_role("guest", none)?;
//! acl.add_role("member", none)?;
//! acl.add_role("admin", none)?;
//! acl.add_role("someUser", &["guest", "member", "admin"])?;
//! acl.add_resource("someResource", None)?;
//!
//! acl.deny("guest", "someResource", ALL)?;
//! acl.allow("member", "someResource", ALL)?;
//!
//! // admin has no rule, member is visited next
//! assert!(acl.is_allowed("someUser", "someResource", ALL)?);
//! # Ok::<(), rbac_acl::Error>(())
//! ```
//!
//! # Defining Access Controls
//!
//! A new `Acl` denies everything, like a drop policy on a firewall. Rules are added with
//! [`Acl::allow`] and [`Acl::deny`], each taking one or several roles, resources and privileges.
//! In general a rule is obeyed if and only if a more specific rule does not apply:
//!
//! ```rust
//! # use rbac_acl::{Acl, ALL};
//! let mut acl = Acl::new();
//! let none: &[&str] = &[];
//!
//! acl.add_role("guest", none)?;
//! acl.add_role("staff", &["guest"])?;
//! acl.add_role("editor", &["staff"])?;
//! acl.add_role("admin", none)?;
//!
//! acl.add_resource("news", None)?;
//! acl.add_resource("latest", Some("news"))?;
//! acl.add_resource("anouncement", Some("news"))?;
//!
//! acl.allow("guest", ALL, "view")?;
//! acl.allow("staff", ALL, ["edit", "submit", "revise"])?;
//! acl.allow("editor", ALL, ["publish", "archive", "delete"])?;
//! acl.allow("admin", ALL, ALL)?;
//!
//! // staff may not revise the latest news, nobody may archive announcements
//! acl.deny("staff", "latest", "revise")?;
//! acl.deny(ALL, "anouncement", "archive")?;
//!
//! assert!( acl.is_allowed("editor", "news", "view")?);
//! assert!(!acl.is_allowed("staff", "news", "publish")?);
//! assert!( acl.is_allowed("staff", "news", "revise")?);
//! assert!(!acl.is_allowed("editor", "latest", "revise")?);
//! assert!( acl.is_allowed("admin", "latest", "revise")?);
//! assert!(!acl.is_allowed("admin", "anouncement", "archive")?);
//! # Ok::<(), rbac_acl::Error>(())
//! ```
//!
//! A query for all privileges is only allowed if no privilege is denied explicitly on the same
//! level:
//!
//! ```rust
//! # use rbac_acl::{Acl, ALL};
//! # let mut acl = Acl::new();
//! # acl.add_role("user", &[] as &[&str])?;
//! # acl.add_resource("panel", None)?;
//! acl.allow("user", "panel", ALL)?;
//! acl.deny("user", "panel", "shutdown")?;
//!
//! assert!( acl.is_allowed("user", "panel", "view")?);
//! assert!(!acl.is_allowed("user", "panel", ALL)?);
//! # Ok::<(), rbac_acl::Error>(())
//! ```
//!
//! # Removing Access Controls
//!
//! [`Acl::remove_allow`] and [`Acl::remove_deny`] retract rules of their own kind only. Removing a
//! role or a resource also removes its rules, removing a resource removes its descendants.
//!
//! # Assertions
//!
//! A rule may be bound to a condition that is checked whenever the rule is about to decide. The
//! condition sees what was queried through the [`Query`], even while the resolver is looking at
//! the rules of an ancestor. Queries made with [`Acl::is_allowed_for`] take [`Role`] and
//! [`Resource`] objects, which the condition may inspect:
//!
//! ```rust
//! # use rbac_acl::{Acl, Query, Resource, Role, Selector};
//! # use std::any::Any;
//! struct Author { name: String }
//! struct Post { owner: String }
//!
//! impl Role for Author {
//!     fn role_id(&self) -> &str { "author" }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! impl Resource for Post {
//!     fn resource_id(&self) -> &str { "posts" }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! let mut acl = Acl::new();
//! acl.add_role("author", &[] as &[&str])?;
//! acl.add_resource("posts", None)?;
//!
//! acl.allow_if("author", "posts", "edit", |query: &Query<'_>, _: &Selector, _: &Selector, _: &Selector| {
//!     let author = query.queried_role_object().and_then(|r| r.downcast_ref::<Author>());
//!     let post   = query.queried_resource_object().and_then(|r| r.downcast_ref::<Post>());
//!     matches!((author, post), (Some(a), Some(p)) if a.name == p.owner)
//! })?;
//!
//! let jane = Author { name: String::from("jane") };
//! let john = Author { name: String::from("john") };
//! let post = Post { owner: String::from("jane") };
//!
//! assert!( acl.is_allowed_for(Some(&jane), Some(&post), "edit")?);
//! assert!(!acl.is_allowed_for(Some(&john), Some(&post), "edit")?);
//! assert!(!acl.is_allowed("author", "posts", "edit")?);
//! # Ok::<(), rbac_acl::Error>(())
//! ```
//!
//! # Users
//!
//! A [`User`] maps an authentication state to roles: the guest role if not logged in, otherwise
//! the roles of the identity or the authenticated role if it has none. It is allowed what any of
//! its roles is allowed.

mod acl;
mod config;
mod error;
mod resource;
mod role;
mod rule;
mod selector;
mod user;

pub use crate::acl::{Acl, Authorizator, Query};
pub use crate::config::{AclConfig, ResourceConfig, RoleConfig, RuleConfig, UserConfig};
pub use crate::error::{Error, Result};
pub use crate::resource::{Resource, ResourceTree};
pub use crate::role::{Role, RoleGraph};
pub use crate::rule::{Access, Assertion, Operation, Rule, RuleSet, RuleTable};
pub use crate::selector::{Selector, Targets, ALL};
pub use crate::user::{AuthState, Identity, IdentityId, LogoutReason, SimpleIdentity, User, UserStorage};
