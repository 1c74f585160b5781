//! Declarative configuration of an `Acl` and of the fallback roles of a `User`.
//!
//! ```rust
//! # use rbac_acl::{Acl, AclConfig};
//! let config = AclConfig::from_json(r#"{
//!     "roles": [
//!         {"name": "guest"},
//!         {"name": "member", "parents": ["guest"]}
//!     ],
//!     "resources": [
//!         {"name": "site"},
//!         {"name": "post", "parent": "site"}
//!     ],
//!     "rules": [
//!         {"access": "allow", "roles": ["guest"], "resources": ["site"], "privileges": ["read"]},
//!         {"access": "deny", "roles": ["member"], "resources": ["post"], "privileges": ["delete"]}
//!     ]
//! }"#)?;
//! let acl = Acl::from_config(&config)?;
//!
//! assert!(acl.is_allowed("member", "post", "read")?);
//! # Ok::<(), rbac_acl::Error>(())
//! ```

use crate::error::Result;
use crate::rule::Access;
use log::trace;
use serde::{Deserialize, Serialize};


/// A role and the roles it inherits from, in ascending order of priority.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub name:    String,
    #[serde(default)]
    pub parents: Vec<String>,
} // struct RoleConfig

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name:   String,
    #[serde(default)]
    pub parent: Option<String>,
} // struct ResourceConfig

/// An allow or deny rule. A missing list of roles, resources or privileges is a wildcard.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub access:     Access,
    #[serde(default)]
    pub roles:      Option<Vec<String>>,
    #[serde(default)]
    pub resources:  Option<Vec<String>>,
    #[serde(default)]
    pub privileges: Option<Vec<String>>,
} // struct RuleConfig

/// Roles, resources and rules, applied in this order by `Acl::from_config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AclConfig {
    pub roles:     Vec<RoleConfig>,
    pub resources: Vec<ResourceConfig>,
    pub rules:     Vec<RuleConfig>,
} // struct AclConfig

impl AclConfig {

    pub fn from_json(json: &str) -> Result<Self> {
        trace!("parsing acl config");
        Ok(serde_json::from_str(json)?)
    } // from_json

} // impl AclConfig

/// The roles a `User` falls back to when there are no identity roles.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Role of a user who is not logged in.
    pub guest_role:         String,
    /// Role of a logged in user whose identity has no roles.
    pub authenticated_role: String,
} // struct UserConfig

impl Default for UserConfig {

    fn default() -> Self {
        UserConfig{
            guest_role:         String::from("guest"),
            authenticated_role: String::from("authenticated"),
        } // UserConfig
    } // default

} // impl Default for UserConfig

impl UserConfig {

    pub fn from_json(json: &str) -> Result<Self> {
        trace!("parsing user config");
        Ok(serde_json::from_str(json)?)
    } // from_json

} // impl UserConfig


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use crate::acl::Acl;
    use crate::error::Error;
    use crate::selector::ALL;
    use test_env_log::test;

    const CMS: &str = r#"{
        "roles": [
            {"name": "guest"},
            {"name": "staff", "parents": ["guest"]},
            {"name": "editor", "parents": ["staff"]},
            {"name": "admin"}
        ],
        "resources": [
            {"name": "news"},
            {"name": "latest", "parent": "news"}
        ],
        "rules": [
            {"access": "allow", "roles": ["guest"], "privileges": ["view"]},
            {"access": "allow", "roles": ["staff"], "privileges": ["edit", "submit", "revise"]},
            {"access": "deny", "roles": ["staff"], "resources": ["latest"], "privileges": ["revise"]},
            {"access": "allow", "roles": ["admin"]}
        ]
    }"#;

    #[test]
    fn parse() {
        let config = AclConfig::from_json(CMS).unwrap();

        assert_eq!(config.roles.len(), 4);
        assert_eq!(config.roles[1], RoleConfig{name: String::from("staff"), parents: vec![String::from("guest")]});
        assert_eq!(config.resources[0].parent, None);
        assert_eq!(config.resources[1].parent.as_deref(), Some("news"));
        assert_eq!(config.rules[0].access, Access::Allow);
        assert_eq!(config.rules[0].resources, None);
        assert_eq!(config.rules[2].access, Access::Deny);

        assert_eq!(AclConfig::from_json("{}").unwrap(), AclConfig::default());
    } // parse

    #[test]
    fn build() {
        let acl = Acl::from_config(&AclConfig::from_json(CMS).unwrap()).unwrap();

        assert!( acl.is_allowed("editor", "news", "view").unwrap());
        assert!( acl.is_allowed("editor", "news", "revise").unwrap());
        assert!(!acl.is_allowed("editor", "latest", "revise").unwrap());
        assert!( acl.is_allowed("admin", "latest", ALL).unwrap());
        assert!(!acl.is_allowed("guest", ALL, "edit").unwrap());
    } // build

    #[test]
    fn invalid() {
        assert!(matches!(AclConfig::from_json("{\"roles\": 1}"), Err(Error::Config(_))));
        assert!(matches!(AclConfig::from_json("{\"users\": []}"), Err(Error::Config(_))));
        assert!(matches!(
            AclConfig::from_json(r#"{"rules": [{"access": "maybe"}]}"#),
            Err(Error::Config(_))
        ));

        let config = AclConfig::from_json(r#"{"roles": [{"name": "staff", "parents": ["guest"]}]}"#).unwrap();

        assert_eq!(Acl::from_config(&config).unwrap_err(), Error::UnknownRole(String::from("guest")));

        let config = AclConfig::from_json(r#"{"rules": [{"access": "allow", "resources": ["news"]}]}"#).unwrap();

        assert_eq!(Acl::from_config(&config).unwrap_err(), Error::UnknownResource(String::from("news")));
    } // invalid

    #[test]
    fn user() {
        assert_eq!(UserConfig::from_json("{}").unwrap(), UserConfig::default());

        let config = UserConfig::from_json(r#"{"guest_role": "anonymous"}"#).unwrap();

        assert_eq!(config.guest_role, "anonymous");
        assert_eq!(config.authenticated_role, "authenticated");
    } // user

} // mod tests
