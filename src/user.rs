//! The authorization side of a logged in (or anonymous) user. Persisting the authentication state
//! is left to a `UserStorage` implementation; a `User` only reads it to find the effective roles.

use crate::acl::Authorizator;
use crate::config::UserConfig;
use crate::error::Result;
use crate::selector::Selector;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;


// Identity ///////////////////////////////////////////////////////////////////////////////////////


/// Identifier of an identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IdentityId {
    Int(i64),
    Str(String),
} // enum IdentityId

impl fmt::Display for IdentityId {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IdentityId::Int(id) => write!(f, "{}", id),
            IdentityId::Str(id) => write!(f, "{}", id),
        } // match
    } // fmt

} // impl fmt::Display for IdentityId

/// An authenticated identity. Only its roles matter for authorization.
pub trait Identity: Send + Sync {
    fn id(&self) -> &IdentityId;
    fn roles(&self) -> &[String];
} // trait Identity

/// Plain identity with some free-form data attached.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SimpleIdentity {
    pub id:    IdentityId,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub data:  serde_json::Map<String, serde_json::Value>,
} // struct SimpleIdentity

impl SimpleIdentity {

    pub fn new<S: Into<String>>(id: IdentityId, roles: Vec<S>) -> Self {
        SimpleIdentity{
            id,
            roles: roles.into_iter().map(Into::into).collect(),
            data:  serde_json::Map::new(),
        } // SimpleIdentity
    } // new

} // impl SimpleIdentity

impl Identity for SimpleIdentity {

    fn id(&self) -> &IdentityId {
        &self.id
    } // id

    fn roles(&self) -> &[String] {
        &self.roles
    } // roles

} // impl Identity for SimpleIdentity


// AuthState //////////////////////////////////////////////////////////////////////////////////////


/// Why a user was logged out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoutReason {
    Manual,
    Inactivity,
} // enum LogoutReason

/// The authentication state kept by a `UserStorage`. The identity may outlive a logout.
#[derive(Clone, Default)]
pub struct AuthState {
    pub authenticated: bool,
    pub identity:      Option<Arc<dyn Identity>>,
    pub logout_reason: Option<LogoutReason>,
} // struct AuthState

impl AuthState {

    /// State of a user who never logged in.
    pub fn anonymous() -> Self {
        AuthState::default()
    } // anonymous

    pub fn authenticated(identity: Arc<dyn Identity>) -> Self {
        AuthState{authenticated: true, identity: Some(identity), logout_reason: None}
    } // authenticated

    pub fn logged_out(identity: Option<Arc<dyn Identity>>, reason: LogoutReason) -> Self {
        AuthState{authenticated: false, identity, logout_reason: Some(reason)}
    } // logged_out

} // impl AuthState

impl fmt::Debug for AuthState {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("authenticated", &self.authenticated)
            .field("identity", &self.identity.as_ref().map(|i| i.id().clone()))
            .field("logout_reason", &self.logout_reason)
            .finish()
    } // fmt

} // impl fmt::Debug for AuthState

/// Source of the authentication state, e.g. a session or a cookie.
pub trait UserStorage {
    fn state(&self) -> AuthState;
} // trait UserStorage

impl UserStorage for AuthState {

    fn state(&self) -> AuthState {
        self.clone()
    } // state

} // impl UserStorage for AuthState


// User ///////////////////////////////////////////////////////////////////////////////////////////


/// Maps the authentication state to effective roles and asks the authorizator about them.
pub struct User<S, A> {
    storage:      S,
    authorizator: A,
    config:       UserConfig,
} // struct User

impl<S: UserStorage, A: Authorizator> User<S, A> {

    /// Creates a user with the default guest and authenticated roles.
    pub fn new(storage: S, authorizator: A) -> Self {
        User::with_config(storage, authorizator, UserConfig::default())
    } // new

    pub fn with_config(storage: S, authorizator: A, config: UserConfig) -> Self {
        User{storage, authorizator, config}
    } // with_config

    pub fn storage(&self) -> &S {
        &self.storage
    } // storage

    pub fn is_logged_in(&self) -> bool {
        self.storage.state().authenticated
    } // is_logged_in

    pub fn identity(&self) -> Option<Arc<dyn Identity>> {
        self.storage.state().identity
    } // identity

    /// Id of the logged in identity.
    pub fn id(&self) -> Option<IdentityId> {
        let state = self.storage.state();

        if !state.authenticated {
            return None;
        } // if
        state.identity.map(|identity| identity.id().clone())
    } // id

    pub fn logout_reason(&self) -> Option<LogoutReason> {
        self.storage.state().logout_reason
    } // logout_reason

    /// Returns the effective roles: the guest role if not logged in, the identity's roles or,
    /// if there are none, the authenticated role.
    pub fn roles(&self) -> Vec<String> {
        let state = self.storage.state();

        if !state.authenticated {
            return vec![self.config.guest_role.clone()];
        } // if
        match state.identity {
            Some(identity) if !identity.roles().is_empty() => identity.roles().to_vec(),
            _ => vec![self.config.authenticated_role.clone()],
        } // match
    } // roles

    /// Returns true if role is one of the effective roles.
    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    } // is_in_role

    /// Returns true if any effective role may perform privilege on resource. Errors of the
    /// authorizator are passed on.
    pub fn is_allowed<R, P>(&self, resource: R, privilege: P) -> Result<bool>
    where R: Into<Selector>, P: Into<Selector>
    {
        let resource  = resource.into();
        let privilege = privilege.into();

        for role in self.roles() {
            trace!("checking user role {} on {} to {}", role, resource, privilege);
            if self.authorizator.is_allowed(&Selector::from(role), &resource, &privilege)? {
                return Ok(true);
            } // if
        } // for
        debug!("user denied {} on {}", privilege, resource);
        Ok(false)
    } // is_allowed

} // impl User


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use crate::acl::Acl;
    use crate::error::Error;
    use crate::selector::ALL;
    use std::cell::RefCell;
    use test_env_log::test;

    const NONE: &[&str] = &[];

    fn setup_acl() -> Acl {
        let mut acl = Acl::new();

        assert!(acl.add_role("guest", NONE).is_ok());
        assert!(acl.add_role("authenticated", &["guest"]).is_ok());
        assert!(acl.add_role("writer", NONE).is_ok());
        assert!(acl.add_role("admin", NONE).is_ok());
        assert!(acl.add_resource("article", None).is_ok());

        assert!(acl.allow("guest", "article", "read").is_ok());
        assert!(acl.allow("authenticated", "article", "comment").is_ok());
        assert!(acl.allow("writer", "article", "write").is_ok());
        assert!(acl.allow("admin", ALL, ALL).is_ok());
        acl
    } // setup_acl

    fn identity(roles: Vec<&str>) -> Arc<dyn Identity> {
        Arc::new(SimpleIdentity::new(IdentityId::Int(7), roles))
    } // identity

    /// Storage whose state changes like a session would.
    struct Session(RefCell<AuthState>);

    impl UserStorage for Session {

        fn state(&self) -> AuthState {
            self.0.borrow().clone()
        } // state

    } // impl UserStorage for Session

    #[test]
    fn guest() {
        let acl  = setup_acl();
        let user = User::new(AuthState::anonymous(), &acl);

        assert!(!user.is_logged_in());
        assert_eq!(user.roles(), vec!["guest"]);
        assert!(user.is_in_role("guest"));
        assert_eq!(user.id(), None);
        assert!( user.is_allowed("article", "read").unwrap());
        assert!(!user.is_allowed("article", "comment").unwrap());
    } // guest

    #[test]
    fn authenticated() {
        let acl  = setup_acl();
        let user = User::new(AuthState::authenticated(identity(vec![])), &acl);

        assert!(user.is_logged_in());
        assert_eq!(user.roles(), vec!["authenticated"]);
        assert_eq!(user.id(), Some(IdentityId::Int(7)));
        assert!(user.is_allowed("article", "read").unwrap());
        assert!(user.is_allowed("article", "comment").unwrap());
        assert!(!user.is_allowed("article", "write").unwrap());
    } // authenticated

    #[test]
    fn identity_roles() {
        let acl  = Arc::new(setup_acl());
        let user = User::new(AuthState::authenticated(identity(vec!["writer", "guest"])), acl.clone());

        assert_eq!(user.roles(), vec!["writer", "guest"]);
        assert!(!user.is_in_role("authenticated"));
        assert!(user.is_allowed("article", "write").unwrap());
        assert!(user.is_allowed("article", "read").unwrap());
        assert!(!user.is_allowed("article", "comment").unwrap());
        assert!(!user.is_allowed("article", ALL).unwrap());

        let user = User::new(AuthState::authenticated(identity(vec!["nobody"])), acl);

        assert_eq!(user.is_allowed("article", "read"), Err(Error::UnknownRole(String::from("nobody"))));
    } // identity_roles

    #[test]
    fn custom_roles() {
        let mut acl = setup_acl();

        assert!(acl.add_role("anonymous", NONE).is_ok());

        let config = UserConfig{guest_role: String::from("anonymous"), authenticated_role: String::from("member")};
        let user   = User::with_config(AuthState::anonymous(), &acl, config);

        assert_eq!(user.roles(), vec!["anonymous"]);
        assert!(!user.is_allowed("article", "read").unwrap());
    } // custom_roles

    #[test]
    fn logout() {
        let acl     = setup_acl();
        let session = Session(RefCell::new(AuthState::authenticated(identity(vec!["admin"]))));
        let user    = User::new(session, &acl);

        assert!(user.is_allowed("article", "delete").unwrap());
        assert_eq!(user.logout_reason(), None);

        let state = AuthState::logged_out(user.identity(), LogoutReason::Inactivity);

        *user.storage().0.borrow_mut() = state;

        assert!(!user.is_logged_in());
        assert_eq!(user.logout_reason(), Some(LogoutReason::Inactivity));
        assert!(user.identity().is_some());
        assert_eq!(user.id(), None);
        assert_eq!(user.roles(), vec!["guest"]);
        assert!(!user.is_allowed("article", "delete").unwrap());
    } // logout

    #[test]
    fn identity_serde() {
        let identity: SimpleIdentity = serde_json::from_str(r#"{"id": "jane", "roles": ["writer"], "data": {"age": 42}}"#).unwrap();

        assert_eq!(identity.id, IdentityId::Str(String::from("jane")));
        assert_eq!(Identity::roles(&identity), ["writer"]);
        assert_eq!(identity.data["age"], 42);
        assert_eq!(IdentityId::Int(3).to_string(), "3");
    } // identity_serde

} // mod tests
