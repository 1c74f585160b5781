use crate::config::AclConfig;
use crate::error::Result;
use crate::resource::{Resource, ResourceTree};
use crate::role::{Role, RoleGraph};
use crate::rule::{Access, Assertion, Operation, Rule, RuleTable};
use crate::selector::{Selector, Targets};
use log::{debug, trace};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;


// Query //////////////////////////////////////////////////////////////////////////////////////////


/// The context of one `is_allowed` call, handed to assertions. It holds the role, resource and
/// privilege as they were queried, while the resolver walks their ancestors.
#[derive(Clone, Copy)]
pub struct Query<'a> {
    acl:             &'a Acl,
    role:            &'a Selector,
    resource:        &'a Selector,
    privilege:       &'a Selector,
    role_object:     Option<&'a dyn Role>,
    resource_object: Option<&'a dyn Resource>,
} // struct Query

impl<'a> Query<'a> {

    /// The `Acl` being queried.
    #[inline]
    pub fn acl(&self) -> &'a Acl {
        self.acl
    } // acl

    #[inline]
    pub fn queried_role(&self) -> &'a Selector {
        self.role
    } // queried_role

    #[inline]
    pub fn queried_resource(&self) -> &'a Selector {
        self.resource
    } // queried_resource

    #[inline]
    pub fn queried_privilege(&self) -> &'a Selector {
        self.privilege
    } // queried_privilege

    /// The queried role object, if the query was made with `Acl::is_allowed_for`.
    #[inline]
    pub fn queried_role_object(&self) -> Option<&'a dyn Role> {
        self.role_object
    } // queried_role_object

    /// The queried resource object, if the query was made with `Acl::is_allowed_for`.
    #[inline]
    pub fn queried_resource_object(&self) -> Option<&'a dyn Resource> {
        self.resource_object
    } // queried_resource_object

} // impl Query

impl fmt::Debug for Query<'_> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("role", self.role)
            .field("resource", self.resource)
            .field("privilege", self.privilege)
            .field("role_object", &self.role_object.map(|r| r.role_id()))
            .field("resource_object", &self.resource_object.map(|r| r.resource_id()))
            .finish()
    } // fmt

} // impl fmt::Debug for Query


// Authorizator ///////////////////////////////////////////////////////////////////////////////////


/// Decides whether a role may perform a privilege on a resource.
pub trait Authorizator {
    fn is_allowed(&self, role: &Selector, resource: &Selector, privilege: &Selector) -> Result<bool>;
} // trait Authorizator

impl<A: Authorizator + ?Sized> Authorizator for &A {

    fn is_allowed(&self, role: &Selector, resource: &Selector, privilege: &Selector) -> Result<bool> {
        (**self).is_allowed(role, resource, privilege)
    } // is_allowed

} // impl Authorizator for &A

impl<A: Authorizator + ?Sized> Authorizator for Arc<A> {

    fn is_allowed(&self, role: &Selector, resource: &Selector, privilege: &Selector) -> Result<bool> {
        (**self).is_allowed(role, resource, privilege)
    } // is_allowed

} // impl Authorizator for Arc<A>


// Acl ////////////////////////////////////////////////////////////////////////////////////////////


/// Main structure holding the defined roles, resources and rules. Roles and resources are not
/// automatically defined upon rule definition, but must be declared beforehand. A catch-all rule
/// is predefined and denies access. This is like a drop-policy on firewalls.
///
/// Queries only need shared access, so a configured `Acl` may be queried from several threads at
/// once. Reconfiguring it at runtime requires external synchronization.
#[derive(Clone, Default)]
pub struct Acl {
    roles:     RoleGraph,
    resources: ResourceTree,
    rules:     RuleTable,
} // struct Acl

impl Acl {

    pub fn new() -> Self {
        trace!("creating new acl");
        Acl::default()
    } // new

    /// Builds an `Acl` from a declarative configuration. Roles are added first, then resources,
    /// then rules, each in the order given. Stops at the first error.
    pub fn from_config(config: &AclConfig) -> Result<Self> {
        trace!("creating acl from config");
        let mut acl = Acl::new();

        for role in &config.roles {
            acl.add_role(&role.name, role.parents.as_slice())?;
        } // for
        for resource in &config.resources {
            acl.add_resource(&resource.name, resource.parent.as_deref())?;
        } // for
        for rule in &config.rules {
            acl.set_rule(
                Operation::Add,
                rule.access,
                rule.roles.clone(),
                rule.resources.clone(),
                rule.privileges.clone(),
                None,
            )?;
        } // for
        Ok(acl)
    } // from_config

    // roles //////////////////////////////////////////////////////////////////////////////////////

    /// Adds a new role. The most recently added parent takes precedence over parents added before.
    /// Returns an error if role is already defined or a parent is unknown.
    pub fn add_role<S: AsRef<str>>(&mut self, name: &str, parents: &[S]) -> Result<()> {
        self.roles.add_role(name, parents)
    } // add_role

    /// Returns true if role is defined.
    #[inline]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.has_role(name)
    } // has_role

    pub fn roles(&self) -> Vec<&str> {
        self.roles.roles()
    } // roles

    /// Returns the parents of role in ascending order of priority. Returns an error if role is
    /// undefined.
    pub fn role_parents(&self, name: &str) -> Result<&[String]> {
        self.roles.parents_of(name)
    } // role_parents

    /// Returns true if role inherits from ancestor, directly only if `direct_only` is set.
    pub fn role_inherits_from(&self, role: &str, ancestor: &str, direct_only: bool) -> Result<bool> {
        self.roles.inherits_from(role, ancestor, direct_only)
    } // role_inherits_from

    /// Removes role and every rule defined for it.
    pub fn remove_role(&mut self, name: &str) -> Result<()> {
        self.roles.remove_role(name)?;
        self.rules.prune_role(name);
        Ok(())
    } // remove_role

    /// Removes all roles and every rule defined for a specific role.
    pub fn remove_all_roles(&mut self) {
        self.roles.clear();
        self.rules.prune_all_roles();
    } // remove_all_roles

    // resources //////////////////////////////////////////////////////////////////////////////////

    /// Adds a new resource. Returns an error if resource is already defined or parent is unknown.
    pub fn add_resource(&mut self, name: &str, parent: Option<&str>) -> Result<()> {
        self.resources.add_resource(name, parent)
    } // add_resource

    /// Returns true if resource is defined.
    #[inline]
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.has_resource(name)
    } // has_resource

    pub fn resources(&self) -> Vec<&str> {
        self.resources.resources()
    } // resources

    /// Returns the parent of resource or None. Returns an error if resource is undefined.
    pub fn resource_parent(&self, name: &str) -> Result<Option<&str>> {
        self.resources.parent_of(name)
    } // resource_parent

    /// Returns true if resource inherits from ancestor, directly only if `direct_only` is set.
    pub fn resource_inherits_from(&self, resource: &str, ancestor: &str, direct_only: bool) -> Result<bool> {
        self.resources.inherits_from(resource, ancestor, direct_only)
    } // resource_inherits_from

    /// Removes resource, its descendants and every rule defined for them.
    pub fn remove_resource(&mut self, name: &str) -> Result<()> {
        let removed = self.resources.remove_resource(name)?;

        self.rules.prune_resources(&removed);
        Ok(())
    } // remove_resource

    /// Removes all resources and every rule defined for a specific resource.
    pub fn remove_all_resources(&mut self) {
        self.resources.clear();
        self.rules.prune_all_resources();
    } // remove_all_resources

    // rules //////////////////////////////////////////////////////////////////////////////////////

    /// Allows privileges for roles on resources. Returns an error if a role or resource is
    /// undefined.
    #[inline]
    pub fn allow<R, S, P>(&mut self, roles: R, resources: S, privileges: P) -> Result<()>
    where R: Into<Targets>, S: Into<Targets>, P: Into<Targets>
    {
        self.set_rule(Operation::Add, Access::Allow, roles, resources, privileges, None)
    } // allow

    /// Like `allow`, but the rule only applies if `assertion` holds.
    pub fn allow_if<R, S, P, F>(&mut self, roles: R, resources: S, privileges: P, assertion: F) -> Result<()>
    where
        R: Into<Targets>, S: Into<Targets>, P: Into<Targets>,
        F: Fn(&Query<'_>, &Selector, &Selector, &Selector) -> bool + Send + Sync + 'static
    {
        self.set_rule(Operation::Add, Access::Allow, roles, resources, privileges, Some(Arc::new(assertion)))
    } // allow_if

    /// Denies privileges for roles on resources. Returns an error if a role or resource is
    /// undefined.
    #[inline]
    pub fn deny<R, S, P>(&mut self, roles: R, resources: S, privileges: P) -> Result<()>
    where R: Into<Targets>, S: Into<Targets>, P: Into<Targets>
    {
        self.set_rule(Operation::Add, Access::Deny, roles, resources, privileges, None)
    } // deny

    /// Like `deny`, but the rule only applies if `assertion` holds.
    pub fn deny_if<R, S, P, F>(&mut self, roles: R, resources: S, privileges: P, assertion: F) -> Result<()>
    where
        R: Into<Targets>, S: Into<Targets>, P: Into<Targets>,
        F: Fn(&Query<'_>, &Selector, &Selector, &Selector) -> bool + Send + Sync + 'static
    {
        self.set_rule(Operation::Add, Access::Deny, roles, resources, privileges, Some(Arc::new(assertion)))
    } // deny_if

    /// Removes allow rules. Deny rules of the same roles, resources and privileges are kept.
    #[inline]
    pub fn remove_allow<R, S, P>(&mut self, roles: R, resources: S, privileges: P) -> Result<()>
    where R: Into<Targets>, S: Into<Targets>, P: Into<Targets>
    {
        self.set_rule(Operation::Remove, Access::Allow, roles, resources, privileges, None)
    } // remove_allow

    /// Removes deny rules. Allow rules of the same roles, resources and privileges are kept.
    #[inline]
    pub fn remove_deny<R, S, P>(&mut self, roles: R, resources: S, privileges: P) -> Result<()>
    where R: Into<Targets>, S: Into<Targets>, P: Into<Targets>
    {
        self.set_rule(Operation::Remove, Access::Deny, roles, resources, privileges, None)
    } // remove_deny

    /// Adds or removes rules for every combination of roles and resources. `Targets::All` is a
    /// wildcard; named roles and resources must be predefined. All of them are checked before
    /// any rule is touched. An empty privilege list is treated like `Targets::All`.
    pub fn set_rule<R, S, P>(
        &mut self,
        operation: Operation,
        access: Access,
        roles: R,
        resources: S,
        privileges: P,
        assertion: Option<Arc<dyn Assertion>>,
    ) -> Result<()>
    where R: Into<Targets>, S: Into<Targets>, P: Into<Targets>
    {
        let roles      = roles.into().selectors();
        let resources  = resources.into().selectors();
        let privileges = match privileges.into() {
            Targets::All          => vec![],
            Targets::Named(names) => names,
        }; // match

        trace!("{:?} {:?} for {:?} on {:?} to {:?}", operation, access, roles, resources, privileges);

        // ensure that roles and resources are defined
        for role in &roles {
            if let Selector::Named(name) = role {
                self.roles.check(name)?;
            } // if
        } // for
        for resource in &resources {
            if let Selector::Named(name) = resource {
                self.resources.check(name)?;
            } // if
        } // for

        match operation {
            Operation::Add    => self.rules.add(&resources, &roles, &privileges, &Rule::new(access, assertion)),
            Operation::Remove => self.rules.remove(&resources, &roles, &privileges, access),
        } // match
        Ok(())
    } // set_rule

    // queries ////////////////////////////////////////////////////////////////////////////////////

    /// Returns true if role may perform privilege on resource. Any of them may be the wildcard.
    /// Returns an error if a named role or resource is undefined.
    ///
    /// # Precedence
    ///
    /// Resources are searched from the queried one up to its root and finally the wildcard
    /// resource. On each resource level the role graph is searched depth first, starting at the
    /// queried role. The parent added last is visited first. Then the rules for all roles on that
    /// resource level are checked. The first applicable rule decides.
    pub fn is_allowed<R, S, P>(&self, role: R, resource: S, privilege: P) -> Result<bool>
    where R: Into<Selector>, S: Into<Selector>, P: Into<Selector>
    {
        let role      = role.into();
        let resource  = resource.into();
        let privilege = privilege.into();

        self.resolve(Query{
            acl:             self,
            role:            &role,
            resource:        &resource,
            privilege:       &privilege,
            role_object:     None,
            resource_object: None,
        })
    } // is_allowed

    /// Like `is_allowed`, but queries role and resource objects by their ids. `None` stands for
    /// the wildcard. Assertions get the objects through `Query::queried_role_object` and
    /// `Query::queried_resource_object`.
    pub fn is_allowed_for<P>(&self, role: Option<&dyn Role>, resource: Option<&dyn Resource>, privilege: P) -> Result<bool>
    where P: Into<Selector>
    {
        let role_name     = Selector::from(role.map(|r| r.role_id()));
        let resource_name = Selector::from(resource.map(|r| r.resource_id()));
        let privilege     = privilege.into();

        self.resolve(Query{
            acl:             self,
            role:            &role_name,
            resource:        &resource_name,
            privilege:       &privilege,
            role_object:     role,
            resource_object: resource,
        })
    } // is_allowed_for

    fn resolve(&self, query: Query<'_>) -> Result<bool> {
        let Query{role, resource, privilege, ..} = query;

        trace!("querying {} on {} to {}", role, resource, privilege);
        if let Selector::Named(name) = role {
            self.roles.check(name)?;
        } // if

        let mut levels: Vec<Selector> = match resource {
            Selector::All         => vec![],
            Selector::Named(name) => self.resources.ancestor_chain(name)?
                .into_iter()
                .map(Selector::from)
                .collect(),
        }; // match

        levels.push(Selector::All);

        for level in &levels {
            if let Selector::Named(name) = role {
                if let Some(access) = self.search_roles(&query, name, level)? {
                    debug!("{} on {} to {}: {:?} by role rule on {}", role, resource, privilege, access, level);
                    return Ok(access == Access::Allow);
                } // if
            } // if
            if let Some(access) = self.query_privileges(&query, level, &Selector::All) {
                debug!("{} on {} to {}: {:?} by rule for all roles on {}", role, resource, privilege, access, level);
                return Ok(access == Access::Allow);
            } // if
        } // for

        // the catch-all rule always decides, this is not reached
        debug!("{} on {} to {}: no rule", role, resource, privilege);
        Ok(false)
    } // resolve

    /// Returns true if role may not perform privilege on resource.
    #[inline]
    pub fn is_denied<R, S, P>(&self, role: R, resource: S, privilege: P) -> Result<bool>
    where R: Into<Selector>, S: Into<Selector>, P: Into<Selector>
    {
        self.is_allowed(role, resource, privilege).map(|allowed| !allowed)
    } // is_denied

    /// Depth first search on the role graph, starting at role. Parents are pushed in insertion
    /// order, so the parent added last is popped first.
    fn search_roles(&self, query: &Query<'_>, role: &str, resource: &Selector) -> Result<Option<Access>> {
        let mut visited = HashSet::new();
        let mut stack   = vec![role];

        while let Some(current) = stack.pop() {
            if visited.contains(current) {
                continue;
            } // if
            trace!("    searching role {} on {}", current, resource);
            if let Some(access) = self.query_privileges(query, resource, &Selector::from(current)) {
                return Ok(Some(access));
            } // if
            visited.insert(current);
            stack.extend(self.roles.parents_of(current)?.iter().map(String::as_str));
        } // while
        Ok(None)
    } // search_roles

    /// Resolves the rules of one (resource, role) pair for the queried privilege. A query for
    /// all privileges is denied by any applicable privilege override denying access.
    fn query_privileges(&self, query: &Query<'_>, resource: &Selector, role: &Selector) -> Option<Access> {
        if query.privilege.is_all() {
            let set = self.rules.lookup(resource, role)?;

            for privilege in set.by_privilege.keys() {
                if self.rule_type(query, resource, role, &Selector::from(privilege)) == Some(Access::Deny) {
                    return Some(Access::Deny);
                } // if
            } // for
            self.rule_type(query, resource, role, &Selector::All)
        } else {
            self.rule_type(query, resource, role, query.privilege)
                .or_else(|| self.rule_type(query, resource, role, &Selector::All))
        } // else
    } // query_privileges

    /// Returns the access of a single rule, or None if there is no such rule or its assertion
    /// fails. A failing assertion on the catch-all rule inverts it instead, so that rule always
    /// decides.
    fn rule_type(&self, query: &Query<'_>, resource: &Selector, role: &Selector, privilege: &Selector) -> Option<Access> {
        let set  = self.rules.lookup(resource, role)?;
        let rule = match privilege {
            Selector::All      => set.all_privileges.as_ref()?,
            Selector::Named(p) => set.by_privilege.get(p)?,
        }; // match

        match &rule.assertion {
            None => Some(rule.access),
            Some(assertion) if assertion.assert(query, role, resource, privilege) => Some(rule.access),
            Some(_) if resource.is_all() && role.is_all() && privilege.is_all() => Some(!rule.access),
            Some(_) => None,
        } // match
    } // rule_type

} // impl Acl

impl Authorizator for Acl {

    fn is_allowed(&self, role: &Selector, resource: &Selector, privilege: &Selector) -> Result<bool> {
        Acl::is_allowed(self, role, resource, privilege)
    } // is_allowed

} // impl Authorizator for Acl

impl fmt::Debug for Acl {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rules.fmt(f)
    } // fmt

} // impl fmt::Debug for Acl


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
