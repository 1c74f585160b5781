use crate::acl::Query;
use crate::selector::Selector;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::ops::Not;
use std::sync::Arc;


// Access /////////////////////////////////////////////////////////////////////////////////////////


/// Allow or deny access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Allow,
    Deny
} // enum Access

impl Not for Access {
    type Output = Access;

    fn not(self) -> Access {
        match self {
            Access::Allow => Access::Deny,
            Access::Deny  => Access::Allow,
        } // match
    } // not

} // impl Not for Access

/// Whether `set_rule` adds rules or retracts them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
} // enum Operation


// Assertion //////////////////////////////////////////////////////////////////////////////////////


/// A runtime condition attached to a rule. The rule only applies if the assertion holds.
///
/// `role`, `resource` and `privilege` are the selectors of the rule under evaluation, which may
/// be wildcards or ancestors of the queried ones. Use `query` to get at the originally queried
/// role and resource. Assertions must not have side effects.
pub trait Assertion: Send + Sync {
    fn assert(&self, query: &Query<'_>, role: &Selector, resource: &Selector, privilege: &Selector) -> bool;
} // trait Assertion

impl<F> Assertion for F
where
    F: Fn(&Query<'_>, &Selector, &Selector, &Selector) -> bool + Send + Sync
{
    fn assert(&self, query: &Query<'_>, role: &Selector, resource: &Selector, privilege: &Selector) -> bool {
        self(query, role, resource, privilege)
    } // assert

} // impl Assertion for F


// Rule ///////////////////////////////////////////////////////////////////////////////////////////


/// The granted access and an optional assertion gating it.
#[derive(Clone)]
pub struct Rule {
    pub access:    Access,
    pub assertion: Option<Arc<dyn Assertion>>,
} // struct Rule

impl Rule {

    pub fn new(access: Access, assertion: Option<Arc<dyn Assertion>>) -> Self {
        Rule{access, assertion}
    } // new

} // impl Rule

impl fmt::Debug for Rule {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("access", &self.access)
            .field("assertion", &self.assertion.is_some())
            .finish()
    } // fmt

} // impl fmt::Debug for Rule

/// The rules of one (resource, role) pair: a default rule for all privileges plus overrides for
/// single privileges.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    pub all_privileges: Option<Rule>,
    pub by_privilege:   BTreeMap<String, Rule>,
} // struct RuleSet

impl RuleSet {

    /// The rule set of the catch-all cell, denying everything.
    fn deny_all() -> Self {
        RuleSet{
            all_privileges: Some(Rule::new(Access::Deny, None)),
            by_privilege:   BTreeMap::new(),
        } // RuleSet
    } // deny_all

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all_privileges.is_none() && self.by_privilege.is_empty()
    } // is_empty

} // impl RuleSet


// RuleTable //////////////////////////////////////////////////////////////////////////////////////


type Cell = (Selector, Selector);

const ROOT: Cell = (Selector::All, Selector::All);

/// Sparse table of rule sets keyed by (resource, role). The (all resources, all roles) cell
/// always exists and denies everything unless told otherwise.
#[derive(Clone)]
pub struct RuleTable {
    cells: HashMap<Cell, RuleSet>,
} // struct RuleTable

impl RuleTable {

    pub fn new() -> Self {
        let mut cells = HashMap::new();

        cells.insert(ROOT, RuleSet::deny_all());
        RuleTable{cells}
    } // new

    /// Returns the rule set for resource and role if one was defined.
    #[inline]
    pub fn lookup(&self, resource: &Selector, role: &Selector) -> Option<&RuleSet> {
        self.cells.get(&(resource.clone(), role.clone()))
    } // lookup

    fn lookup_or_create(&mut self, resource: &Selector, role: &Selector) -> &mut RuleSet {
        self.cells.entry((resource.clone(), role.clone())).or_default()
    } // lookup_or_create

    /// Number of defined cells, the catch-all cell included.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    } // len

    /// Sets `rule` on every (resource, role) pair. An empty privilege list addresses the default
    /// rule of the pair, otherwise one override per privilege is set.
    pub fn add(&mut self, resources: &[Selector], roles: &[Selector], privileges: &[String], rule: &Rule) {
        for resource in resources {
            for role in roles {
                trace!("setting {:?} for {} on {} to {:?}", rule.access, role, resource, privileges);
                let set = self.lookup_or_create(resource, role);

                if privileges.is_empty() {
                    set.all_privileges = Some(rule.clone());
                } else {
                    for privilege in privileges {
                        set.by_privilege.insert(privilege.clone(), rule.clone());
                    } // for
                } // else
            } // for
        } // for
    } // add

    /// Retracts rules of type `access` from every (resource, role) pair. Rules of the opposite
    /// type are kept. Retracting the default of the catch-all cell resets it to deny.
    pub fn remove(&mut self, resources: &[Selector], roles: &[Selector], privileges: &[String], access: Access) {
        for resource in resources {
            for role in roles {
                let cell = (resource.clone(), role.clone());
                let set  = match self.cells.get_mut(&cell) {
                    Some(set) => set,
                    None      => continue,
                }; // match

                trace!("removing {:?} for {} on {} to {:?}", access, role, resource, privileges);
                if privileges.is_empty() {
                    let matches = set.all_privileges.as_ref().map_or(false, |r| r.access == access);

                    if cell == ROOT {
                        if matches {
                            *set = RuleSet::deny_all();
                        } // if
                        continue;
                    } // if
                    if matches {
                        set.all_privileges = None;
                    } // if
                } else {
                    for privilege in privileges {
                        if set.by_privilege.get(privilege).map_or(false, |r| r.access == access) {
                            set.by_privilege.remove(privilege);
                        } // if
                    } // for
                } // else
                if cell != ROOT && set.is_empty() {
                    self.cells.remove(&cell);
                } // if
            } // for
        } // for
    } // remove

    /// Drops every cell of the role.
    pub fn prune_role(&mut self, role: &str) {
        trace!("pruning rules of role {}", role);
        self.cells.retain(|(_, r), _| r.name() != Some(role));
    } // prune_role

    /// Drops every cell of the resources.
    pub fn prune_resources(&mut self, resources: &[String]) {
        trace!("pruning rules of resources {:?}", resources);
        let names: HashSet<&str> = resources.iter().map(String::as_str).collect();

        self.cells.retain(|(r, _), _| r.name().map_or(true, |name| !names.contains(name)));
    } // prune_resources

    /// Drops every cell keyed by a specific role.
    pub fn prune_all_roles(&mut self) {
        self.cells.retain(|(_, role), _| role.is_all());
    } // prune_all_roles

    /// Drops every cell keyed by a specific resource.
    pub fn prune_all_resources(&mut self) {
        self.cells.retain(|(resource, _), _| resource.is_all());
    } // prune_all_resources

} // impl RuleTable

impl Default for RuleTable {

    fn default() -> Self {
        RuleTable::new()
    } // default

} // impl Default for RuleTable

impl fmt::Debug for RuleTable {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.fmt(f)
    } // fmt

} // impl fmt::Debug for RuleTable


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
