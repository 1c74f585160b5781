use crate::error::{Error, Result};
use log::{trace, warn};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashSet};


// Role ///////////////////////////////////////////////////////////////////////////////////////////


/// An object that may request access, e.g. a logged in member. It is queried by its role id and
/// handed to assertions as it is, so they can inspect the concrete type.
pub trait Role {
    fn role_id(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
} // trait Role

impl<'a> dyn Role + 'a {

    /// Returns the concrete role if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    } // downcast_ref

} // impl dyn Role

impl Role for String {

    fn role_id(&self) -> &str {
        self
    } // role_id

    fn as_any(&self) -> &dyn Any {
        self
    } // as_any

} // impl Role for String


// RoleGraph //////////////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Debug, Default)]
struct RoleNode {
    // in insertion order, the last one has the highest priority
    parents:  Vec<String>,
    children: BTreeSet<String>,
} // struct RoleNode

/// Directed graph of named roles. A role may inherit from several parent roles.
#[derive(Clone, Debug, Default)]
pub struct RoleGraph {
    roles: BTreeMap<String, RoleNode>,
} // struct RoleGraph

impl RoleGraph {

    pub fn new() -> Self {
        RoleGraph::default()
    } // new

    /// Returns an error if the name is empty or the role is undefined.
    pub fn check(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            warn!("empty role name");
            return Err(Error::InvalidName("role"));
        } // if
        if !self.roles.contains_key(name) {
            warn!("unknown role: {}", name);
            return Err(Error::UnknownRole(String::from(name)));
        } // if
        Ok(())
    } // check

    /// Adds a new role. The most recently added parent takes precedence over the parents added
    /// before it. Returns an error if the role is already defined or a parent is unknown.
    pub fn add_role<S: AsRef<str>>(&mut self, name: &str, parents: &[S]) -> Result<()> {
        trace!("adding role {}", name);
        if name.is_empty() {
            warn!("adding role with empty name");
            return Err(Error::InvalidName("role"));
        } // if
        if self.roles.contains_key(name) {
            warn!("adding duplicate role: {}", name);
            return Err(Error::DuplicateRole(String::from(name)));
        } // if

        let mut node = RoleNode::default();

        for parent in parents {
            let parent = parent.as_ref();

            self.check(parent)?;
            // a repeated parent keeps the position of its first occurrence
            if !node.parents.iter().any(|p| p == parent) {
                node.parents.push(String::from(parent));
            } // if
        } // for
        for parent in &node.parents {
            if let Some(p) = self.roles.get_mut(parent) {
                p.children.insert(String::from(name));
            } // if
        } // for
        self.roles.insert(String::from(name), node);
        Ok(())
    } // add_role

    /// Returns true if role is defined. Never fails, not even for an empty name.
    #[inline]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    } // has_role

    /// Returns the names of all roles.
    pub fn roles(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    } // roles

    /// Returns the parents of role in ascending order of priority.
    pub fn parents_of(&self, name: &str) -> Result<&[String]> {
        trace!("getting role parents for: {}", name);
        self.check(name)?;
        Ok(self.roles[name].parents.as_slice())
    } // parents_of

    /// Returns the roles directly inheriting from role.
    pub fn children_of(&self, name: &str) -> Result<Vec<&str>> {
        self.check(name)?;
        Ok(self.roles[name].children.iter().map(String::as_str).collect())
    } // children_of

    /// Returns true if role inherits from ancestor. With `direct_only` set, ancestor must be a
    /// direct parent.
    pub fn inherits_from(&self, role: &str, ancestor: &str, direct_only: bool) -> Result<bool> {
        trace!("checking if role {} inherits from {}", role, ancestor);
        self.check(role)?;
        self.check(ancestor)?;

        let parents = &self.roles[role].parents;

        if direct_only {
            return Ok(parents.iter().any(|p| p == ancestor));
        } // if

        let mut seen  = HashSet::new();
        let mut stack: Vec<&str> = parents.iter().map(String::as_str).collect();

        while let Some(current) = stack.pop() {
            if current == ancestor {
                return Ok(true);
            } // if
            if seen.insert(current) {
                if let Some(node) = self.roles.get(current) {
                    stack.extend(node.parents.iter().map(String::as_str));
                } // if
            } // if
        } // while
        Ok(false)
    } // inherits_from

    /// Removes role and unlinks it from its parents and children. Rules referencing the role are
    /// left to the caller.
    pub fn remove_role(&mut self, name: &str) -> Result<()> {
        trace!("removing role {}", name);
        self.check(name)?;

        let node = match self.roles.remove(name) {
            Some(node) => node,
            None       => return Err(Error::UnknownRole(String::from(name))),
        }; // match

        for child in &node.children {
            if let Some(c) = self.roles.get_mut(child) {
                c.parents.retain(|p| p != name);
            } // if
        } // for
        for parent in &node.parents {
            if let Some(p) = self.roles.get_mut(parent) {
                p.children.remove(name);
            } // if
        } // for
        Ok(())
    } // remove_role

    /// Removes every role.
    pub fn clear(&mut self) {
        trace!("removing all roles");
        self.roles.clear();
    } // clear

} // impl RoleGraph


// Tests //////////////////////////////////////////////////////////////////////////////////////////


// mod tests
