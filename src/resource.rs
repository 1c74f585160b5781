use crate::error::{Error, Result};
use log::{trace, warn};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};


// Resource ///////////////////////////////////////////////////////////////////////////////////////


/// An object to which access is controlled, e.g. a single blog post. It is queried by its
/// resource id and handed to assertions as it is, so they can check ownership and the like.
pub trait Resource {
    fn resource_id(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
} // trait Resource

impl<'a> dyn Resource + 'a {

    /// Returns the concrete resource if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    } // downcast_ref

} // impl dyn Resource

impl Resource for String {

    fn resource_id(&self) -> &str {
        self
    } // resource_id

    fn as_any(&self) -> &dyn Any {
        self
    } // as_any

} // impl Resource for String


// ResourceTree ///////////////////////////////////////////////////////////////////////////////////


#[derive(Clone, Debug, Default)]
struct ResourceNode {
    parent:   Option<String>,
    children: BTreeSet<String>,
} // struct ResourceNode

/// Tree of named resources. Resources without a parent hang below the implicit "all resources"
/// root.
#[derive(Clone, Debug, Default)]
pub struct ResourceTree {
    resources: BTreeMap<String, ResourceNode>,
} // struct ResourceTree

impl ResourceTree {

    pub fn new() -> Self {
        ResourceTree::default()
    } // new

    /// Returns an error if the name is empty or the resource is undefined.
    pub fn check(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            warn!("empty resource name");
            return Err(Error::InvalidName("resource"));
        } // if
        if !self.resources.contains_key(name) {
            warn!("unknown resource: {}", name);
            return Err(Error::UnknownResource(String::from(name)));
        } // if
        Ok(())
    } // check

    /// Adds a new resource. Returns an error if resource is already defined or parent is unknown.
    pub fn add_resource(&mut self, name: &str, parent: Option<&str>) -> Result<()> {
        trace!("adding resource {} with parent {:?}", name, parent);
        if name.is_empty() {
            warn!("adding resource with empty name");
            return Err(Error::InvalidName("resource"));
        } // if
        if self.resources.contains_key(name) {
            warn!("adding duplicate resource: {}", name);
            return Err(Error::DuplicateResource(String::from(name)));
        } // if
        if let Some(parent) = parent {
            self.check(parent)?;
            if let Some(p) = self.resources.get_mut(parent) {
                p.children.insert(String::from(name));
            } // if
        } // if
        self.resources.insert(String::from(name), ResourceNode{
            parent:   parent.map(String::from),
            children: BTreeSet::new(),
        });
        Ok(())
    } // add_resource

    /// Returns true if resource is defined. Never fails, not even for an empty name.
    #[inline]
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    } // has_resource

    /// Returns the names of all resources.
    pub fn resources(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    } // resources

    /// Returns the parent of resource or None.
    pub fn parent_of(&self, name: &str) -> Result<Option<&str>> {
        trace!("getting resource parent for: {}", name);
        self.check(name)?;
        Ok(self.resources[name].parent.as_deref())
    } // parent_of

    /// Returns the resource followed by its ancestors, from the most specific to the least
    /// specific. The implicit root is not part of the chain.
    pub fn ancestor_chain(&self, name: &str) -> Result<Vec<&str>> {
        trace!("getting resource lineage for: {}", name);
        self.check(name)?;

        let mut chain   = vec![];
        let mut current = self.resources.get_key_value(name);

        while let Some((name, node)) = current {
            chain.push(name.as_str());
            current = node.parent.as_deref().and_then(|p| self.resources.get_key_value(p));
        } // while
        Ok(chain)
    } // ancestor_chain

    /// Returns true if resource inherits from ancestor. With `direct_only` set, ancestor must be
    /// the parent.
    pub fn inherits_from(&self, resource: &str, ancestor: &str, direct_only: bool) -> Result<bool> {
        trace!("checking if resource {} inherits from {}", resource, ancestor);
        self.check(ancestor)?;

        let chain = self.ancestor_chain(resource)?;

        if direct_only {
            return Ok(chain.get(1) == Some(&ancestor));
        } // if
        Ok(chain[1..].contains(&ancestor))
    } // inherits_from

    /// Removes resource and all of its descendants. Returns the removed names, resource first,
    /// followed by its descendants in pre-order.
    pub fn remove_resource(&mut self, name: &str) -> Result<Vec<String>> {
        trace!("removing resource {}", name);
        self.check(name)?;

        // collect first, the tree is not touched while walking it
        let mut removed = vec![];
        let mut stack   = vec![String::from(name)];

        while let Some(current) = stack.pop() {
            if let Some(node) = self.resources.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
            } // if
            removed.push(current);
        } // while

        if let Some(parent) = self.resources[name].parent.clone() {
            if let Some(p) = self.resources.get_mut(&parent) {
                p.children.remove(name);
            } // if
        } // if
        for current in &removed {
            self.resources.remove(current);
        } // for
        Ok(removed)
    } // remove_resource

    /// Removes every resource.
    pub fn clear(&mut self) {
        trace!("removing all resources");
        self.resources.clear();
    } // clear

} // impl ResourceTree


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use test_env_log::test;

    fn setup_tree() -> ResourceTree {
        let mut tree = ResourceTree::new();

        assert!(tree.add_resource("newsletter", None).is_ok());
        assert!(tree.add_resource("news", None).is_ok());
        assert!(tree.add_resource("latest", Some("news")).is_ok());
        assert!(tree.add_resource("anouncement", Some("news")).is_ok());
        assert!(tree.add_resource("breaking", Some("latest")).is_ok());
        tree
    } // setup_tree

    #[test]
    fn resources() {
        let mut tree = setup_tree();

        assert!(tree.has_resource("news"));
        assert!(!tree.has_resource("blog post"));
        assert!(!tree.has_resource(""));

        assert_eq!(tree.add_resource("news", None), Err(Error::DuplicateResource(String::from("news"))));
        assert_eq!(tree.add_resource("", None), Err(Error::InvalidName("resource")));
        assert_eq!(tree.add_resource("x", Some("nothing")), Err(Error::UnknownResource(String::from("nothing"))));
        assert!(!tree.has_resource("x"));

        assert_eq!(tree.parent_of("latest"), Ok(Some("news")));
        assert_eq!(tree.parent_of("news"), Ok(None));
    } // resources

    #[test]
    fn lineage() {
        let tree = setup_tree();

        assert_eq!(tree.ancestor_chain("breaking").unwrap(), vec!["breaking", "latest", "news"]);
        assert_eq!(tree.ancestor_chain("news").unwrap(), vec!["news"]);
        assert_eq!(tree.ancestor_chain("nothing"), Err(Error::UnknownResource(String::from("nothing"))));

        assert!(tree.inherits_from("breaking", "latest", true).unwrap());
        assert!(!tree.inherits_from("breaking", "news", true).unwrap());
        assert!(tree.inherits_from("breaking", "news", false).unwrap());
        assert!(!tree.inherits_from("news", "news", false).unwrap());
        assert!(!tree.inherits_from("newsletter", "news", false).unwrap());
    } // lineage

    #[test]
    fn removal() {
        let mut tree = setup_tree();

        assert_eq!(tree.remove_resource("news").unwrap(), vec!["news", "anouncement", "latest", "breaking"]);
        assert_eq!(tree.resources(), vec!["newsletter"]);
        assert_eq!(tree.remove_resource("news"), Err(Error::UnknownResource(String::from("news"))));

        let mut tree = setup_tree();

        assert_eq!(tree.remove_resource("latest").unwrap(), vec!["latest", "breaking"]);
        assert!(tree.add_resource("latest", Some("news")).is_ok());
        assert_eq!(tree.ancestor_chain("latest").unwrap(), vec!["latest", "news"]);

        tree.clear();
        assert!(tree.resources().is_empty());
    } // removal

    #[test]
    fn resource_objects() {
        let name   = String::from("news");
        let object: &dyn Resource = &name;

        assert_eq!(object.resource_id(), "news");
        assert_eq!(object.downcast_ref::<String>(), Some(&name));
        assert!(object.downcast_ref::<u32>().is_none());
    } // resource_objects

} // mod tests
