use std::fmt;


// Selector ///////////////////////////////////////////////////////////////////////////////////////


/// Selects a single role, resource or privilege by name, or all of them by the wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Selector {
    All,
    Named(String),
} // enum Selector

/// The wildcard selector. Usable wherever a `Selector` or `Targets` is expected.
pub const ALL: Selector = Selector::All;

impl Selector {

    /// Returns the selected name, or None for the wildcard.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        match self {
            Selector::All         => None,
            Selector::Named(name) => Some(name.as_str()),
        } // match
    } // name

    #[inline]
    pub fn is_all(&self) -> bool {
        *self == Selector::All
    } // is_all

} // impl Selector

impl From<&str> for Selector {

    fn from(name: &str) -> Self {
        Selector::Named(String::from(name))
    } // from

} // impl From<&str> for Selector

impl From<String> for Selector {

    fn from(name: String) -> Self {
        Selector::Named(name)
    } // from

} // impl From<String> for Selector

impl From<&String> for Selector {

    fn from(name: &String) -> Self {
        Selector::Named(name.clone())
    } // from

} // impl From<&String> for Selector

impl From<Option<&str>> for Selector {

    fn from(name: Option<&str>) -> Self {
        name.map_or(Selector::All, Selector::from)
    } // from

} // impl From<Option<&str>> for Selector

impl From<&Selector> for Selector {

    fn from(selector: &Selector) -> Self {
        selector.clone()
    } // from

} // impl From<&Selector> for Selector

impl fmt::Display for Selector {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selector::All         => write!(f, "*"),
            Selector::Named(name) => write!(f, "{}", name),
        } // match
    } // fmt

} // impl fmt::Display for Selector


// Targets ////////////////////////////////////////////////////////////////////////////////////////


/// Selects several roles, resources or privileges at once when defining rules. `Targets::All`
/// is the wildcard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Targets {
    All,
    Named(Vec<String>),
} // enum Targets

impl From<Selector> for Targets {

    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All         => Targets::All,
            Selector::Named(name) => Targets::Named(vec![name]),
        } // match
    } // from

} // impl From<Selector> for Targets

impl From<&str> for Targets {

    fn from(name: &str) -> Self {
        Targets::Named(vec![String::from(name)])
    } // from

} // impl From<&str> for Targets

impl From<String> for Targets {

    fn from(name: String) -> Self {
        Targets::Named(vec![name])
    } // from

} // impl From<String> for Targets

impl From<Option<&str>> for Targets {

    fn from(name: Option<&str>) -> Self {
        Targets::from(Selector::from(name))
    } // from

} // impl From<Option<&str>> for Targets

impl From<Option<Vec<String>>> for Targets {

    fn from(names: Option<Vec<String>>) -> Self {
        names.map_or(Targets::All, Targets::Named)
    } // from

} // impl From<Option<Vec<String>>> for Targets

impl From<Vec<String>> for Targets {

    fn from(names: Vec<String>) -> Self {
        Targets::Named(names)
    } // from

} // impl From<Vec<String>> for Targets

impl From<Vec<&str>> for Targets {

    fn from(names: Vec<&str>) -> Self {
        Targets::from(names.as_slice())
    } // from

} // impl From<Vec<&str>> for Targets

impl From<&[&str]> for Targets {

    fn from(names: &[&str]) -> Self {
        Targets::Named(names.iter().map(|name| String::from(*name)).collect())
    } // from

} // impl From<&[&str]> for Targets

impl<const N: usize> From<[&str; N]> for Targets {

    fn from(names: [&str; N]) -> Self {
        Targets::from(&names[..])
    } // from

} // impl From<[&str; N]> for Targets

impl Targets {

    /// Expands the targets to the selectors used as rule keys. An empty list selects nothing.
    pub(crate) fn selectors(&self) -> Vec<Selector> {
        match self {
            Targets::All          => vec![Selector::All],
            Targets::Named(names) => names.iter().map(Selector::from).collect(),
        } // match
    } // selectors

} // impl Targets


// Tests //////////////////////////////////////////////////////////////////////////////////////////


#[cfg(test)]
mod tests {

    use super::*;
    use test_env_log::test;

    #[test]
    fn conversions() {
        assert_eq!(Selector::from("guest"), Selector::Named(String::from("guest")));
        assert_eq!(Selector::from(None::<&str>), ALL);
        assert_eq!(Selector::from(Some("guest")).name(), Some("guest"));
        assert!(ALL.is_all());
        assert_eq!(ALL.name(), None);

        assert_eq!(Targets::from(ALL), Targets::All);
        assert_eq!(Targets::from("guest"), Targets::Named(vec![String::from("guest")]));
        assert_eq!(
            Targets::from(["guest", "staff"]),
            Targets::Named(vec![String::from("guest"), String::from("staff")])
        );
        assert_eq!(Targets::from(None::<Vec<String>>), Targets::All);
    } // conversions

    #[test]
    fn selectors() {
        assert_eq!(Targets::All.selectors(), vec![ALL]);
        assert_eq!(Targets::Named(vec![]).selectors(), Vec::<Selector>::new());
        assert_eq!(Targets::from(vec!["a", "b"]).selectors(), vec![Selector::from("a"), Selector::from("b")]);
    } // selectors

    #[test]
    fn display() {
        assert_eq!(ALL.to_string(), "*");
        assert_eq!(Selector::from("news").to_string(), "news");
    } // display

} // mod tests
