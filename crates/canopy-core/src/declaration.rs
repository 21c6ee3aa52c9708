//! Type declaration model.
//!
//! Declarations are produced outside Canopy by a compiler front-end that has
//! already parsed the project's source files. Canopy only inspects them
//! syntactically: member names, the declared type names as written, marker
//! attributes and explicit interface specifiers.
//!
//! All types implement [`serde::Deserialize`] so that declarations can be
//! loaded from an external manifest.
//!
//! # Example
//!
//! ```
//! # use canopy_core::declaration::{Attribute, DeclarationKind, Property, TypeDeclaration};
//! let service = TypeDeclaration::new(DeclarationKind::Class, "Service", "src/Service.cs")
//!     .with_member(Property::new("Repo", "IRepo", 7).with_attribute(Attribute::new("Dependency")));
//!
//! assert_eq!(service.properties().count(), 1);
//! ```

use std::fmt;

use serde::Deserialize;

/// The syntactic kind of a type declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    #[default]
    Class,
    Record,
    Struct,
    Interface,
}

impl DeclarationKind {
    /// Returns `true` for interface declarations.
    pub fn is_interface(self) -> bool {
        matches!(self, DeclarationKind::Interface)
    }
}

/// A single attribute argument, either positional or named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeArgument {
    #[serde(default)]
    name: Option<String>,
    value: String,
}

impl AttributeArgument {
    /// Creates a named argument, e.g. `UseVSCodePaths = true`.
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// Creates a positional argument.
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// Returns the argument name for named arguments.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the argument value as written in source.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An attribute attached to a declaration or member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    name: String,
    #[serde(default)]
    arguments: Vec<AttributeArgument>,
}

impl Attribute {
    /// Creates an attribute without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Adds an argument.
    pub fn with_argument(mut self, argument: AttributeArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Returns the attribute name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute arguments in source order.
    pub fn arguments(&self) -> &[AttributeArgument] {
        &self.arguments
    }

    /// Returns `true` if this attribute is `name`, accepting the long
    /// `<name>Attribute` spelling as well.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
            || self
                .name
                .strip_suffix("Attribute")
                .is_some_and(|short| short == name)
    }

    /// Returns `true` if a named argument `name` is set to the literal `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.arguments
            .iter()
            .any(|arg| arg.name() == Some(name) && arg.value() == "true")
    }
}

fn has_attribute(attributes: &[Attribute], name: &str) -> bool {
    attributes.iter().any(|attribute| attribute.is(name))
}

/// A property (data member) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    line: usize,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default, rename = "override")]
    is_override: bool,
}

impl Property {
    /// Creates a property with its declared type name as written.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            line,
            attributes: Vec::new(),
            is_override: false,
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the property as an override.
    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        self.type_name.trim()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_override(&self) -> bool {
        self.is_override
    }

    /// Returns `true` if the property carries the attribute `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        has_attribute(&self.attributes, name)
    }
}

/// An explicit interface specifier such as `IProvide<Repo>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExplicitInterface {
    name: String,
    #[serde(default)]
    type_arguments: Vec<String>,
}

impl ExplicitInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    /// Adds a generic type argument.
    pub fn with_type_argument(mut self, type_argument: impl Into<String>) -> Self {
        self.type_arguments.push(type_argument.into());
        self
    }

    /// Returns the interface name without type arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_arguments(&self) -> &[String] {
        &self.type_arguments
    }

    /// Returns the single type argument of a one-parameter generic interface.
    pub fn single_type_argument(&self) -> Option<&str> {
        match self.type_arguments.as_slice() {
            [argument] => Some(argument.trim()),
            _ => None,
        }
    }
}

impl fmt::Display for ExplicitInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", self.type_arguments.join(", "))?;
        }
        Ok(())
    }
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Method {
    name: String,
    line: usize,
    #[serde(default)]
    explicit_interface: Option<ExplicitInterface>,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default, rename = "override")]
    is_override: bool,
}

impl Method {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            explicit_interface: None,
            attributes: Vec::new(),
            is_override: false,
        }
    }

    /// Sets the explicit interface specifier.
    pub fn with_explicit_interface(mut self, interface: ExplicitInterface) -> Self {
        self.explicit_interface = Some(interface);
        self
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the method as an override.
    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn explicit_interface(&self) -> Option<&ExplicitInterface> {
        self.explicit_interface.as_ref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_override(&self) -> bool {
        self.is_override
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Property(Property),
    Method(Method),
}

impl From<Property> for Member {
    fn from(property: Property) -> Self {
        Member::Property(property)
    }
}

impl From<Method> for Member {
    fn from(method: Method) -> Self {
        Member::Method(method)
    }
}

/// A constructor or primary-constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    line: usize,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        self.type_name.trim()
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// The parameter list of one constructor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParameterList {
    line: usize,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

impl ParameterList {
    /// Creates a parameter list declared at `line`.
    pub fn new(line: usize, parameters: Vec<Parameter>) -> Self {
        Self { line, parameters }
    }

    /// Returns the line of the constructor declaration.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// One declaration fragment of a class, record, struct or interface.
///
/// Partial types are handed in as several fragments sharing a file path;
/// they are merged when the entity index is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDeclaration {
    name: String,
    #[serde(default)]
    kind: DeclarationKind,
    file: String,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    primary_constructor: Option<ParameterList>,
    #[serde(default)]
    constructors: Vec<ParameterList>,
}

impl TypeDeclaration {
    /// Creates an empty declaration fragment.
    ///
    /// # Arguments
    ///
    /// * `kind` - Class, record, struct or interface.
    /// * `name` - The declared type identifier.
    /// * `file` - Originating source file, relative to the project root.
    pub fn new(kind: DeclarationKind, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            line: 1,
            attributes: Vec::new(),
            members: Vec::new(),
            primary_constructor: None,
            constructors: Vec::new(),
        }
    }

    /// Sets the declaration line.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Adds a type-level attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a member.
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Sets the primary constructor parameter list.
    pub fn with_primary_constructor(mut self, parameters: ParameterList) -> Self {
        self.primary_constructor = Some(parameters);
        self
    }

    /// Adds a regular constructor.
    pub fn with_constructor(mut self, parameters: ParameterList) -> Self {
        self.constructors.push(parameters);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn primary_constructor(&self) -> Option<&ParameterList> {
        self.primary_constructor.as_ref()
    }

    pub fn constructors(&self) -> &[ParameterList] {
        &self.constructors
    }

    /// Absorbs another fragment of the same partial type.
    ///
    /// Attributes, members and constructors are appended in order; the
    /// primary constructor of `self` wins when both fragments declare one.
    pub fn merge(&mut self, fragment: TypeDeclaration) {
        self.attributes.extend(fragment.attributes);
        self.members.extend(fragment.members);
        self.constructors.extend(fragment.constructors);
        if self.primary_constructor.is_none() {
            self.primary_constructor = fragment.primary_constructor;
        }
    }

    /// Returns the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.is(name))
    }

    /// Returns all property members in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(property) => Some(property),
            Member::Method(_) => None,
        })
    }

    /// Returns all method members in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Property(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_concatenates_in_order() {
        let mut first = TypeDeclaration::new(DeclarationKind::Class, "Player", "Player.cs")
            .with_member(Property::new("Health", "int", 5));
        let second = TypeDeclaration::new(DeclarationKind::Class, "Player", "Player.cs")
            .with_member(Method::new("Jump", 20))
            .with_primary_constructor(ParameterList::new(3, Vec::new()));

        first.merge(second);

        let names: Vec<_> = first
            .members()
            .iter()
            .map(|member| match member {
                Member::Property(property) => property.name(),
                Member::Method(method) => method.name(),
            })
            .collect();
        assert_eq!(names, vec!["Health", "Jump"]);
        assert_eq!(first.primary_constructor().map(|p| p.line()), Some(3));
    }

    #[test]
    fn test_attribute_long_name() {
        let attribute = Attribute::new("DependencyAttribute");
        assert!(attribute.is("Dependency"));
        assert!(!attribute.is("Depend"));
    }

    #[test]
    fn test_attribute_flag_requires_literal_true() {
        let attribute = Attribute::new("ClassDiagram")
            .with_argument(AttributeArgument::named("UseVSCodePaths", "true"))
            .with_argument(AttributeArgument::named("ShowAllMethods", "false"))
            .with_argument(AttributeArgument::positional("true"));

        assert!(attribute.flag("UseVSCodePaths"));
        assert!(!attribute.flag("ShowAllMethods"));
        assert!(!attribute.flag("ShowAllProperties"));
    }

    #[test]
    fn test_explicit_interface_display() {
        let interface = ExplicitInterface::new("IProvide").with_type_argument("IRepo");
        assert_eq!(interface.to_string(), "IProvide<IRepo>");
        assert_eq!(interface.single_type_argument(), Some("IRepo"));

        let plain = ExplicitInterface::new("IDisposable");
        assert_eq!(plain.to_string(), "IDisposable");
        assert_eq!(plain.single_type_argument(), None);
    }

    #[test]
    fn test_members_split_by_kind() {
        let declaration = TypeDeclaration::new(DeclarationKind::Class, "World", "World.cs")
            .with_member(Property::new("Repo", "IRepo", 4))
            .with_member(Method::new("Ready", 6))
            .with_member(Property::new("Score", "int", 8));

        let properties: Vec<_> = declaration.properties().map(Property::name).collect();
        let methods: Vec<_> = declaration.methods().map(Method::name).collect();

        assert_eq!(properties, vec!["Repo", "Score"]);
        assert_eq!(methods, vec!["Ready"]);
    }

    #[test]
    fn test_deserialize_manifest_entry() {
        let source = r#"
            name = "Service"
            kind = "class"
            file = "src/Service.cs"
            line = 3

            [[attributes]]
            name = "ClassDiagram"
            arguments = [{ name = "UseVSCodePaths", value = "true" }]

            [[members]]
            kind = "property"
            name = "Repo"
            type = "IRepo"
            line = 5
            attributes = [{ name = "Dependency" }]

            [[members]]
            kind = "method"
            name = "Value"
            line = 9
            explicit_interface = { name = "IProvide", type_arguments = ["Repo"] }

            [primary_constructor]
            line = 3
            parameters = [{ name = "logger", type = "ILogger", line = 3 }]
        "#;

        let declaration: TypeDeclaration = toml::from_str(source).unwrap();

        assert_eq!(declaration.name(), "Service");
        assert!(declaration.attribute("ClassDiagram").unwrap().flag("UseVSCodePaths"));
        let repo = declaration.properties().next().unwrap();
        assert!(repo.has_attribute("Dependency"));
        assert!(!repo.is_override());
        let value = declaration.methods().next().unwrap();
        assert_eq!(
            value.explicit_interface().unwrap().single_type_argument(),
            Some("Repo")
        );
        assert_eq!(
            declaration.primary_constructor().unwrap().parameters()[0].type_name(),
            "ILogger"
        );
    }
}
