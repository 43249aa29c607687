//! Parsed program entities as produced by the external source analyzer.
//!
//! Nothing here carries logic beyond lookups: the model is immutable input
//! for [`GraphBuilder`](crate::GraphBuilder).

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Reference to a named entity, optionally qualified by its package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Package (import alias) the entity lives in. `None` means "this package".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<String>,
    /// Entity name inside the package.
    pub name: String,
}

impl EntityRef {
    /// Reference to an entity in the current package.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            pkg: None,
            name: name.into(),
        }
    }

    /// Reference to an entity in another package.
    pub fn qualified(pkg: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pkg: Some(pkg.into()),
            name: name.into(),
        }
    }

    /// The package qualifier, treating an empty string as absent.
    pub fn pkg(&self) -> Option<&str> {
        self.pkg.as_deref().filter(|pkg| !pkg.is_empty())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pkg() {
            Some(pkg) => write!(f, "{}.{}", pkg, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Render an optional reference as `name` or `pkg.name`; a missing
/// reference renders as an empty label.
pub fn format_entity_ref(entity_ref: Option<&EntityRef>) -> String {
    entity_ref.map(ToString::to_string).unwrap_or_default()
}

/// Closed set of entity kinds. The kind selects both the renderer and the
/// hover rules that apply to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Component,
    Interface,
    Type,
    Const,
    /// Instantiated sub-node inside a component.
    Node,
    /// Connection record inside a component's network.
    Net,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Component,
        EntityKind::Interface,
        EntityKind::Type,
        EntityKind::Const,
        EntityKind::Node,
        EntityKind::Net,
    ];

    /// Lowercase name, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Component => "component",
            EntityKind::Interface => "interface",
            EntityKind::Type => "type",
            EntityKind::Const => "const",
            EntityKind::Node => "node",
            EntityKind::Net => "net",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.label() == key)
            .ok_or_else(|| GraphError::UnknownEntityKind(s.to_string()))
    }
}

/// Port sets of an interface, keyed by port name. Values are the type
/// expressions as printed by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Io {
    #[serde(default)]
    pub inports: IndexMap<String, String>,
    #[serde(default)]
    pub outports: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default)]
    pub io: Io,
}

/// A component instantiated as a node of another component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub entity_ref: EntityRef,
}

/// Address of a port on a node. The node names `in` and `out` address the
/// enclosing component's own interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortAddr {
    pub node: String,
    pub port: String,
}

impl PortAddr {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }

    /// Whether this address points at the enclosing component's interface.
    pub fn is_self(&self) -> bool {
        self.node == "in" || self.node == "out"
    }
}

impl fmt::Display for PortAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}

/// Sending end of a connection: either a node's outport or a const.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderSide {
    Port(PortAddr),
    Const(EntityRef),
}

/// One network record: a sender fanned out to one or more receivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub sender: SenderSide,
    #[serde(default)]
    pub receivers: Vec<PortAddr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub interface: Interface,
    #[serde(default)]
    pub nodes: IndexMap<String, Instance>,
    #[serde(default)]
    pub net: Vec<Connection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(default)]
    pub expr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstDef {
    #[serde(default)]
    pub value: String,
}

/// Kind-specific body of a package-level entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityBody {
    Component(Component),
    Interface(Interface),
    Type(TypeDef),
    Const(ConstDef),
}

/// A package-level entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub exported: bool,
    #[serde(flatten)]
    pub body: EntityBody,
}

impl Entity {
    pub fn component(component: Component) -> Self {
        Self {
            exported: false,
            body: EntityBody::Component(component),
        }
    }

    pub fn interface(io: Io) -> Self {
        Self {
            exported: false,
            body: EntityBody::Interface(Interface { io }),
        }
    }

    pub fn type_def(expr: impl Into<String>) -> Self {
        Self {
            exported: false,
            body: EntityBody::Type(TypeDef { expr: expr.into() }),
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self {
            exported: false,
            body: EntityBody::Const(ConstDef {
                value: value.into(),
            }),
        }
    }

    /// Mark the entity as exported from its package.
    pub fn exported(mut self) -> Self {
        self.exported = true;
        self
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            EntityBody::Component(_) => EntityKind::Component,
            EntityBody::Interface(_) => EntityKind::Interface,
            EntityBody::Type(_) => EntityKind::Type,
            EntityBody::Const(_) => EntityKind::Const,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match &self.body {
            EntityBody::Component(component) => Some(component),
            _ => None,
        }
    }
}

/// Entities of one package, keyed by name in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub entities: IndexMap<String, Entity>,
}

/// Whole program as seen by the diagram: packages keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityModel {
    #[serde(default)]
    pub packages: IndexMap<String, Package>,
}

impl EntityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from the analyzer's JSON output.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Insert an entity, creating its package on first use.
    pub fn with_entity(
        mut self,
        pkg: impl Into<String>,
        name: impl Into<String>,
        entity: Entity,
    ) -> Self {
        self.packages
            .entry(pkg.into())
            .or_default()
            .entities
            .insert(name.into(), entity);
        self
    }

    /// Total number of package-level entities.
    pub fn entity_count(&self) -> usize {
        self.packages.values().map(|p| p.entities.len()).sum()
    }

    /// Resolve a reference made from inside `current_pkg`.
    ///
    /// Returns the owning package name together with the entity.
    pub fn resolve<'a>(
        &'a self,
        entity_ref: &EntityRef,
        current_pkg: &str,
    ) -> Option<(&'a str, &'a Entity)> {
        let pkg = entity_ref.pkg().unwrap_or(current_pkg);
        let (pkg_name, package) = self.packages.get_key_value(pkg)?;
        package
            .entities
            .get(&entity_ref.name)
            .map(|entity| (pkg_name.as_str(), entity))
    }
}
