//! Sections - the independently transformable regions of a wireframe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{rotate_point, Geometry, Point, Size, Skew};

/// Unique identifier for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(Uuid);

impl SectionId {
    /// Create a new unique section ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a component inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(Uuid);

impl ComponentId {
    /// Create a new unique component ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of page block a section represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    /// Large headline block.
    Hero,
    /// Top navigation bar.
    Navigation,
    /// Feature grid.
    Features,
    /// Pricing tiers.
    Pricing,
    /// Customer quotes.
    Testimonials,
    /// Call to action.
    Cta,
    /// Frequently asked questions.
    Faq,
    /// Page footer.
    Footer,
    /// Contact form.
    Contact,
    /// Image gallery.
    Gallery,
    /// Team members.
    Team,
    /// Key numbers.
    Stats,
    /// Free-form block.
    Custom,
}

impl SectionType {
    /// Size a new section of this type gets when none is given.
    #[must_use]
    pub fn default_size(self) -> Size {
        match self {
            Self::Navigation => Size::new(1200.0, 80.0),
            Self::Hero => Size::new(1200.0, 600.0),
            Self::Features | Self::Pricing | Self::Team => Size::new(1200.0, 500.0),
            Self::Testimonials | Self::Gallery => Size::new(1200.0, 400.0),
            Self::Cta | Self::Stats => Size::new(1200.0, 240.0),
            Self::Faq | Self::Contact => Size::new(1200.0, 450.0),
            Self::Footer => Size::new(1200.0, 240.0),
            Self::Custom => Size::new(400.0, 300.0),
        }
    }

    /// Human-readable label used as the default section name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Navigation => "Navigation",
            Self::Features => "Features",
            Self::Pricing => "Pricing",
            Self::Testimonials => "Testimonials",
            Self::Cta => "Call to Action",
            Self::Faq => "FAQ",
            Self::Footer => "Footer",
            Self::Contact => "Contact",
            Self::Gallery => "Gallery",
            Self::Team => "Team",
            Self::Stats => "Stats",
            Self::Custom => "Section",
        }
    }
}

/// Kinds of content element nested in a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Paragraph text.
    Text,
    /// Heading text.
    Heading,
    /// Button.
    Button,
    /// Image placeholder.
    Image,
    /// Hyperlink.
    Link,
    /// Form input.
    Input,
    /// Icon.
    Icon,
    /// Layout container for child components.
    Container,
    /// Horizontal rule.
    Divider,
}

/// A content element. The engine never looks inside these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier.
    pub id: ComponentId,
    /// Element kind.
    pub kind: ComponentKind,
    /// Free-form properties (text, href, src, ...).
    #[serde(default)]
    pub props: BTreeMap<String, String>,
    /// Nested components.
    #[serde(default)]
    pub children: Vec<Component>,
}

impl Component {
    /// Create an empty component of the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            id: ComponentId::new(),
            kind,
            props: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set a property.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Deep copy with fresh ids throughout the subtree.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ComponentId::new(),
            kind: self.kind,
            props: self.props.clone(),
            children: self.children.iter().map(Self::duplicate).collect(),
        }
    }
}

/// Everything about a section the engine carries but does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    /// Display name.
    pub name: String,
    /// Section type.
    pub section_type: SectionType,
    /// Style map (CSS-like key/value pairs).
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    /// Component tree.
    #[serde(default)]
    pub components: Vec<Component>,
    /// Type-specific data written by property editors.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl SectionContent {
    /// Empty content for a section type, named after the type.
    #[must_use]
    pub fn new(section_type: SectionType) -> Self {
        Self {
            name: section_type.label().to_string(),
            section_type,
            style: BTreeMap::new(),
            components: Vec::new(),
            data: serde_json::Value::Null,
        }
    }

    /// Deep copy with fresh component ids and a " (copy)" name suffix.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            name: format!("{} (copy)", self.name),
            section_type: self.section_type,
            style: self.style.clone(),
            components: self.components.iter().map(Component::duplicate).collect(),
            data: self.data.clone(),
        }
    }
}

/// A section on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Position, size, rotation and skew.
    pub geometry: Geometry,
    /// Paint and hit-test order; higher is on top. Unique within a document.
    pub z_order: i32,
    /// Locked sections refuse every transform gesture.
    #[serde(default)]
    pub locked: bool,
    /// Hidden sections are neither drawn nor hit-tested.
    #[serde(default)]
    pub hidden: bool,
    /// Presentation-only emphasis.
    #[serde(default)]
    pub highlighted: bool,
    /// Opaque payload.
    pub content: SectionContent,
}

impl Section {
    /// Whether a canvas point falls inside the (possibly rotated) section.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        let g = &self.geometry;
        // Un-rotate the point into the section's own frame
        let local = rotate_point(point, g.center(), -g.rotation);
        local.x >= g.position.x
            && local.x <= g.position.x + g.size.width
            && local.y >= g.position.y
            && local.y <= g.position.y + g.size.height
    }

    /// Name from the content payload.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.content.name
    }
}

/// A partially specified section for [`crate::Document::add_section`].
///
/// Anything left unset gets a default: position `{0, 0}`, the type's default
/// size, no rotation or skew, unlocked and visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSection {
    /// Content payload.
    pub content: SectionContent,
    /// Initial position.
    #[serde(default)]
    pub position: Option<Point>,
    /// Initial size.
    #[serde(default)]
    pub size: Option<Size>,
    /// Initial rotation in degrees.
    #[serde(default)]
    pub rotation: Option<f32>,
    /// Initial skew.
    #[serde(default)]
    pub skew: Option<Skew>,
    /// Start locked.
    #[serde(default)]
    pub locked: bool,
    /// Start hidden.
    #[serde(default)]
    pub hidden: bool,
}

impl NewSection {
    /// A section of the given type with default content.
    #[must_use]
    pub fn new(section_type: SectionType) -> Self {
        Self::with_content(SectionContent::new(section_type))
    }

    /// A section carrying the given content.
    #[must_use]
    pub fn with_content(content: SectionContent) -> Self {
        Self {
            content,
            position: None,
            size: None,
            rotation: None,
            skew: None,
            locked: false,
            hidden: false,
        }
    }

    /// Set the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.content.name = name.into();
        self
    }

    /// Set the position.
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Set the size.
    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Set the rotation.
    #[must_use]
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Start locked.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Start hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Initial geometry with defaults filled in.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry {
            position: self.position.unwrap_or(Point::ZERO),
            size: self
                .size
                .unwrap_or_else(|| self.content.section_type.default_size())
                .non_negative(),
            rotation: crate::geometry::normalize_rotation(self.rotation.unwrap_or(0.0)),
            skew: self.skew.unwrap_or_default(),
        }
    }
}
