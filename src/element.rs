use ratatui::layout::{Position, Rect};

/// Geometry of an interactive element.
///
/// Elements are anchored at their bottom-left corner regardless of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Circle with a cell radius, anchored at `pos` (not the center).
    Circle { pos: Position, radius: u16 },
}

impl ElementShape {
    /// Anchor position of the element.
    pub fn position(&self) -> Position {
        match self {
            ElementShape::Rect(area) => Position::new(area.x, area.y),
            ElementShape::Circle { pos, .. } => *pos,
        }
    }
}

/// Lifecycle contract every interactive element fulfils.
///
/// The hosting menu drives elements through this trait once per frame.
/// Composite elements embed an [`ElementCore`] and forward each hook to it
/// before applying their own behavior, so the generic element state is
/// always handled first.
pub trait UiElement {
    /// Geometry used by the host for layout purposes.
    fn shape(&self) -> ElementShape;

    /// Description text published while the element is highlighted.
    fn description(&self) -> &str;

    /// Restore transient interaction state to just-constructed.
    fn reset(&mut self);

    /// Hook invoked when the element's observable state changes.
    fn on_change(&mut self) {}

    /// Per-frame state update.
    fn update(&mut self, dt: f32);

    /// Per-frame graphical update, separated from [`UiElement::update`]
    /// for code visibility.
    fn graf_update(&mut self, _dt: f32) {}
}

/// Generic element state shared by every interactive element.
#[derive(Debug, Clone)]
pub struct ElementCore {
    shape: ElementShape,
    description: String,
    show_description: bool,
    age: f32,
}

impl ElementCore {
    pub fn new(shape: ElementShape) -> Self {
        ElementCore {
            shape,
            description: String::new(),
            show_description: false,
            age: 0.0,
        }
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Whether the host currently highlights this element.
    pub fn show_description(&self) -> bool {
        self.show_description
    }

    /// Set by the host when the pointer or focus enters/leaves the element.
    pub fn set_show_description(&mut self, show: bool) {
        self.show_description = show;
    }

    /// Seconds since construction or the last reset.
    pub fn age(&self) -> f32 {
        self.age
    }
}

impl UiElement for ElementCore {
    fn shape(&self) -> ElementShape {
        self.shape
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn reset(&mut self) {
        self.show_description = false;
        self.age = 0.0;
    }

    fn update(&mut self, dt: f32) {
        self.age += dt;
    }
}
