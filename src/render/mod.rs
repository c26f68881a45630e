pub mod animator;
pub mod camera;
pub mod cursor;
pub mod list;
pub mod sphere;
pub mod style;

/// Presentation of the ranked items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Animated 3D label sphere
    #[default]
    Cloud,
    /// Flat ranked table
    List,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Cloud => Self::List,
            Self::List => Self::Cloud,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cloud => "Cloud",
            Self::List => "List",
        }
    }
}
