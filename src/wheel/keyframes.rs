use heapless::Vec;

use crate::color::Color;

/// Maximum number of keyframes a wheel can hold
pub const MAX_KEYFRAMES: usize = 16;

/// Reasons a keyframe list can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeError {
    /// The list has no colors
    Empty,
    /// The list is longer than [`MAX_KEYFRAMES`]
    TooMany,
    /// First and last colors differ, so the wheel would jump at 360°
    OpenLoop,
}

impl core::fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "keyframe list is empty"),
            Self::TooMany => write!(f, "more than {MAX_KEYFRAMES} keyframes"),
            Self::OpenLoop => write!(f, "first and last keyframes differ"),
        }
    }
}

/// Ordered color anchors of a wheel.
///
/// When there is more than one color the list is closed: the first and last
/// entries are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    colors: Vec<Color, MAX_KEYFRAMES>,
}

impl Keyframes {
    /// Validate and copy a keyframe list
    pub fn new(colors: &[Color]) -> Result<Self, KeyframeError> {
        let (Some(first), Some(last)) = (colors.first(), colors.last()) else {
            return Err(KeyframeError::Empty);
        };
        if first != last {
            return Err(KeyframeError::OpenLoop);
        }
        let colors = Vec::from_slice(colors).map_err(|()| KeyframeError::TooMany)?;
        Ok(Self { colors })
    }

    /// A single color list
    pub fn single(color: Color) -> Self {
        let mut colors = Vec::new();
        let _ = colors.push(color);
        Self { colors }
    }

    /// A closed two color list holding `color` twice
    pub fn repeated(color: Color) -> Self {
        let mut colors = Vec::new();
        let _ = colors.push(color);
        let _ = colors.push(color);
        Self { colors }
    }

    /// Built-in palettes are closed and short, they skip validation
    pub(crate) fn palette(colors: &[Color]) -> Self {
        let mut keyframes = Vec::new();
        for color in colors.iter().take(MAX_KEYFRAMES) {
            let _ = keyframes.push(*color);
        }
        Self { colors: keyframes }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of sections the circle is split into
    pub fn sections(&self) -> usize {
        self.colors.len().saturating_sub(1)
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }
}
